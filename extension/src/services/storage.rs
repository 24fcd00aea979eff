// Chrome Storage API Integration
// Read-only: the options page owns writes to storage.sync

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{from_js, to_js};
use crate::error::Result;
use crate::host::OptionsSource;
use crate::options::TocOptions;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "sync"])]
    fn get(keys: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ChromeStorage;

impl ChromeStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl OptionsSource for ChromeStorage {
    /// Missing keys come back as defaults, the rest is normalized
    async fn load_options(&self) -> Result<TocOptions> {
        let defaults = to_js(&TocOptions::default())?;
        let items = JsFuture::from(get(defaults)?).await?;
        let stored: serde_json::Value = from_js(&items)?;
        Ok(TocOptions::from_stored(stored))
    }
}
