// Chrome API bindings
// Values cross the JS boundary as JSON text

mod storage;
mod tabs;

pub use storage::ChromeStorage;
pub use tabs::ChromeTabs;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};

use crate::error::{HostError, Result};
use crate::host::{OptionsSource, Tab, TabHost, TabId};
use crate::options::TocOptions;
use crate::protocol::OutboundMessage;

/// Tab messaging plus the options storage area
#[derive(Clone, Copy, Debug, Default)]
pub struct ChromeHost {
    tabs: ChromeTabs,
    storage: ChromeStorage,
}

impl ChromeHost {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl TabHost for ChromeHost {
    async fn active_tab(&self) -> Result<Option<Tab>> {
        self.tabs.active_tab().await
    }

    async fn all_tabs(&self) -> Result<Vec<Tab>> {
        self.tabs.all_tabs().await
    }

    async fn send_message(&self, tab_id: TabId, message: &OutboundMessage) -> Result<()> {
        self.tabs.send_message(tab_id, message).await
    }
}

#[async_trait(?Send)]
impl OptionsSource for ChromeHost {
    async fn load_options(&self) -> Result<TocOptions> {
        self.storage.load_options().await
    }
}

impl From<JsValue> for HostError {
    fn from(value: JsValue) -> Self {
        let message = value
            .dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
            .or_else(|| value.as_string())
            .unwrap_or_else(|| format!("{:?}", value));
        HostError::Js(message)
    }
}

pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue> {
    let text = serde_json::to_string(value)?;
    Ok(js_sys::JSON::parse(&text)?)
}

pub(crate) fn from_js<T: DeserializeOwned>(value: &JsValue) -> Result<T> {
    // JSON.stringify yields undefined for undefined and functions
    let text = js_sys::JSON::stringify(value)?
        .as_string()
        .unwrap_or_else(|| "null".to_string());
    Ok(serde_json::from_str(&text)?)
}
