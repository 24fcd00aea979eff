// Chrome Tabs API Integration
// Promise-based MV3 calls; a rejected sendMessage means nobody was listening

use async_trait::async_trait;
use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{from_js, to_js};
use crate::error::Result;
use crate::host::{Tab, TabHost, TabId};
use crate::protocol::OutboundMessage;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"])]
    fn query(query_info: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = sendMessage)]
    fn send_tab_message(tab_id: u32, message: JsValue) -> std::result::Result<js_sys::Promise, JsValue>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ChromeTabs;

impl ChromeTabs {
    pub fn new() -> Self {
        Self
    }

    async fn query_tabs(&self, query_info: serde_json::Value) -> Result<Vec<Tab>> {
        let tabs = JsFuture::from(query(to_js(&query_info)?)?).await?;
        from_js(&tabs)
    }
}

#[async_trait(?Send)]
impl TabHost for ChromeTabs {
    async fn active_tab(&self) -> Result<Option<Tab>> {
        let tabs = self
            .query_tabs(json!({ "active": true, "currentWindow": true }))
            .await?;
        Ok(tabs.into_iter().next())
    }

    async fn all_tabs(&self) -> Result<Vec<Tab>> {
        self.query_tabs(json!({})).await
    }

    async fn send_message(&self, tab_id: TabId, message: &OutboundMessage) -> Result<()> {
        let promise = send_tab_message(tab_id.get(), to_js(message)?)?;
        // Resolved value is the content script's reply, which nobody reads
        JsFuture::from(promise).await?;
        Ok(())
    }
}
