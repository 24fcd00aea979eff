// Background service worker for the chat TOC extension
// All decisions are made in Rust, background.js only forwards Chrome events

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::command::CommandDispatcher;
use crate::error::HostError;
use crate::host::SpawnLocal;
use crate::options::OptionsBroadcaster;
use crate::protocol::{InboundMessage, Reply};
use crate::responder::TocResponder;
use crate::services::{from_js, to_js, ChromeHost};

/// One instance per service worker lifetime, created by background.js
#[wasm_bindgen]
pub struct BackgroundWorker {
    responder: TocResponder,
    dispatcher: CommandDispatcher<ChromeHost, SpawnLocal>,
    broadcaster: OptionsBroadcaster<ChromeHost, SpawnLocal>,
}

#[wasm_bindgen]
impl BackgroundWorker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let host = Rc::new(ChromeHost::new());
        log::info!("Chat TOC background worker ready");

        Self {
            responder: TocResponder::new(),
            dispatcher: CommandDispatcher::new(Rc::clone(&host), SpawnLocal),
            broadcaster: OptionsBroadcaster::new(host, SpawnLocal),
        }
    }

    /// `chrome.commands.onCommand`
    pub fn handle_command(&self, command: &str) {
        self.dispatcher.handle(command);
    }

    /// `chrome.runtime.onMessage`. The return value is handed back to Chrome.
    pub fn handle_message(&mut self, message: JsValue, send_response: js_sys::Function) -> bool {
        let message = match from_js::<serde_json::Value>(&message) {
            Ok(value) => InboundMessage::from_value(value),
            Err(e) => {
                log::debug!("Unreadable runtime message: {}", e);
                InboundMessage::Unknown
            }
        };

        let reply = self.responder.on_message(message);
        let keep_open = reply.keeps_channel_open();

        match reply {
            Reply::NoResponse => {}
            Reply::Immediate(response) => respond(&send_response, &response),
            Reply::Deferred(pending) => wasm_bindgen_futures::spawn_local(async move {
                respond(&send_response, &pending.await);
            }),
        }

        keep_open
    }

    /// `chrome.storage.onChanged`
    pub fn handle_storage_changed(&self, area_name: &str) {
        self.broadcaster.on_storage_changed(area_name);
    }
}

impl Default for BackgroundWorker {
    fn default() -> Self {
        Self::new()
    }
}

fn respond<T: serde::Serialize>(send_response: &js_sys::Function, response: &T) {
    let delivered = to_js(response).and_then(|value| {
        send_response
            .call1(&JsValue::NULL, &value)
            .map_err(HostError::from)
    });
    if let Err(e) = delivered {
        log::warn!("sendResponse failed: {}", e);
    }
}

/// Logging setup, run once when the wasm module is instantiated
#[wasm_bindgen(start)]
pub fn init_background() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
}
