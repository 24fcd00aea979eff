// Extension message protocol
// Wire shapes exchanged with content scripts and the options page

use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::options::TocOptions;
use crate::toc::{lenient_sections, TocSection};

/// Messages arriving through `runtime.onMessage`
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    UpdateToc {
        #[serde(default, deserialize_with = "lenient_sections")]
        sections: Vec<TocSection>,
    },
    RequestTocExport,

    // Any other tag: not ours to answer
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    /// Decode a raw message. Payloads without a usable `type` are `Unknown`.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or(InboundMessage::Unknown)
    }
}

/// Directives sent to content scripts through `tabs.sendMessage`
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    TogglePanel,
    OptionsUpdate { options: TocOptions },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExportResponse {
    pub text: String,
}

/// What a message handler promises the transport
pub enum Reply {
    /// The response channel can be released right away
    NoResponse,
    /// Response is ready before the handler returns
    Immediate(ExportResponse),
    /// Response will be delivered once the future resolves
    Deferred(LocalBoxFuture<'static, ExportResponse>),
}

impl Reply {
    /// Value returned to the host listener (`true` keeps `sendResponse` alive)
    pub fn keeps_channel_open(&self) -> bool {
        !matches!(self, Reply::NoResponse)
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::NoResponse => f.write_str("NoResponse"),
            Reply::Immediate(response) => f.debug_tuple("Immediate").field(response).finish(),
            Reply::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
