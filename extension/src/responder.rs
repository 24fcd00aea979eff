// TOC cache owner and export responder
// Answers runtime messages from content scripts and the options page

use crate::protocol::{ExportResponse, InboundMessage, Reply};
use crate::toc::TocCache;

#[derive(Debug, Default)]
pub struct TocResponder {
    cache: TocCache,
}

impl TocResponder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &TocCache {
        &self.cache
    }

    /// `runtime.onMessage` hook. The export is built before returning.
    pub fn on_message(&mut self, message: InboundMessage) -> Reply {
        match message {
            InboundMessage::UpdateToc { sections } => {
                log::debug!("TOC cache replaced ({} sections)", sections.len());
                self.cache.replace(sections);
                Reply::NoResponse
            }
            InboundMessage::RequestTocExport => Reply::Immediate(ExportResponse {
                text: self.cache.export_text(),
            }),
            InboundMessage::Unknown => Reply::NoResponse,
        }
    }
}
