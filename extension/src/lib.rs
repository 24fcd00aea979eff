//! Background relay for the chat TOC extension.
//!
//! The content script pushes its table of contents here (`updateToc`), the
//! options page asks for a plain-text copy (`requestTocExport`), and the
//! `toggle-panel` shortcut is forwarded to the active tab. Browser APIs sit
//! behind the traits in [`host`], so everything except [`services`] and
//! [`background`] runs natively in tests.

pub mod background;
pub mod command;
pub mod error;
pub mod host;
pub mod options;
pub mod protocol;
pub mod responder;
pub mod services;
pub mod toc;

pub use background::BackgroundWorker;
pub use command::{Command, CommandDispatcher};
pub use error::{HostError, Result};
pub use options::{OptionsBroadcaster, PanelSide, TocOptions};
pub use protocol::{ExportResponse, InboundMessage, OutboundMessage, Reply};
pub use responder::TocResponder;
pub use toc::{Label, TocCache, TocSection};
