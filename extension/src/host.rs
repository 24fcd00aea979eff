// Seams between the relay logic and the browser
// Chrome implementations live in `services`, tests plug in recorders

use async_trait::async_trait;
use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use serde::Deserialize;
use std::fmt;

use crate::error::Result;
use crate::options::TocOptions;
use crate::protocol::OutboundMessage;

/// Identifier of a tab that can receive messages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TabId(u32);

impl TabId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The subset of `tabs.Tab` the worker looks at
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub window_id: Option<i64>,
}

impl Tab {
    pub fn with_id(id: i64) -> Self {
        Self {
            id: Some(id),
            window_id: None,
        }
    }

    /// Usable id, if any. Missing, zero and negative ids (`TAB_ID_NONE`) are not.
    pub fn tab_id(&self) -> Option<TabId> {
        self.id
            .filter(|id| *id > 0)
            .and_then(|id| u32::try_from(id).ok())
            .map(TabId)
    }
}

#[async_trait(?Send)]
pub trait TabHost {
    /// Active tab of the current window
    async fn active_tab(&self) -> Result<Option<Tab>>;

    async fn all_tabs(&self) -> Result<Vec<Tab>>;

    /// Deliver a one-way message. Errors when no content script listens.
    async fn send_message(&self, tab_id: TabId, message: &OutboundMessage) -> Result<()>;
}

#[async_trait(?Send)]
pub trait OptionsSource {
    async fn load_options(&self) -> Result<TocOptions>;
}

/// Runs background work nobody waits for
pub trait TaskScheduler {
    fn schedule(&self, task: LocalBoxFuture<'static, ()>);
}

/// Production scheduler: the wasm microtask queue
#[derive(Clone, Copy, Debug, Default)]
pub struct SpawnLocal;

impl TaskScheduler for SpawnLocal {
    fn schedule(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

impl TaskScheduler for LocalSpawner {
    fn schedule(&self, task: LocalBoxFuture<'static, ()>) {
        if let Err(e) = self.spawn_local(task) {
            log::debug!("Dropped background task: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::HostError;
    use std::cell::RefCell;

    /// Records every delivery instead of talking to a browser
    #[derive(Default)]
    pub struct RecordingHost {
        pub active: Option<Tab>,
        pub tabs: Vec<Tab>,
        pub fail_query: bool,
        pub unreachable: Vec<TabId>,
        pub sent: RefCell<Vec<(TabId, OutboundMessage)>>,
        pub options: TocOptions,
        pub fail_options: bool,
    }

    impl RecordingHost {
        pub fn sent(&self) -> Vec<(TabId, OutboundMessage)> {
            self.sent.borrow().clone()
        }
    }

    #[async_trait(?Send)]
    impl TabHost for RecordingHost {
        async fn active_tab(&self) -> Result<Option<Tab>> {
            if self.fail_query {
                return Err(HostError::Js("tabs.query rejected".into()));
            }
            Ok(self.active.clone())
        }

        async fn all_tabs(&self) -> Result<Vec<Tab>> {
            if self.fail_query {
                return Err(HostError::Js("tabs.query rejected".into()));
            }
            Ok(self.tabs.clone())
        }

        async fn send_message(&self, tab_id: TabId, message: &OutboundMessage) -> Result<()> {
            if self.unreachable.contains(&tab_id) {
                return Err(HostError::Js(
                    "Could not establish connection. Receiving end does not exist.".into(),
                ));
            }
            self.sent.borrow_mut().push((tab_id, message.clone()));
            Ok(())
        }
    }

    #[async_trait(?Send)]
    impl OptionsSource for RecordingHost {
        async fn load_options(&self) -> Result<TocOptions> {
            if self.fail_options {
                return Err(HostError::Js("storage.sync.get rejected".into()));
            }
            Ok(self.options.clone())
        }
    }

    pub fn tab_id(id: u32) -> TabId {
        TabId(id)
    }
}
