// Keyboard command relay
// Turns the global shortcut into a togglePanel directive for the active tab

use std::rc::Rc;
use std::str::FromStr;

use crate::host::{TabHost, TaskScheduler};
use crate::protocol::OutboundMessage;

/// Command id declared in the manifest's `commands` section
pub const TOGGLE_PANEL_COMMAND: &str = "toggle-panel";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    TogglePanel,
}

impl FromStr for Command {
    type Err = ();

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        match id {
            TOGGLE_PANEL_COMMAND => Ok(Command::TogglePanel),
            _ => Err(()),
        }
    }
}

impl Command {
    fn directive(self) -> OutboundMessage {
        match self {
            Command::TogglePanel => OutboundMessage::TogglePanel,
        }
    }
}

pub struct CommandDispatcher<H, S> {
    host: Rc<H>,
    scheduler: S,
}

impl<H, S> CommandDispatcher<H, S>
where
    H: TabHost + 'static,
    S: TaskScheduler,
{
    pub fn new(host: Rc<H>, scheduler: S) -> Self {
        Self { host, scheduler }
    }

    /// `commands.onCommand` hook.
    ///
    /// Unknown ids are dropped. For a known id the tab lookup and delivery run
    /// as a scheduled task; nothing waits for it and its failures are only logged.
    pub fn handle(&self, command_id: &str) {
        let Ok(command) = command_id.parse::<Command>() else {
            return;
        };

        let host = Rc::clone(&self.host);
        self.scheduler.schedule(Box::pin(async move {
            let tab = match host.active_tab().await {
                Ok(tab) => tab,
                Err(e) => {
                    log::debug!("Active tab lookup failed: {}", e);
                    return;
                }
            };

            // No focused window, or a tab we cannot address
            let Some(tab_id) = tab.as_ref().and_then(|tab| tab.tab_id()) else {
                return;
            };

            if let Err(e) = host.send_message(tab_id, &command.directive()).await {
                log::debug!("{:?} not delivered to tab {}: {}", command, tab_id, e);
            }
        }));
    }
}
