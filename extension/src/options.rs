// Display options shared with every content script
// Stored by the options page in chrome.storage.sync

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;

use crate::error::Result;
use crate::host::{OptionsSource, TabHost, TaskScheduler};
use crate::protocol::OutboundMessage;

pub const DEFAULT_AUTO_OPEN_THRESHOLD: u32 = 12;
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#ffec8b";

/// Storage area the options page writes to
pub const OPTIONS_AREA: &str = "sync";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PanelSide {
    Left,
    #[default]
    Right,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TocOptions {
    pub panel_side: PanelSide,
    pub auto_open_threshold: u32,
    pub highlight_color: String,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            panel_side: PanelSide::Right,
            auto_open_threshold: DEFAULT_AUTO_OPEN_THRESHOLD,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
        }
    }
}

/// Options as found in storage, before any validation
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct StoredOptions {
    #[serde(default)]
    panel_side: Value,
    #[serde(default)]
    auto_open_threshold: Value,
    #[serde(default)]
    highlight_color: Value,
}

impl TocOptions {
    /// Normalize whatever the storage area returned. Invalid values fall back to defaults.
    pub fn from_stored(value: Value) -> Self {
        let stored: StoredOptions = serde_json::from_value(value).unwrap_or_default();

        let panel_side = match stored.panel_side.as_str() {
            Some("left") => PanelSide::Left,
            _ => PanelSide::Right,
        };

        let auto_open_threshold =
            parse_threshold(&stored.auto_open_threshold).unwrap_or(DEFAULT_AUTO_OPEN_THRESHOLD);

        let highlight_color = match stored.highlight_color.as_str() {
            Some(color) if !color.is_empty() => color.to_string(),
            _ => DEFAULT_HIGHLIGHT_COLOR.to_string(),
        };

        Self {
            panel_side,
            auto_open_threshold,
            highlight_color,
        }
    }
}

// Positive integer, or the leading digits of a numeric string
fn parse_threshold(value: &Value) -> Option<u32> {
    let parsed = match value {
        Value::Number(n) => n.as_f64().map(|f| f.trunc()).and_then(|f| {
            if f >= 1.0 && f <= u32::MAX as f64 {
                Some(f as u32)
            } else {
                None
            }
        }),
        Value::String(s) => {
            let digits: String = s
                .trim_start()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.parse::<u32>().ok()
        }
        _ => None,
    };
    parsed.filter(|n| *n > 0)
}

/// Pushes the stored options to every open tab when they change
pub struct OptionsBroadcaster<H, S> {
    host: Rc<H>,
    scheduler: S,
}

impl<H, S> OptionsBroadcaster<H, S>
where
    H: TabHost + OptionsSource + 'static,
    S: TaskScheduler,
{
    pub fn new(host: Rc<H>, scheduler: S) -> Self {
        Self { host, scheduler }
    }

    /// `storage.onChanged` hook. Changes outside the options area are ignored.
    pub fn on_storage_changed(&self, area_name: &str) {
        if area_name != OPTIONS_AREA {
            return;
        }

        let host = Rc::clone(&self.host);
        // Fire-and-forget: storage or delivery failures only reach the log
        self.scheduler.schedule(Box::pin(async move {
            if let Err(e) = broadcast(host.as_ref()).await {
                log::debug!("Options broadcast skipped: {}", e);
            }
        }));
    }
}

async fn broadcast<H>(host: &H) -> Result<()>
where
    H: TabHost + OptionsSource,
{
    let options = host.load_options().await?;
    let message = OutboundMessage::OptionsUpdate { options };

    for tab_id in host.all_tabs().await?.iter().filter_map(|tab| tab.tab_id()) {
        // A tab without our content script must not stop the others
        if let Err(e) = host.send_message(tab_id, &message).await {
            log::debug!("optionsUpdate not delivered to tab {}: {}", tab_id, e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::{tab_id, RecordingHost};
    use crate::host::Tab;
    use futures::executor::LocalPool;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = TocOptions::default();
        assert_eq!(options.panel_side, PanelSide::Right);
        assert_eq!(options.auto_open_threshold, 12);
        assert_eq!(options.highlight_color, "#ffec8b");
    }

    #[test]
    fn test_from_stored_keeps_valid_values() {
        let options = TocOptions::from_stored(json!({
            "panelSide": "left",
            "autoOpenThreshold": 20,
            "highlightColor": "#00ff00",
        }));

        assert_eq!(options.panel_side, PanelSide::Left);
        assert_eq!(options.auto_open_threshold, 20);
        assert_eq!(options.highlight_color, "#00ff00");
    }

    #[test]
    fn test_from_stored_falls_back_on_invalid_values() {
        let options = TocOptions::from_stored(json!({
            "panelSide": "top",
            "autoOpenThreshold": 0,
            "highlightColor": "",
        }));
        assert_eq!(options, TocOptions::default());

        let options = TocOptions::from_stored(json!({ "autoOpenThreshold": "abc" }));
        assert_eq!(options, TocOptions::default());

        assert_eq!(TocOptions::from_stored(json!("garbage")), TocOptions::default());
    }

    #[test]
    fn test_threshold_accepts_numeric_strings_and_fractions() {
        let options = TocOptions::from_stored(json!({ "autoOpenThreshold": "15px" }));
        assert_eq!(options.auto_open_threshold, 15);

        let options = TocOptions::from_stored(json!({ "autoOpenThreshold": 7.9 }));
        assert_eq!(options.auto_open_threshold, 7);

        let options = TocOptions::from_stored(json!({ "autoOpenThreshold": -4 }));
        assert_eq!(options.auto_open_threshold, DEFAULT_AUTO_OPEN_THRESHOLD);
    }

    #[test]
    fn test_broadcast_reaches_every_tab_with_an_id() {
        let host = Rc::new(RecordingHost {
            tabs: vec![Tab::with_id(1), Tab::default(), Tab::with_id(2), Tab::with_id(3)],
            unreachable: vec![tab_id(2)],
            options: TocOptions {
                panel_side: PanelSide::Left,
                ..TocOptions::default()
            },
            ..RecordingHost::default()
        });
        let mut pool = LocalPool::new();
        let broadcaster = OptionsBroadcaster::new(Rc::clone(&host), pool.spawner());

        broadcaster.on_storage_changed("sync");
        pool.run_until_stalled();

        let sent = host.sent();
        let recipients: Vec<_> = sent.iter().map(|(id, _)| *id).collect();
        assert_eq!(recipients, vec![tab_id(1), tab_id(3)]);
        assert!(sent.iter().all(|(_, message)| matches!(
            message,
            OutboundMessage::OptionsUpdate { options } if options.panel_side == PanelSide::Left
        )));
    }

    #[test]
    fn test_broadcast_ignores_other_storage_areas() {
        let host = Rc::new(RecordingHost {
            tabs: vec![Tab::with_id(1)],
            ..RecordingHost::default()
        });
        let mut pool = LocalPool::new();
        let broadcaster = OptionsBroadcaster::new(Rc::clone(&host), pool.spawner());

        broadcaster.on_storage_changed("local");
        broadcaster.on_storage_changed("session");
        pool.run_until_stalled();

        assert!(host.sent().is_empty());
    }

    #[test]
    fn test_broadcast_swallows_storage_failure() {
        let host = Rc::new(RecordingHost {
            tabs: vec![Tab::with_id(1)],
            fail_options: true,
            ..RecordingHost::default()
        });
        let mut pool = LocalPool::new();
        let broadcaster = OptionsBroadcaster::new(Rc::clone(&host), pool.spawner());

        broadcaster.on_storage_changed("sync");
        pool.run_until_stalled();

        assert!(host.sent().is_empty());
    }
}
