// Table of contents cache
// Holds the last section list pushed by a content script and renders the text export

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque section label (position, badge or title).
///
/// Content scripts may send strings, numbers or nothing at all. The value is
/// kept as-is and only stringified when exported.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Label(Value);

impl Label {
    pub fn is_absent(&self) -> bool {
        self.0.is_null()
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label(Value::String(value.to_string()))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Null => Ok(()),
            Value::String(text) => f.write_str(text),
            // numbers, booleans, arrays and objects use their compact JSON form
            other => write!(f, "{}", other),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TocSection {
    #[serde(default)]
    pub position: Label,
    #[serde(default)]
    pub badge: Label,
    #[serde(default)]
    pub title: Label,

    // Anything else the content script attached (anchor ids etc.)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TocSection {
    pub fn new(position: &str, badge: &str, title: &str) -> Self {
        Self {
            position: position.into(),
            badge: badge.into(),
            title: title.into(),
            extra: Map::new(),
        }
    }

    /// One export line: `<position> <badge> <title>`
    pub fn export_line(&self) -> String {
        format!("{} {} {}", self.position, self.badge, self.title)
    }
}

/// Accepts whatever arrived in the `sections` field.
///
/// A missing, null or non-list value yields an empty list. List elements that
/// are not objects become sections with every label absent.
pub(crate) fn lenient_sections<'de, D>(deserializer: D) -> Result<Vec<TocSection>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let sections = match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value::<TocSection>(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    };
    Ok(sections)
}

/// Process-wide TOC state. Last write wins, no merging.
#[derive(Clone, Debug, Default)]
pub struct TocCache {
    sections: Vec<TocSection>,
}

impl TocCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache with `sections`
    pub fn replace(&mut self, sections: Vec<TocSection>) {
        self.sections = sections;
    }

    pub fn sections(&self) -> &[TocSection] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Newline-joined export lines, no trailing newline
    pub fn export_text(&self) -> String {
        self.sections
            .iter()
            .map(TocSection::export_line)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
