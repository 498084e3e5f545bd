//! Page-level property construction and parsing
//!
//! The workspace API represents every field as a typed property object.
//! Builders produce the wire shape for writes; extractors pull plain values
//! back out of a page for comparison and matching.

use chrono::NaiveDate;
use serde_json::{json, Value};

/// Display icon attached to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    External(String),
    Emoji(String),
}

impl Icon {
    pub fn to_value(&self) -> Value {
        match self {
            Icon::External(url) => json!({"type": "external", "external": {"url": url}}),
            Icon::Emoji(emoji) => json!({"type": "emoji", "emoji": emoji}),
        }
    }
}

/// Parsed projection of a stored page: the identity fields the engine
/// matches on, plus the raw properties for field-level comparison.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub duration_min: Option<f64>,
    pub distance_km: Option<f64>,
    pub title: String,
    pub properties: Value,
}

impl StoredRecord {
    /// Parse a page object. Archived pages and pages without an id are
    /// dropped here so callers only ever see active records.
    pub fn from_page(page: &Value) -> Option<Self> {
        if page.get("archived").and_then(Value::as_bool).unwrap_or(false) {
            return None;
        }
        let id = page.get("id")?.as_str()?.to_string();
        let properties = page.get("properties").cloned().unwrap_or_else(|| json!({}));

        let date = prop_date_start(&properties, "Date")
            .as_deref()
            .and_then(parse_date_prefix);

        Some(Self {
            id,
            date,
            duration_min: prop_number(&properties, "Duration (min)"),
            distance_km: prop_number(&properties, "Distance (km)"),
            title: prop_title(&properties, "Activity Name").unwrap_or_default(),
            properties,
        })
    }
}

/// Parse the calendar-date prefix of a date-property start value, which may
/// carry a trailing timestamp.
fn parse_date_prefix(start: &str) -> Option<NaiveDate> {
    let prefix: String = start.chars().take(10).collect();
    NaiveDate::parse_from_str(&prefix, "%Y-%m-%d").ok()
}

// --- builders ---

pub fn title(text: &str) -> Value {
    json!({"title": [{"text": {"content": text}}]})
}

/// Rich-text property; an empty string clears the field rather than writing
/// an empty fragment.
pub fn rich_text(text: &str) -> Value {
    if text.is_empty() {
        json!({"rich_text": []})
    } else {
        json!({"rich_text": [{"text": {"content": text}}]})
    }
}

pub fn number(value: f64) -> Value {
    json!({"number": value})
}

pub fn select(name: &str) -> Value {
    json!({"select": {"name": name}})
}

pub fn checkbox(checked: bool) -> Value {
    json!({"checkbox": checked})
}

pub fn date_start(start: &str) -> Value {
    json!({"date": {"start": start}})
}

pub fn date_range(start: &str, end: &str) -> Value {
    json!({"date": {"start": start, "end": end}})
}

// --- extractors ---

pub fn prop_number(properties: &Value, name: &str) -> Option<f64> {
    properties.get(name)?.get("number")?.as_f64()
}

pub fn prop_checkbox(properties: &Value, name: &str) -> Option<bool> {
    properties.get(name)?.get("checkbox")?.as_bool()
}

pub fn prop_select(properties: &Value, name: &str) -> Option<String> {
    properties
        .get(name)?
        .get("select")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

pub fn prop_date_start(properties: &Value, name: &str) -> Option<String> {
    properties
        .get(name)?
        .get("date")?
        .get("start")?
        .as_str()
        .map(str::to_string)
}

pub fn prop_title(properties: &Value, name: &str) -> Option<String> {
    fragments_text(properties.get(name)?.get("title")?)
}

pub fn prop_rich_text(properties: &Value, name: &str) -> Option<String> {
    fragments_text(properties.get(name)?.get("rich_text")?)
}

/// Join the plain text of a rich-text/title fragment array. Query results
/// carry `plain_text`; pages echoed back from writes may only carry the
/// nested `text.content`.
fn fragments_text(fragments: &Value) -> Option<String> {
    let fragments = fragments.as_array()?;
    Some(
        fragments
            .iter()
            .filter_map(|fragment| {
                fragment
                    .get("plain_text")
                    .and_then(Value::as_str)
                    .or_else(|| {
                        fragment
                            .get("text")
                            .and_then(|t| t.get("content"))
                            .and_then(Value::as_str)
                    })
            })
            .collect::<Vec<_>>()
            .join(""),
    )
}
