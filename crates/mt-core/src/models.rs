//! # Domain Models
//!
//! These structs represent the core entities of the Mistake Tracker.
//! Timestamps are kept as ISO 8601 strings so that the persisted document
//! stays readable and so that string order equals chronological order.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::tally::Tally;

/// Format used for `date_added` / `date_modified` (local time, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Current local time rendered with [`TIMESTAMP_FORMAT`].
pub fn now_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// The fixed classification of a mistake.
///
/// This is a soft contract: stored records carry the label as a plain
/// string and any other label is accepted and tallied as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MistakeType {
    #[default]
    Conceptual,
    SillyCareless,
    Calculation,
    TimePressure,
    MisreadQuestion,
    MemoryFormula,
}

impl MistakeType {
    /// All six types in display order.
    pub const ALL: [MistakeType; 6] = [
        MistakeType::Conceptual,
        MistakeType::SillyCareless,
        MistakeType::Calculation,
        MistakeType::TimePressure,
        MistakeType::MisreadQuestion,
        MistakeType::MemoryFormula,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MistakeType::Conceptual => "Conceptual",
            MistakeType::SillyCareless => "Silly/Careless",
            MistakeType::Calculation => "Calculation",
            MistakeType::TimePressure => "Time Pressure",
            MistakeType::MisreadQuestion => "Misread Question",
            MistakeType::MemoryFormula => "Memory/Formula",
        }
    }

    /// The labels of [`MistakeType::ALL`], as served by `/api/mistake-types`.
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(MistakeType::as_str).collect()
    }
}

impl fmt::Display for MistakeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_mistake_type() -> String {
    MistakeType::default().as_str().to_string()
}

/// A single recorded study mistake.
///
/// Missing fields in older documents decode to their defaults instead of
/// failing the whole collection, and so do `null` or non-string values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub topic: String,
    /// Opaque reference to the question picture (path, URL or data URI)
    #[serde(default, deserialize_with = "lenient_string")]
    pub question_image: String,
    #[serde(default = "default_mistake_type", deserialize_with = "lenient_mistake_type")]
    pub mistake_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub why_happened: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub how_to_avoid: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_added: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_modified: String,
}

/// Strings pass through, numbers and booleans are rendered, anything else
/// (`null`, arrays, objects) is `None`.
fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(deserializer)?.unwrap_or_default())
}

fn lenient_mistake_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(deserializer)?.unwrap_or_else(default_mistake_type))
}

impl Mistake {
    /// Builds a fresh record from user input.
    pub fn from_new(input: NewMistake, id: String, now: String) -> Self {
        Self {
            id,
            topic: trimmed(input.topic),
            question_image: input.question_image.unwrap_or_default(),
            mistake_type: input.mistake_type.unwrap_or_else(default_mistake_type),
            why_happened: trimmed(input.why_happened),
            how_to_avoid: trimmed(input.how_to_avoid),
            date_added: now.clone(),
            date_modified: now,
        }
    }

    /// Overwrites only the fields present in `patch` and bumps `date_modified`.
    pub fn apply_patch(&mut self, patch: MistakePatch, now: String) {
        if let Some(topic) = patch.topic {
            self.topic = topic.trim().to_string();
        }
        if let Some(image) = patch.question_image {
            self.question_image = image;
        }
        if let Some(kind) = patch.mistake_type {
            self.mistake_type = kind;
        }
        if let Some(why) = patch.why_happened {
            self.why_happened = why.trim().to_string();
        }
        if let Some(how) = patch.how_to_avoid {
            self.how_to_avoid = how.trim().to_string();
        }
        // date_modified never sorts before date_added, even if the clock stepped back
        self.date_modified = if now < self.date_added {
            self.date_added.clone()
        } else {
            now
        };
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Input for creating a mistake. Every field is optional; `null` counts as omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMistake {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub question_image: Option<String>,
    #[serde(default)]
    pub mistake_type: Option<String>,
    #[serde(default)]
    pub why_happened: Option<String>,
    #[serde(default)]
    pub how_to_avoid: Option<String>,
}

/// Partial update: `Some` fields overwrite, `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakePatch {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub question_image: Option<String>,
    #[serde(default)]
    pub mistake_type: Option<String>,
    #[serde(default)]
    pub why_happened: Option<String>,
    #[serde(default)]
    pub how_to_avoid: Option<String>,
}

/// Optional list filters, matched case-insensitively and AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeFilter {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub mistake_type: Option<String>,
}

impl MistakeFilter {
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn mistake_type(mut self, mistake_type: impl Into<String>) -> Self {
        self.mistake_type = Some(mistake_type.into());
        self
    }
}

/// Aggregate view served by `/api/analytics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_mistakes: usize,
    /// Six seeded types first, then any unknown labels in encounter order
    pub type_distribution: Tally,
    /// Top 10 topics by count, descending
    pub topic_distribution: Tally,
    pub most_common_type: Option<String>,
}
