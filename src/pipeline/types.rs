// src/pipeline/types.rs
//! Records flowing through the scoring pipeline.
//!
//! Input fields from the upstream feed are loosely typed (a post id may be a
//! number, a comment may be missing, `null`, or not valid UTF-8). Both are
//! coerced exactly once here, at the boundary, so the rest of the pipeline
//! only ever sees plain strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque post identifier (`media_id`). Numbers are kept in their display form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Value> for PostId {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => Self::new(s),
            Value::Null => Self::new(""),
            other => Self::new(other.to_string()),
        }
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PostId> for String {
    fn from(id: PostId) -> Self {
        id.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw comment text after coercion.
///
/// `Missing` covers absent/`null`/structured values, `Undecodable` keeps the
/// lossy rendering of bytes that were not valid UTF-8 (for the output table only;
/// the pipeline treats it as empty).
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Value")]
pub enum RawText {
    Text(String),
    #[default]
    Missing,
    Undecodable(String),
}

impl RawText {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(s) => Self::Text(s.to_string()),
            Err(_) => Self::Undecodable(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    pub fn from_json(v: &Value) -> Self {
        Self::from(v.clone())
    }

    /// Text the pipeline works on: empty unless the value was a proper string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::Missing | Self::Undecodable(_) => "",
        }
    }

    /// Text echoed back in the per-comment output table.
    pub fn display(&self) -> &str {
        match self {
            Self::Text(s) | Self::Undecodable(s) => s,
            Self::Missing => "",
        }
    }
}

impl From<Value> for RawText {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => Self::Text(s),
            Value::Number(n) => Self::Text(n.to_string()),
            Value::Bool(b) => Self::Text(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Missing,
        }
    }
}

impl From<&str> for RawText {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Option<&str>> for RawText {
    fn from(s: Option<&str>) -> Self {
        s.map(RawText::from).unwrap_or_default()
    }
}

impl Serialize for RawText {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.display())
    }
}

/// One input row: `media_id`, `comment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRow {
    pub media_id: PostId,
    #[serde(default)]
    pub comment: RawText,
}

impl CommentRow {
    pub fn new(media_id: impl Into<String>, comment: impl Into<RawText>) -> Self {
        Self {
            media_id: PostId::new(media_id),
            comment: comment.into(),
        }
    }
}

/// Discrete sentiment bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Negative,
    Neutral,
    Positive,
}

impl SentimentClass {
    pub const ALL: [SentimentClass; 3] = [Self::Negative, Self::Neutral, Self::Positive];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
        }
    }

    /// Case-insensitive parse of a free-form label; `None` for anything else.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "negative" => Some(Self::Negative),
            "neutral" => Some(Self::Neutral),
            "positive" => Some(Self::Positive),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comment after cleaning and scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredComment {
    pub media_id: PostId,
    pub comment: RawText,
    pub cleaned_comment: String,
    /// Word count of `cleaned_comment`.
    pub weight: usize,
    pub sentiment_score: f64,
    pub sentiment_class: SentimentClass,
}

/// Per-post aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub media_id: PostId,
    pub aggregate_score: f64,
    pub comment_count: usize,
    pub total_weight: usize,
}

/// Top-K and bottom-K posts. `bottom` is in ascending score order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    pub top: Vec<Post>,
    pub bottom: Vec<Post>,
}
