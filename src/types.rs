use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

pub const SYNOPSIS_FALLBACK: &str = "Synopsis not available.";
pub const CREATOR_FALLBACK: &str = "Unknown";

/// Chapter identifier in canonical text form.
///
/// The API and the history store disagree on whether chapter numbers are
/// strings or numbers, so any JSON scalar is accepted and stored as text.
/// Equality is always exact text equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ChapterId(String);

impl ChapterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChapterId {
    fn from(s: &str) -> Self {
        ChapterId::new(s)
    }
}

impl<'de> Deserialize<'de> for ChapterId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => match n.as_f64() {
                // 12.0 renders as "12", the way the store writes whole numbers
                Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    (f as i64).to_string()
                }
                _ => n.to_string(),
            },
            other => other.to_string(),
        };
        Ok(ChapterId(text))
    }
}

/// Lightweight comic descriptor handed over by the previous view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComicSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub chapter: ChapterId,
    /// Fields this view does not interpret but must hand forward unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(default)]
    pub chapter: ChapterId,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub link: String,
}

/// Detail record as returned by `/comic/comic/{link}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComicDetail {
    #[serde(default, deserialize_with = "text_or_none")]
    pub synopsis: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub chapters: Vec<Chapter>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub creator: Option<String>,
}

impl ComicDetail {
    /// Stand-in record installed when the fetch fails.
    pub fn degraded() -> Self {
        Self {
            synopsis: Some(SYNOPSIS_FALLBACK.to_string()),
            chapters: Vec::new(),
            creator: Some(CREATOR_FALLBACK.to_string()),
        }
    }

    pub fn synopsis(&self) -> &str {
        match self.synopsis.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => SYNOPSIS_FALLBACK,
        }
    }

    pub fn creator(&self) -> &str {
        match self.creator.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => CREATOR_FALLBACK,
        }
    }
}

/// Strings are kept; anything else reads as absent and gets the field's fallback.
fn text_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text_or_none(deserializer)?.unwrap_or_default())
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Chapter>, D::Error> {
    Ok(Option::<Vec<Chapter>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Last-read marker written by the chapter reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub last_chapter: ChapterId,
    #[serde(default)]
    pub last_chapter_link: String,
}

impl HistoryRecord {
    pub fn as_chapter(&self) -> Chapter {
        Chapter {
            chapter: self.last_chapter.clone(),
            link: self.last_chapter_link.clone(),
        }
    }
}

/// State a view is entered with: `{comic, processedLink}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comic: Option<ComicSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_link: Option<String>,
}
