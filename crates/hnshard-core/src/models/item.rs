use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Item id, unique across the whole archive.
pub type ItemId = i64;

/// Kind of archived record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    Story,
    Comment,
    Poll,
    PollOpt,
    Job,
    /// Any kind the archive carries that this crate does not name.
    Other(String),
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Story => "story",
            Self::Comment => "comment",
            Self::Poll => "poll",
            Self::PollOpt => "pollopt",
            Self::Job => "job",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for ItemKind {
    fn from(s: &str) -> Self {
        match s {
            "story" => Self::Story,
            "comment" => Self::Comment,
            "poll" => Self::Poll,
            "pollopt" => Self::PollOpt,
            "job" => Self::Job,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ItemKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One archived record. Read-only: the engine never creates or mutates items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub author: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
    pub score: i64,
    /// Creation time, unix seconds.
    pub time: i64,
    pub parent: Option<ItemId>,
}

impl Item {
    /// Total ranking order: score descending, then time descending, then id
    /// ascending. `Ordering::Less` means `self` ranks first.
    pub fn rank_cmp(&self, other: &Item) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.time.cmp(&self.time))
            .then_with(|| self.id.cmp(&other.id))
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }

    /// ISO-8601 creation time, or `None` when the stored time is out of range.
    pub fn timestamp_iso(&self) -> Option<String> {
        self.timestamp().map(|t| t.to_rfc3339())
    }

    /// Body text cut to `max_chars` characters with a trailing ellipsis.
    pub fn text_preview(&self, max_chars: usize) -> Option<String> {
        let text = self.text.as_deref()?;
        match text.char_indices().nth(max_chars) {
            Some((cut, _)) => Some(format!("{}...", &text[..cut])),
            None => Some(text.to_string()),
        }
    }

    /// Copy of the item with HTML entities in title and text decoded.
    pub fn decoded(&self) -> Item {
        Item {
            title: self.title.as_deref().map(decode_entities),
            text: self.text.as_deref().map(decode_entities),
            ..self.clone()
        }
    }
}

/// Decode the HTML entities the archive escapes in titles and bodies.
/// `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
