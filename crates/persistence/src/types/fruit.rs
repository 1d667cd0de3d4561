//! The fruit entity and its identifier.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StorageResult, ValidationError};

/// Emoji stored when a fruit is inserted without one (U+1F34F, green apple).
pub const DEFAULT_EMOJI: &str = "U+1F34F";

/// Identifier of a stored fruit.
///
/// Relational backends assign auto-incrementing integers. The document
/// backend uses opaque identifiers such as a hex-encoded ObjectId.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FruitId {
    /// A storage-assigned integer id.
    Numeric(i64),
    /// A non-numeric id, e.g. a MongoDB ObjectId in hex form.
    Opaque(String),
}

impl FruitId {
    /// Parses an id taken from a URL path.
    ///
    /// Anything that parses as an `i64` becomes [`FruitId::Numeric`].
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(n) => FruitId::Numeric(n),
            Err(_) => FruitId::Opaque(raw.to_string()),
        }
    }

    /// Returns the integer value, if this id is numeric.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FruitId::Numeric(n) => Some(*n),
            FruitId::Opaque(_) => None,
        }
    }
}

impl fmt::Display for FruitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FruitId::Numeric(n) => write!(f, "{}", n),
            FruitId::Opaque(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FruitId {
    fn from(value: i64) -> Self {
        FruitId::Numeric(value)
    }
}

impl From<&str> for FruitId {
    fn from(value: &str) -> Self {
        FruitId::parse(value)
    }
}

/// A fruit as stored and returned by the repository.
///
/// Timestamps are managed by the repository and never leave the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fruit {
    pub id: FruitId,
    pub name: String,
    pub season: String,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(skip)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Fruit {
    /// Compares name, season and emoji, ignoring id and timestamps.
    pub fn same_content(&self, other: &NewFruit) -> bool {
        self.name == other.name
            && self.season == other.season
            && self.emoji.as_deref().unwrap_or_default() == other.emoji_or_default()
    }
}

/// The client-supplied part of a fruit, used for inserts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewFruit {
    /// Only honoured by the document backend. Relational ids are assigned
    /// by storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FruitId>,
    pub name: String,
    pub season: String,
    #[serde(default)]
    pub emoji: Option<String>,
}

impl NewFruit {
    /// Creates a new fruit payload without an emoji.
    pub fn new(name: impl Into<String>, season: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            season: season.into(),
            emoji: None,
        }
    }

    /// Sets the emoji.
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    /// Sets a client-supplied id.
    pub fn with_id(mut self, id: impl Into<FruitId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Rejects blank names and seasons.
    pub fn validate(&self) -> StorageResult<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "name".to_string(),
            }
            .into());
        }
        if self.season.trim().is_empty() {
            return Err(ValidationError::MissingRequiredField {
                field: "season".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// The emoji to persist: the supplied one, or [`DEFAULT_EMOJI`] when empty.
    pub fn emoji_or_default(&self) -> &str {
        match self.emoji.as_deref() {
            Some(e) if !e.trim().is_empty() => e,
            _ => DEFAULT_EMOJI,
        }
    }

    /// Builds the stored representation once the backend has assigned an id.
    pub fn into_fruit(self, id: FruitId, created_at: DateTime<Utc>) -> Fruit {
        let emoji = self.emoji_or_default().to_string();
        Fruit {
            id,
            name: self.name,
            season: self.season,
            emoji: Some(emoji),
            created_at: Some(created_at),
            modified_at: None,
        }
    }
}

/// Parses an RFC 3339 timestamp as written by the repositories.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}
