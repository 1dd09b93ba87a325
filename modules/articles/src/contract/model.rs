use std::fmt;

use chrono::{DateTime, Utc};

/// Storage-assigned identifier of a content entity (node or paragraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub i64);

impl EntityId {
    /// Parse an identifier taken from a query string.
    ///
    /// Anything that is not a positive integer cannot name a stored entity,
    /// so it yields `None` and callers report it as not found.
    pub fn parse_lookup(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<i64>()
            .ok()
            .filter(|v| *v > 0)
            .map(Self)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

/// Identity of the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    pub const ANONYMOUS: UserId = UserId(0);

    pub fn is_anonymous(&self) -> bool {
        *self == Self::ANONYMOUS
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStatus {
    Unpublished,
    Published,
}

impl PublishStatus {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

impl From<bool> for PublishStatus {
    fn from(v: bool) -> Self {
        if v {
            Self::Published
        } else {
            Self::Unpublished
        }
    }
}

/// Rich-text value with its format tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedText {
    pub value: String,
    pub format: String,
}

/// Pure article model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: EntityId,
    pub title: String,
    pub body: FormattedText,
    pub name: String,
    pub status: PublishStatus,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    pub address_ref: Option<EntityId>,
}

/// Address sub-record attached to an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: EntityId,
    pub colony: String,
    pub house_number: String,
}

/// Article together with the address its `address_ref` resolves to, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub article: Article,
    pub address: Option<Address>,
}

/// Data for creating a new article. `None` means the field was absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewArticle {
    pub title: Option<String>,
    pub body: Option<String>,
    pub name: Option<String>,
    pub address: Option<NewAddress>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewAddress {
    pub colony: Option<String>,
    pub house_number: Option<String>,
}

/// Update data for an article.
///
/// A field is applied only when it is `Some` and non-empty; an empty string
/// never clears the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub name: Option<String>,
}
