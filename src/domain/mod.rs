//! Domain types for the catalog with strong typing.
//!
//! Identifiers are newtypes over [`Uuid`] so that catalog item ids and
//! provider ids cannot be mixed up at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a catalog item.
///
/// # Examples
///
/// ```rust
/// use anicat::domain::CatalogItemId;
///
/// assert!(CatalogItemId::parse("not-an-id").is_none());
/// let id = CatalogItemId::generate();
/// assert_eq!(CatalogItemId::parse(&id.to_string()), Some(id));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogItemId(Uuid);

impl CatalogItemId {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a raw path or query value. Returns `None` for anything that is
    /// not a well-formed id.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    #[must_use]
    pub const fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CatalogItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CatalogItemId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Unique identifier for a provider (studio).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(Uuid);

impl ProviderId {
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    #[must_use]
    pub const fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ProviderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Sort order enumeration to replace boolean blindness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    /// Only the literal `"asc"` sorts ascending; everything else, including
    /// absence, sorts descending.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => Self::Ascending,
            _ => Self::Descending,
        }
    }

    #[must_use]
    pub const fn is_ascending(&self) -> bool {
        matches!(self, Self::Ascending)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Sortable catalog fields. Anything outside this allow-list falls back to
/// [`SortField::CreatedAt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Rating,
    ReleaseDate,
    Title,
    Episodes,
}

impl SortField {
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("rating") => Self::Rating,
            Some("releaseDate") => Self::ReleaseDate,
            Some("title") => Self::Title,
            Some("episodes") => Self::Episodes,
            _ => Self::CreatedAt,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Rating => "rating",
            Self::ReleaseDate => "releaseDate",
            Self::Title => "title",
            Self::Episodes => "episodes",
        }
    }
}

/// One ordering key of a catalog query.
pub type SortKey = (SortField, SortOrder);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_falls_back_to_created_at() {
        assert_eq!(SortField::from_param(Some("rating")), SortField::Rating);
        assert_eq!(SortField::from_param(Some("episodes")), SortField::Episodes);
        assert_eq!(SortField::from_param(Some("$where")), SortField::CreatedAt);
        assert_eq!(SortField::from_param(Some("Rating")), SortField::CreatedAt);
        assert_eq!(SortField::from_param(None), SortField::CreatedAt);
    }

    #[test]
    fn sort_order_is_descending_unless_asc() {
        assert_eq!(SortOrder::from_param(Some("asc")), SortOrder::Ascending);
        assert_eq!(SortOrder::from_param(Some("desc")), SortOrder::Descending);
        assert_eq!(SortOrder::from_param(Some("ASC")), SortOrder::Descending);
        assert_eq!(SortOrder::from_param(None), SortOrder::Descending);
        assert_eq!(SortOrder::Ascending.as_str(), "asc");
    }

    #[test]
    fn ids_reject_malformed_input() {
        assert!(ProviderId::parse("123").is_none());
        assert!(ProviderId::parse("").is_none());
        let id = ProviderId::generate();
        assert_eq!(ProviderId::parse(&format!(" {id} ")), Some(id));
    }
}
