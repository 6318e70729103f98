//! Category and condition catalog.
//!
//! Ads reference catalog entries by slug. Each [`CatalogKind`] has its own
//! slug namespace; staff curate the entries and everyone else only reads
//! them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Slug, SlugValidationError};

/// Maximum catalog title length in characters.
pub const CATALOG_TITLE_MAX: usize = 32;

/// Entries every fresh store starts with, as `(kind, slug, title)`.
pub const DEFAULT_CATALOG: [(CatalogKind, &str, &str); 10] = [
    (CatalogKind::Category, "books", "Books"),
    (CatalogKind::Category, "clothing", "Clothing"),
    (CatalogKind::Category, "electronics", "Electronics"),
    (CatalogKind::Category, "home", "Home"),
    (CatalogKind::Category, "misc", "Miscellaneous"),
    (CatalogKind::Category, "sport", "Sport"),
    (CatalogKind::Condition, "new", "New"),
    (CatalogKind::Condition, "like-new", "Like new"),
    (CatalogKind::Condition, "used", "Used"),
    (CatalogKind::Condition, "for-parts", "For parts"),
];

/// Which list an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Category,
    Condition,
}

impl CatalogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Condition => "condition",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown catalog kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown catalog kind `{0}`")]
pub struct ParseCatalogKindError(String);

impl FromStr for CatalogKind {
    type Err = ParseCatalogKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Category, Self::Condition]
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseCatalogKindError(s.to_owned()))
    }
}

/// Validation errors raised while building a [`CatalogEntry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("invalid slug: {source}")]
    InvalidSlug { source: SlugValidationError },
}

impl CatalogValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::InvalidSlug { .. } => "slug",
        }
    }
}

fn catalog_title(value: &str) -> Result<String, CatalogValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogValidationError::EmptyTitle);
    }
    if trimmed.chars().count() > CATALOG_TITLE_MAX {
        return Err(CatalogValidationError::TitleTooLong {
            max: CATALOG_TITLE_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

/// A named category or condition.
///
/// # Examples
/// ```
/// use swapmeet::domain::{CatalogEntry, CatalogKind};
///
/// let entry = CatalogEntry::new(CatalogKind::Category, "board-games", " Board games ")
///     .expect("valid entry");
/// assert_eq!(entry.title(), "Board games");
/// assert!(CatalogEntry::new(CatalogKind::Condition, "Used", "Used").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    kind: CatalogKind,
    slug: Slug,
    title: String,
}

impl CatalogEntry {
    pub fn new(
        kind: CatalogKind,
        slug: impl Into<String>,
        title: &str,
    ) -> Result<Self, CatalogValidationError> {
        let slug =
            Slug::new(slug).map_err(|source| CatalogValidationError::InvalidSlug { source })?;
        Ok(Self {
            kind,
            slug,
            title: catalog_title(title)?,
        })
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Same entry under a new title.
    pub fn retitled(self, title: &str) -> Result<Self, CatalogValidationError> {
        Ok(Self {
            title: catalog_title(title)?,
            ..self
        })
    }
}

/// [`DEFAULT_CATALOG`] as validated entries.
pub fn default_catalog() -> Vec<CatalogEntry> {
    DEFAULT_CATALOG
        .into_iter()
        .filter_map(|(kind, slug, title)| CatalogEntry::new(kind, slug, title).ok())
        .collect()
}
