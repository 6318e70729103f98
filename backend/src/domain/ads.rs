//! Classified ads and their read projection.
//!
//! Ads are owned by exactly one user. The exchange engine only reads them:
//! ownership checks at proposal time and summaries embedded in proposal
//! listings.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::{AdId, Slug, SlugValidationError, UserId};

/// Maximum title length in characters.
pub const AD_TITLE_MAX: usize = 64;
/// Maximum description length in characters.
pub const AD_DESCRIPTION_MAX: usize = 512;
/// Maximum image reference length in characters.
pub const AD_IMAGE_URL_MAX: usize = 255;

/// Validation errors raised while building [`AdContent`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("image url must be at most {max} characters")]
    ImageUrlTooLong { max: usize },
    #[error("at least one category is required")]
    NoCategories,
    #[error("category `{slug}` is listed more than once")]
    DuplicateCategory { slug: String },
    #[error("invalid category: {source}")]
    InvalidCategory { source: SlugValidationError },
    #[error("invalid condition: {source}")]
    InvalidCondition { source: SlugValidationError },
}

impl AdValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::EmptyDescription | Self::DescriptionTooLong { .. } => "description",
            Self::ImageUrlTooLong { .. } => "imageUrl",
            Self::NoCategories | Self::DuplicateCategory { .. } | Self::InvalidCategory { .. } => {
                "categories"
            }
            Self::InvalidCondition { .. } => "condition",
        }
    }
}

/// Unvalidated ad fields as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdDraft {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub condition: String,
}

/// Validated, owner-editable content of an ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdContent {
    title: String,
    description: String,
    image_url: Option<String>,
    categories: Vec<Slug>,
    condition: Slug,
}

fn bounded_text(
    value: &str,
    max: usize,
    empty: AdValidationError,
    too_long: AdValidationError,
) -> Result<String, AdValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > max {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

impl TryFrom<AdDraft> for AdContent {
    type Error = AdValidationError;

    fn try_from(draft: AdDraft) -> Result<Self, Self::Error> {
        let title = bounded_text(
            &draft.title,
            AD_TITLE_MAX,
            AdValidationError::EmptyTitle,
            AdValidationError::TitleTooLong { max: AD_TITLE_MAX },
        )?;
        let description = bounded_text(
            &draft.description,
            AD_DESCRIPTION_MAX,
            AdValidationError::EmptyDescription,
            AdValidationError::DescriptionTooLong {
                max: AD_DESCRIPTION_MAX,
            },
        )?;

        let image_url = match draft.image_url.map(|url| url.trim().to_owned()) {
            Some(url) if url.is_empty() => None,
            Some(url) if url.chars().count() > AD_IMAGE_URL_MAX => {
                return Err(AdValidationError::ImageUrlTooLong {
                    max: AD_IMAGE_URL_MAX,
                });
            }
            other => other,
        };

        if draft.categories.is_empty() {
            return Err(AdValidationError::NoCategories);
        }
        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(draft.categories.len());
        for raw in draft.categories {
            let slug = Slug::new(raw)
                .map_err(|source| AdValidationError::InvalidCategory { source })?;
            if !seen.insert(slug.clone()) {
                return Err(AdValidationError::DuplicateCategory {
                    slug: slug.into(),
                });
            }
            categories.push(slug);
        }

        let condition = Slug::new(draft.condition)
            .map_err(|source| AdValidationError::InvalidCondition { source })?;

        Ok(Self {
            title,
            description,
            image_url,
            categories,
            condition,
        })
    }
}

impl AdContent {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn categories(&self) -> &[Slug] {
        &self.categories
    }

    pub fn condition(&self) -> &Slug {
        &self.condition
    }
}

/// A classified ad.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use swapmeet::domain::{Ad, AdContent, AdDraft, AdId, UserId};
///
/// let content = AdContent::try_from(AdDraft {
///     title: "Road bike".into(),
///     description: "Barely used".into(),
///     image_url: None,
///     categories: vec!["sport".into()],
///     condition: "used".into(),
/// })
/// .expect("valid ad");
/// let owner = UserId::random();
/// let ad = Ad::new(AdId::random(), owner, content, Utc::now());
/// assert!(ad.is_owned_by(&owner));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ad {
    id: AdId,
    owner: UserId,
    content: AdContent,
    created_at: DateTime<Utc>,
}

impl Ad {
    pub fn new(id: AdId, owner: UserId, content: AdContent, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            content,
            created_at,
        }
    }

    pub fn id(&self) -> AdId {
        self.id
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner == *user
    }

    pub fn content(&self) -> &AdContent {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replace the editable content, keeping identity, owner, and timestamp.
    pub fn with_content(self, content: AdContent) -> Self {
        Self { content, ..self }
    }

    /// Read projection embedded in exchange listings.
    pub fn summary(&self) -> AdSummary {
        AdSummary {
            id: self.id,
            owner: self.owner,
            title: self.content.title.clone(),
            description: self.content.description.clone(),
            image_url: self.content.image_url.clone(),
            categories: self.content.categories.clone(),
            condition: self.content.condition.clone(),
        }
    }
}

/// Denormalised ad fields shown alongside a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdSummary {
    pub id: AdId,
    pub owner: UserId,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub categories: Vec<Slug>,
    pub condition: Slug,
}
