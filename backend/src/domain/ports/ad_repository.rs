//! Driven port onto the ad registry.

use async_trait::async_trait;

use crate::domain::{Ad, AdId, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ad repository adapters.
    pub enum AdRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "ad repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ad repository query failed: {message}",
    }
}

/// Catalog filters over the ad listing. Absent fields match every ad.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdListFilter {
    /// Ads tagged with this category among others.
    pub category: Option<Slug>,
    pub condition: Option<Slug>,
}

impl AdListFilter {
    /// Whether `ad` passes every present filter.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use swapmeet::domain::ports::AdListFilter;
    /// use swapmeet::domain::{Ad, AdContent, AdDraft, AdId, Slug, UserId};
    ///
    /// let content = AdContent::try_from(AdDraft {
    ///     title: "Kettle".into(),
    ///     description: "Steel".into(),
    ///     image_url: None,
    ///     categories: vec!["home".into()],
    ///     condition: "used".into(),
    /// })
    /// .expect("valid ad");
    /// let ad = Ad::new(AdId::random(), UserId::random(), content, Utc::now());
    /// let filter = AdListFilter {
    ///     category: Some(Slug::new("home").expect("slug")),
    ///     condition: Some(Slug::new("new").expect("slug")),
    /// };
    /// assert!(!filter.matches(&ad));
    /// ```
    pub fn matches(&self, ad: &Ad) -> bool {
        let content = ad.content();
        self.category
            .as_ref()
            .is_none_or(|slug| content.categories().contains(slug))
            && self
                .condition
                .as_ref()
                .is_none_or(|slug| content.condition() == slug)
    }
}

/// Storage for classified ads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdRepository: Send + Sync {
    async fn find_by_id(&self, id: &AdId) -> Result<Option<Ad>, AdRepositoryError>;

    /// Fetch every ad in `ids` that still exists, in no particular order.
    async fn find_many(&self, ids: &[AdId]) -> Result<Vec<Ad>, AdRepositoryError>;

    /// Ads passing `filter`, newest first.
    async fn list(&self, filter: &AdListFilter) -> Result<Vec<Ad>, AdRepositoryError>;

    async fn insert(&self, ad: &Ad) -> Result<(), AdRepositoryError>;

    /// Overwrite the editable content. Returns `false` when the ad is gone.
    async fn update(&self, ad: &Ad) -> Result<bool, AdRepositoryError>;

    /// Delete the ad and, by cascade, proposals referencing it. Returns
    /// `false` when nothing was deleted.
    async fn delete(&self, id: &AdId) -> Result<bool, AdRepositoryError>;
}

/// Registry without any ads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdRepository;

#[async_trait]
impl AdRepository for FixtureAdRepository {
    async fn find_by_id(&self, _id: &AdId) -> Result<Option<Ad>, AdRepositoryError> {
        Ok(None)
    }

    async fn find_many(&self, _ids: &[AdId]) -> Result<Vec<Ad>, AdRepositoryError> {
        Ok(Vec::new())
    }

    async fn list(&self, _filter: &AdListFilter) -> Result<Vec<Ad>, AdRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _ad: &Ad) -> Result<(), AdRepositoryError> {
        Ok(())
    }

    async fn update(&self, _ad: &Ad) -> Result<bool, AdRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: &AdId) -> Result<bool, AdRepositoryError> {
        Ok(false)
    }
}
