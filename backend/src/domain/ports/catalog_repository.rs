//! Driven port onto the category and condition catalog.
//!
//! Adapters must refuse to delete an entry while an ad still references it,
//! and must make that check and the delete a single atomic step.

use async_trait::async_trait;

use crate::domain::{CatalogEntry, CatalogKind, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalog adapters.
    pub enum CatalogRepositoryError {
        /// Catalog connection could not be established.
        Connection { message: String } => "catalog connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalog query failed: {message}",
        /// The slug is already taken within its kind.
        DuplicateSlug { kind: CatalogKind, slug: Slug } => "{kind} `{slug}` already exists",
    }
}

/// Result of a guarded catalog delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogDeleteOutcome {
    Deleted,
    /// At least one ad still references the entry; nothing was removed.
    InUse,
    Missing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Entries of `kind` ordered by slug.
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogRepositoryError>;

    async fn find(
        &self,
        kind: CatalogKind,
        slug: &Slug,
    ) -> Result<Option<CatalogEntry>, CatalogRepositoryError>;

    /// The subset of `slugs` with no entry of `kind`, in input order.
    async fn unknown_slugs(
        &self,
        kind: CatalogKind,
        slugs: &[Slug],
    ) -> Result<Vec<Slug>, CatalogRepositoryError>;

    /// Add an entry. Fails with `DuplicateSlug` when the slug is taken.
    async fn insert(&self, entry: &CatalogEntry) -> Result<(), CatalogRepositoryError>;

    /// Store a new title. Returns `false` when the entry is gone.
    async fn update(&self, entry: &CatalogEntry) -> Result<bool, CatalogRepositoryError>;

    async fn delete(
        &self,
        kind: CatalogKind,
        slug: &Slug,
    ) -> Result<CatalogDeleteOutcome, CatalogRepositoryError>;
}

/// Catalog that accepts every slug and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogRepository;

#[async_trait]
impl CatalogRepository for FixtureCatalogRepository {
    async fn list(&self, _kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(
        &self,
        _kind: CatalogKind,
        _slug: &Slug,
    ) -> Result<Option<CatalogEntry>, CatalogRepositoryError> {
        Ok(None)
    }

    async fn unknown_slugs(
        &self,
        _kind: CatalogKind,
        _slugs: &[Slug],
    ) -> Result<Vec<Slug>, CatalogRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _entry: &CatalogEntry) -> Result<(), CatalogRepositoryError> {
        Ok(())
    }

    async fn update(&self, _entry: &CatalogEntry) -> Result<bool, CatalogRepositoryError> {
        Ok(false)
    }

    async fn delete(
        &self,
        _kind: CatalogKind,
        _slug: &Slug,
    ) -> Result<CatalogDeleteOutcome, CatalogRepositoryError> {
        Ok(CatalogDeleteOutcome::Missing)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn slug(raw: &str) -> Slug {
        Slug::new(raw).expect("valid slug")
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_catalog_knows_every_slug() {
        let unknown = FixtureCatalogRepository
            .unknown_slugs(CatalogKind::Category, &[slug("anything")])
            .await
            .expect("lookup");
        assert!(unknown.is_empty());
    }

    #[rstest]
    fn duplicate_slug_names_kind_and_slug() {
        let err = CatalogRepositoryError::duplicate_slug(CatalogKind::Condition, slug("used"));
        assert_eq!(err.to_string(), "condition `used` already exists");
    }
}
