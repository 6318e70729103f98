//! Driving port for catalog reads.

use async_trait::async_trait;

use crate::domain::{CatalogEntry, CatalogKind, Error, Slug, default_catalog};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// Entries of `kind` ordered by slug.
    async fn list_entries(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, Error>;

    /// One entry; `not_found` when absent.
    async fn get_entry(&self, kind: CatalogKind, slug: Slug) -> Result<CatalogEntry, Error>;
}

/// Serves the built-in default catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogQuery;

#[async_trait]
impl CatalogQuery for FixtureCatalogQuery {
    async fn list_entries(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, Error> {
        let mut entries: Vec<CatalogEntry> = default_catalog()
            .into_iter()
            .filter(|entry| entry.kind() == kind)
            .collect();
        entries.sort_by(|a, b| a.slug().cmp(b.slug()));
        Ok(entries)
    }

    async fn get_entry(&self, kind: CatalogKind, slug: Slug) -> Result<CatalogEntry, Error> {
        default_catalog()
            .into_iter()
            .find(|entry| entry.kind() == kind && *entry.slug() == slug)
            .ok_or_else(|| Error::not_found(format!("{kind} `{slug}` not found")))
    }
}
