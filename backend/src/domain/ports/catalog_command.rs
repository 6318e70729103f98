//! Driving port for catalog curation. Only staff may call it successfully.

use async_trait::async_trait;

use crate::domain::{CatalogEntry, CatalogKind, Error, Slug, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCatalogEntryRequest {
    pub acting_user: UserId,
    pub kind: CatalogKind,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCatalogEntryRequest {
    pub acting_user: UserId,
    pub kind: CatalogKind,
    pub slug: Slug,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCatalogEntryRequest {
    pub acting_user: UserId,
    pub kind: CatalogKind,
    pub slug: Slug,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogCommand: Send + Sync {
    async fn create_entry(&self, request: CreateCatalogEntryRequest)
    -> Result<CatalogEntry, Error>;

    /// Retitle an entry. Slugs never change once created.
    async fn update_entry(&self, request: UpdateCatalogEntryRequest)
    -> Result<CatalogEntry, Error>;

    /// Fails with `conflict` while any ad references the entry.
    async fn delete_entry(&self, request: DeleteCatalogEntryRequest) -> Result<(), Error>;
}

/// Validates requests and echoes the entry without storing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogCommand;

#[async_trait]
impl CatalogCommand for FixtureCatalogCommand {
    async fn create_entry(
        &self,
        request: CreateCatalogEntryRequest,
    ) -> Result<CatalogEntry, Error> {
        CatalogEntry::new(request.kind, request.slug, &request.title)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }

    async fn update_entry(
        &self,
        request: UpdateCatalogEntryRequest,
    ) -> Result<CatalogEntry, Error> {
        CatalogEntry::new(request.kind, request.slug, &request.title)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }

    async fn delete_entry(&self, _request: DeleteCatalogEntryRequest) -> Result<(), Error> {
        Ok(())
    }
}
