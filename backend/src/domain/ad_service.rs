//! Ad registry service.
//!
//! Implements [`AdCommand`] and [`AdQuery`] over an [`AdRepository`]. Edits
//! and removals are restricted to the ad's owner, and every category and
//! condition an ad names must exist in the catalog.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::catalog_service::map_catalog_error;
use crate::domain::ports::{
    AdCommand, AdListFilter, AdQuery, AdRepository, AdRepositoryError, CatalogRepository,
    CreateAdRequest, DeleteAdRequest, UpdateAdRequest,
};
use crate::domain::{Ad, AdContent, AdDraft, AdId, CatalogKind, Error, UserId};

fn map_repository_error(error: AdRepositoryError) -> Error {
    match error {
        AdRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ad repository unavailable: {message}"))
        }
        AdRepositoryError::Query { message } => {
            Error::internal(format!("ad repository error: {message}"))
        }
    }
}

fn validate(draft: AdDraft) -> Result<AdContent, Error> {
    AdContent::try_from(draft).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
    })
}

#[derive(Clone)]
pub struct AdService<A, C> {
    ads: Arc<A>,
    catalog: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<A, C> AdService<A, C> {
    pub fn new(ads: Arc<A>, catalog: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ads,
            catalog,
            clock,
        }
    }
}

impl<A: AdRepository, C: CatalogRepository> AdService<A, C> {
    async fn owned_ad(&self, id: AdId, acting_user: &UserId) -> Result<Ad, Error> {
        let ad = self
            .ads
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("ad {id} not found")))?;
        if !ad.is_owned_by(acting_user) {
            return Err(Error::forbidden("you are not the author of this ad"));
        }
        Ok(ad)
    }

    /// Reject content naming a category or condition the catalog lacks.
    async fn ensure_cataloged(&self, content: &AdContent) -> Result<(), Error> {
        let checks = [
            (CatalogKind::Category, "categories", content.categories()),
            (
                CatalogKind::Condition,
                "condition",
                std::slice::from_ref(content.condition()),
            ),
        ];
        for (kind, field, slugs) in checks {
            let unknown = self
                .catalog
                .unknown_slugs(kind, slugs)
                .await
                .map_err(map_catalog_error)?;
            if let Some(slug) = unknown.first() {
                debug!(%kind, %slug, "ad names an unknown catalog entry");
                return Err(Error::invalid_request(format!("unknown {kind} `{slug}`"))
                    .with_details(json!({ "field": field, "value": slug })));
            }
        }
        Ok(())
    }

    async fn checked_content(&self, draft: AdDraft) -> Result<AdContent, Error> {
        let content = validate(draft)?;
        self.ensure_cataloged(&content).await?;
        Ok(content)
    }
}

#[async_trait]
impl<A: AdRepository, C: CatalogRepository> AdCommand for AdService<A, C> {
    async fn create_ad(&self, request: CreateAdRequest) -> Result<Ad, Error> {
        let content = self.checked_content(request.draft).await?;
        let ad = Ad::new(AdId::random(), request.acting_user, content, self.clock.utc());
        self.ads.insert(&ad).await.map_err(map_repository_error)?;
        info!(ad_id = %ad.id(), user_id = %ad.owner(), "ad created");
        Ok(ad)
    }

    async fn update_ad(&self, request: UpdateAdRequest) -> Result<Ad, Error> {
        let ad = self.owned_ad(request.ad_id, &request.acting_user).await?;
        let content = self.checked_content(request.draft).await?;
        let ad = ad.with_content(content);
        if !self.ads.update(&ad).await.map_err(map_repository_error)? {
            return Err(Error::not_found(format!("ad {} not found", request.ad_id)));
        }
        Ok(ad)
    }

    async fn delete_ad(&self, request: DeleteAdRequest) -> Result<(), Error> {
        self.owned_ad(request.ad_id, &request.acting_user).await?;
        if !self
            .ads
            .delete(&request.ad_id)
            .await
            .map_err(map_repository_error)?
        {
            return Err(Error::not_found(format!("ad {} not found", request.ad_id)));
        }
        info!(ad_id = %request.ad_id, "ad deleted");
        Ok(())
    }
}

#[async_trait]
impl<A: AdRepository, C: CatalogRepository> AdQuery for AdService<A, C> {
    async fn get_ad(&self, id: AdId) -> Result<Ad, Error> {
        self.ads
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("ad {id} not found")))
    }

    async fn list_ads(&self, filter: AdListFilter) -> Result<Vec<Ad>, Error> {
        self.ads.list(&filter).await.map_err(map_repository_error)
    }
}
