//! Catalog curation service.
//!
//! Any user may read the catalog. Creating, retitling, and deleting entries
//! is limited to the staff accounts the service is built with.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CatalogCommand, CatalogDeleteOutcome, CatalogQuery, CatalogRepository,
    CatalogRepositoryError, CreateCatalogEntryRequest, DeleteCatalogEntryRequest,
    UpdateCatalogEntryRequest,
};
use crate::domain::{CatalogEntry, CatalogKind, CatalogValidationError, Error, Slug, UserId};

pub(crate) fn map_catalog_error(error: CatalogRepositoryError) -> Error {
    match error {
        CatalogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalog unavailable: {message}"))
        }
        CatalogRepositoryError::Query { message } => {
            Error::internal(format!("catalog error: {message}"))
        }
        CatalogRepositoryError::DuplicateSlug { kind, slug } => {
            Error::conflict(format!("{kind} `{slug}` already exists"))
                .with_details(json!({ "field": "slug", "value": slug }))
        }
    }
}

fn invalid_entry(error: CatalogValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": error.field() }))
}

fn entry_not_found(kind: CatalogKind, slug: &Slug) -> Error {
    Error::not_found(format!("{kind} `{slug}` not found"))
}

#[derive(Clone)]
pub struct CatalogService<C> {
    catalog: Arc<C>,
    staff: Arc<[UserId]>,
}

impl<C> CatalogService<C> {
    pub fn new(catalog: Arc<C>, staff: impl Into<Arc<[UserId]>>) -> Self {
        Self {
            catalog,
            staff: staff.into(),
        }
    }

    fn require_staff(&self, acting_user: &UserId) -> Result<(), Error> {
        if self.staff.contains(acting_user) {
            return Ok(());
        }
        debug!(user_id = %acting_user, "non-staff user attempted a catalog change");
        Err(Error::forbidden("only staff may change the catalog"))
    }
}

#[async_trait]
impl<C: CatalogRepository> CatalogCommand for CatalogService<C> {
    async fn create_entry(
        &self,
        request: CreateCatalogEntryRequest,
    ) -> Result<CatalogEntry, Error> {
        self.require_staff(&request.acting_user)?;
        let entry =
            CatalogEntry::new(request.kind, request.slug, &request.title).map_err(invalid_entry)?;
        self.catalog
            .insert(&entry)
            .await
            .map_err(map_catalog_error)?;
        info!(kind = %entry.kind(), slug = %entry.slug(), "catalog entry created");
        Ok(entry)
    }

    async fn update_entry(
        &self,
        request: UpdateCatalogEntryRequest,
    ) -> Result<CatalogEntry, Error> {
        self.require_staff(&request.acting_user)?;
        let UpdateCatalogEntryRequest {
            kind, slug, title, ..
        } = request;
        let entry = self
            .catalog
            .find(kind, &slug)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| entry_not_found(kind, &slug))?
            .retitled(&title)
            .map_err(invalid_entry)?;
        if !self
            .catalog
            .update(&entry)
            .await
            .map_err(map_catalog_error)?
        {
            return Err(entry_not_found(kind, &slug));
        }
        Ok(entry)
    }

    async fn delete_entry(&self, request: DeleteCatalogEntryRequest) -> Result<(), Error> {
        self.require_staff(&request.acting_user)?;
        let DeleteCatalogEntryRequest { kind, slug, .. } = request;
        match self
            .catalog
            .delete(kind, &slug)
            .await
            .map_err(map_catalog_error)?
        {
            CatalogDeleteOutcome::Deleted => {
                info!(%kind, %slug, "catalog entry deleted");
                Ok(())
            }
            CatalogDeleteOutcome::InUse => Err(Error::conflict(format!(
                "{kind} `{slug}` is still used by ads"
            ))),
            CatalogDeleteOutcome::Missing => Err(entry_not_found(kind, &slug)),
        }
    }
}

#[async_trait]
impl<C: CatalogRepository> CatalogQuery for CatalogService<C> {
    async fn list_entries(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, Error> {
        self.catalog.list(kind).await.map_err(map_catalog_error)
    }

    async fn get_entry(&self, kind: CatalogKind, slug: Slug) -> Result<CatalogEntry, Error> {
        self.catalog
            .find(kind, &slug)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| entry_not_found(kind, &slug))
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCatalogRepository;

    #[fixture]
    fn staff() -> UserId {
        UserId::random()
    }

    fn service(repo: MockCatalogRepository, staff: UserId) -> CatalogService<MockCatalogRepository> {
        CatalogService::new(Arc::new(repo), vec![staff])
    }

    fn slug(raw: &str) -> Slug {
        Slug::new(raw).expect("valid slug")
    }

    #[rstest]
    #[tokio::test]
    async fn staff_create_stores_the_entry(staff: UserId) {
        let mut repo = MockCatalogRepository::new();
        repo.expect_insert()
            .withf(|entry| entry.slug().as_str() == "toys" && entry.title() == "Toys")
            .times(1)
            .returning(|_| Ok(()));

        let entry = service(repo, staff)
            .create_entry(CreateCatalogEntryRequest {
                acting_user: staff,
                kind: CatalogKind::Category,
                slug: "toys".into(),
                title: "Toys".into(),
            })
            .await
            .expect("staff may create");

        assert_eq!(entry.kind(), CatalogKind::Category);
    }

    #[rstest]
    #[tokio::test]
    async fn other_users_cannot_change_the_catalog(staff: UserId) {
        let mut repo = MockCatalogRepository::new();
        repo.expect_insert().times(0);
        repo.expect_delete().times(0);
        let svc = service(repo, staff);
        let outsider = UserId::random();

        let create = svc
            .create_entry(CreateCatalogEntryRequest {
                acting_user: outsider,
                kind: CatalogKind::Condition,
                slug: "mint".into(),
                title: "Mint".into(),
            })
            .await
            .expect_err("not staff");
        let delete = svc
            .delete_entry(DeleteCatalogEntryRequest {
                acting_user: outsider,
                kind: CatalogKind::Condition,
                slug: slug("used"),
            })
            .await
            .expect_err("not staff");

        assert_eq!(create.code(), ErrorCode::Forbidden);
        assert_eq!(delete.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_slug_conflicts(staff: UserId) {
        let mut repo = MockCatalogRepository::new();
        repo.expect_insert().returning(|entry| {
            Err(CatalogRepositoryError::duplicate_slug(
                entry.kind(),
                entry.slug().clone(),
            ))
        });

        let err = service(repo, staff)
            .create_entry(CreateCatalogEntryRequest {
                acting_user: staff,
                kind: CatalogKind::Category,
                slug: "misc".into(),
                title: "Misc".into(),
            })
            .await
            .expect_err("slug taken");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("slug")));
    }

    #[rstest]
    #[tokio::test]
    async fn update_retitles_an_existing_entry(staff: UserId) {
        let mut repo = MockCatalogRepository::new();
        repo.expect_find().returning(|kind, slug| {
            Ok(Some(
                CatalogEntry::new(kind, slug.as_str(), "Old").expect("valid entry"),
            ))
        });
        repo.expect_update()
            .withf(|entry| entry.title() == "Sporting goods")
            .times(1)
            .returning(|_| Ok(true));

        let entry = service(repo, staff)
            .update_entry(UpdateCatalogEntryRequest {
                acting_user: staff,
                kind: CatalogKind::Category,
                slug: slug("sport"),
                title: "Sporting goods".into(),
            })
            .await
            .expect("retitled");

        assert_eq!(entry.slug().as_str(), "sport");
    }

    #[rstest]
    #[case(CatalogDeleteOutcome::InUse, ErrorCode::Conflict)]
    #[case(CatalogDeleteOutcome::Missing, ErrorCode::NotFound)]
    #[tokio::test]
    async fn delete_outcomes_map_to_errors(
        staff: UserId,
        #[case] outcome: CatalogDeleteOutcome,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockCatalogRepository::new();
        repo.expect_delete().returning(move |_, _| Ok(outcome));

        let err = service(repo, staff)
            .delete_entry(DeleteCatalogEntryRequest {
                acting_user: staff,
                kind: CatalogKind::Category,
                slug: slug("books"),
            })
            .await
            .expect_err("not deleted");

        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_entry_is_not_found(staff: UserId) {
        let mut repo = MockCatalogRepository::new();
        repo.expect_find().returning(|_, _| Ok(None));

        let err = service(repo, staff)
            .get_entry(CatalogKind::Condition, slug("pristine"))
            .await
            .expect_err("missing");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
