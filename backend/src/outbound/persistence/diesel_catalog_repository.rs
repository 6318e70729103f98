//! PostgreSQL-backed [`CatalogRepository`].
//!
//! Ads store category and condition slugs directly, so deletion is guarded
//! with a `NOT EXISTS` over `ads` inside the `DELETE` itself.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::dsl::{exists, not};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogDeleteOutcome, CatalogRepository, CatalogRepositoryError};
use crate::domain::{CatalogEntry, CatalogKind, Slug};

use super::error_mapping::{is_unique_violation, map_basic_diesel_error, map_basic_pool_error};
use super::models::{CatalogRow, NewCatalogRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ads, catalog_entries};

const PRIMARY_KEY: &str = "catalog_entries_pkey";

#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogRepositoryError {
    map_basic_pool_error(error, CatalogRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogRepositoryError {
    map_basic_diesel_error(
        error,
        CatalogRepositoryError::query,
        CatalogRepositoryError::connection,
    )
}

fn row_to_entry(row: CatalogRow) -> Result<CatalogEntry, CatalogRepositoryError> {
    let CatalogRow { kind, slug, title } = row;
    let kind = kind
        .parse::<CatalogKind>()
        .map_err(|err| CatalogRepositoryError::query(format!("stored catalog row: {err}")))?;
    CatalogEntry::new(kind, slug.clone(), &title).map_err(|err| {
        CatalogRepositoryError::query(format!("stored {kind} `{slug}` is invalid: {err}"))
    })
}

#[async_trait]
impl CatalogRepository for DieselCatalogRepository {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CatalogRow> = catalog_entries::table
            .filter(catalog_entries::kind.eq(kind.as_str()))
            .order(catalog_entries::slug.asc())
            .select(CatalogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_entry).collect()
    }

    async fn find(
        &self,
        kind: CatalogKind,
        slug: &Slug,
    ) -> Result<Option<CatalogEntry>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = catalog_entries::table
            .filter(catalog_entries::kind.eq(kind.as_str()))
            .filter(catalog_entries::slug.eq(slug.as_str()))
            .select(CatalogRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_entry).transpose()
    }

    async fn unknown_slugs(
        &self,
        kind: CatalogKind,
        slugs: &[Slug],
    ) -> Result<Vec<Slug>, CatalogRepositoryError> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let wanted: Vec<&str> = slugs.iter().map(Slug::as_str).collect();
        let known: HashSet<String> = catalog_entries::table
            .filter(catalog_entries::kind.eq(kind.as_str()))
            .filter(catalog_entries::slug.eq_any(wanted))
            .select(catalog_entries::slug)
            .load::<String>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();
        Ok(slugs
            .iter()
            .filter(|slug| !known.contains(slug.as_str()))
            .cloned()
            .collect())
    }

    async fn insert(&self, entry: &CatalogEntry) -> Result<(), CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewCatalogRow {
            kind: entry.kind().as_str(),
            slug: entry.slug().as_str(),
            title: entry.title(),
        };
        diesel::insert_into(catalog_entries::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err, PRIMARY_KEY) {
                    CatalogRepositoryError::duplicate_slug(entry.kind(), entry.slug().clone())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn update(&self, entry: &CatalogEntry) -> Result<bool, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            catalog_entries::table
                .filter(catalog_entries::kind.eq(entry.kind().as_str()))
                .filter(catalog_entries::slug.eq(entry.slug().as_str())),
        )
        .set(catalog_entries::title.eq(entry.title()))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(
        &self,
        kind: CatalogKind,
        slug: &Slug,
    ) -> Result<CatalogDeleteOutcome, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = catalog_entries::table
            .filter(catalog_entries::kind.eq(kind.as_str()))
            .filter(catalog_entries::slug.eq(slug.as_str()));
        let deleted = match kind {
            CatalogKind::Category => {
                let referencing =
                    ads::table.filter(ads::categories.contains(vec![slug.as_str().to_owned()]));
                diesel::delete(target.filter(not(exists(referencing))))
                    .execute(&mut conn)
                    .await
            }
            CatalogKind::Condition => {
                let referencing = ads::table.filter(ads::condition.eq(slug.as_str()));
                diesel::delete(target.filter(not(exists(referencing))))
                    .execute(&mut conn)
                    .await
            }
        }
        .map_err(map_diesel_error)?;
        if deleted > 0 {
            return Ok(CatalogDeleteOutcome::Deleted);
        }

        let present = catalog_entries::table
            .filter(catalog_entries::kind.eq(kind.as_str()))
            .filter(catalog_entries::slug.eq(slug.as_str()))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(if present > 0 {
            CatalogDeleteOutcome::InUse
        } else {
            CatalogDeleteOutcome::Missing
        })
    }
}
