//! PostgreSQL-backed [`AdRepository`].
//!
//! Deleting an ad relies on `ON DELETE CASCADE` to remove proposals that
//! reference it.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AdListFilter, AdRepository, AdRepositoryError};
use crate::domain::{Ad, AdContent, AdDraft, AdId, UserId};

use super::error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AdChangeset, AdRow, NewAdRow};
use super::pool::{DbPool, PoolError};
use super::schema::ads;

#[derive(Clone)]
pub struct DieselAdRepository {
    pool: DbPool,
}

impl DieselAdRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AdRepositoryError {
    map_basic_pool_error(error, AdRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AdRepositoryError {
    map_basic_diesel_error(error, AdRepositoryError::query, AdRepositoryError::connection)
}

fn row_to_ad(row: AdRow) -> Result<Ad, AdRepositoryError> {
    let AdRow {
        id,
        user_id,
        title,
        description,
        image_url,
        categories,
        condition,
        created_at,
    } = row;

    let content = AdContent::try_from(AdDraft {
        title,
        description,
        image_url,
        categories,
        condition,
    })
    .map_err(|err| AdRepositoryError::query(format!("stored ad {id} is invalid: {err}")))?;

    Ok(Ad::new(
        AdId::from_uuid(id),
        UserId::from_uuid(user_id),
        content,
        created_at,
    ))
}

fn category_strings(content: &AdContent) -> Vec<String> {
    content
        .categories()
        .iter()
        .map(|slug| slug.as_str().to_owned())
        .collect()
}

#[async_trait]
impl AdRepository for DieselAdRepository {
    async fn find_by_id(&self, id: &AdId) -> Result<Option<Ad>, AdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = ads::table
            .filter(ads::id.eq(id.as_uuid()))
            .select(AdRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_ad).transpose()
    }

    async fn find_many(&self, ids: &[AdId]) -> Result<Vec<Ad>, AdRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<AdRow> = ads::table
            .filter(ads::id.eq_any(uuids))
            .select(AdRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_ad).collect()
    }

    async fn list(&self, filter: &AdListFilter) -> Result<Vec<Ad>, AdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ads::table.into_boxed();
        if let Some(category) = &filter.category {
            query = query.filter(ads::categories.contains(vec![category.as_str().to_owned()]));
        }
        if let Some(condition) = &filter.condition {
            query = query.filter(ads::condition.eq(condition.as_str().to_owned()));
        }
        let rows: Vec<AdRow> = query
            .order((ads::created_at.desc(), ads::id.desc()))
            .select(AdRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_ad).collect()
    }

    async fn insert(&self, ad: &Ad) -> Result<(), AdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let content = ad.content();
        let row = NewAdRow {
            id: *ad.id().as_uuid(),
            user_id: *ad.owner().as_uuid(),
            title: content.title(),
            description: content.description(),
            image_url: content.image_url(),
            categories: category_strings(content),
            condition: content.condition().as_str(),
            created_at: ad.created_at(),
        };
        diesel::insert_into(ads::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, ad: &Ad) -> Result<bool, AdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let content = ad.content();
        let changes = AdChangeset {
            title: content.title(),
            description: content.description(),
            image_url: content.image_url(),
            categories: category_strings(content),
            condition: content.condition().as_str(),
        };
        let updated = diesel::update(ads::table.filter(ads::id.eq(ad.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &AdId) -> Result<bool, AdRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(ads::table.filter(ads::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
