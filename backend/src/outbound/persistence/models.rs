//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them into
//! validated domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{ads, catalog_entries, exchange_proposals, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub condition: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ads)]
pub(crate) struct NewAdRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub image_url: Option<&'a str>,
    pub categories: Vec<String>,
    pub condition: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Owner-editable ad columns. `image_url` is always written so clearing it
/// stores `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = ads)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AdChangeset<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub image_url: Option<&'a str>,
    pub categories: Vec<String>,
    pub condition: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = catalog_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CatalogRow {
    pub kind: String,
    pub slug: String,
    pub title: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = catalog_entries)]
pub(crate) struct NewCatalogRow<'a> {
    pub kind: &'a str,
    pub slug: &'a str,
    pub title: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = exchange_proposals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProposalRow {
    pub id: Uuid,
    pub ad_sender_id: Uuid,
    pub ad_receiver_id: Uuid,
    pub comment: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = exchange_proposals)]
pub(crate) struct NewProposalRow<'a> {
    pub id: Uuid,
    pub ad_sender_id: Uuid,
    pub ad_receiver_id: Uuid,
    pub comment: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}
