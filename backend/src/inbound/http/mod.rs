//! HTTP inbound adapter exposing REST endpoints.

use actix_web::{Scope, web};

pub mod ads;
pub mod catalog;
pub mod error;
pub mod exchanges;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Versioned API routes.
///
/// The literal `/exchanges/sent` and `/exchanges/received` routes are
/// registered ahead of `/exchanges/{exchange_id}` so they are not captured as
/// identifiers.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .service(users::login)
        .service(users::logout)
        .service(ads::list_ads)
        .service(ads::create_ad)
        .service(ads::get_ad)
        .service(ads::update_ad)
        .service(ads::delete_ad)
        .service(catalog::list_categories)
        .service(catalog::create_category)
        .service(catalog::get_category)
        .service(catalog::update_category)
        .service(catalog::delete_category)
        .service(catalog::list_conditions)
        .service(catalog::create_condition)
        .service(catalog::get_condition)
        .service(catalog::update_condition)
        .service(catalog::delete_condition)
        .service(exchanges::propose)
        .service(exchanges::list_sent)
        .service(exchanges::list_received)
        .service(exchanges::get_exchange)
        .service(exchanges::respond)
}
