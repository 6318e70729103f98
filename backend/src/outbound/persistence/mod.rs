//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories are thin: they translate between Diesel rows and validated
//! domain types and map failures onto the port error enums. Connections come
//! from a `bb8` pool of `diesel-async` connections.
//!
//! ```ignore
//! use swapmeet::outbound::persistence::{DbPool, DieselAdRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/swapmeet")).await?;
//! let ads = DieselAdRepository::new(pool);
//! ```

mod diesel_ad_repository;
mod diesel_catalog_repository;
mod diesel_exchange_repository;
mod diesel_user_directory;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_ad_repository::DieselAdRepository;
pub use diesel_catalog_repository::DieselCatalogRepository;
pub use diesel_exchange_repository::DieselExchangeRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
