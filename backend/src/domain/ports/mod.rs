//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`LoginService`]) are called by
//! inbound adapters. Driven ports ([`UserDirectory`], [`AdRepository`],
//! [`CatalogRepository`], [`ExchangeRepository`]) are implemented by
//! outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod ad_command;
mod ad_query;
mod ad_repository;
mod catalog_command;
mod catalog_query;
mod catalog_repository;
mod exchange_command;
mod exchange_query;
mod exchange_repository;
mod login_service;
mod user_directory;

#[cfg(test)]
pub use ad_command::MockAdCommand;
pub use ad_command::{AdCommand, CreateAdRequest, DeleteAdRequest, FixtureAdCommand, UpdateAdRequest};
#[cfg(test)]
pub use ad_query::MockAdQuery;
pub use ad_query::{AdQuery, FixtureAdQuery};
#[cfg(test)]
pub use ad_repository::MockAdRepository;
pub use ad_repository::{AdListFilter, AdRepository, AdRepositoryError, FixtureAdRepository};
#[cfg(test)]
pub use catalog_command::MockCatalogCommand;
pub use catalog_command::{
    CatalogCommand, CreateCatalogEntryRequest, DeleteCatalogEntryRequest, FixtureCatalogCommand,
    UpdateCatalogEntryRequest,
};
#[cfg(test)]
pub use catalog_query::MockCatalogQuery;
pub use catalog_query::{CatalogQuery, FixtureCatalogQuery};
#[cfg(test)]
pub use catalog_repository::MockCatalogRepository;
pub use catalog_repository::{
    CatalogDeleteOutcome, CatalogRepository, CatalogRepositoryError, FixtureCatalogRepository,
};
#[cfg(test)]
pub use exchange_command::MockExchangeCommand;
pub use exchange_command::{ExchangeCommand, FixtureExchangeCommand, ProposeRequest, RespondRequest};
#[cfg(test)]
pub use exchange_query::MockExchangeQuery;
pub use exchange_query::{
    ExchangeQuery, FixtureExchangeQuery, GetExchangeRequest, ListReceivedRequest, ListSentRequest,
};
#[cfg(test)]
pub use exchange_repository::MockExchangeRepository;
pub use exchange_repository::{
    ExchangeListFilter, ExchangeRepository, ExchangeRepositoryError, FixtureExchangeRepository,
    ResolveOutcome,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    DEV_ACCOUNTS, DEV_PASSWORD, DEV_STAFF, FixtureLoginService, LoginService, dev_account,
};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
