//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AdCommand, AdQuery, CatalogCommand, CatalogQuery, ExchangeCommand, ExchangeQuery,
    FixtureAdCommand, FixtureAdQuery, FixtureCatalogCommand, FixtureCatalogQuery,
    FixtureExchangeCommand, FixtureExchangeQuery, FixtureLoginService, LoginService,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use swapmeet::domain::ports::FixtureExchangeQuery;
/// use swapmeet::inbound::http::state::HttpState;
///
/// let state = HttpState {
///     exchanges_query: Arc::new(FixtureExchangeQuery),
///     ..HttpState::default()
/// };
/// let _query = state.exchanges_query.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub ads: Arc<dyn AdCommand>,
    pub ads_query: Arc<dyn AdQuery>,
    pub catalog: Arc<dyn CatalogCommand>,
    pub catalog_query: Arc<dyn CatalogQuery>,
    pub exchanges: Arc<dyn ExchangeCommand>,
    pub exchanges_query: Arc<dyn ExchangeQuery>,
}

impl Default for HttpState {
    /// State wired entirely to fixture ports.
    fn default() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            ads: Arc::new(FixtureAdCommand),
            ads_query: Arc::new(FixtureAdQuery),
            catalog: Arc::new(FixtureCatalogCommand),
            catalog_query: Arc::new(FixtureCatalogQuery),
            exchanges: Arc::new(FixtureExchangeCommand),
            exchanges_query: Arc::new(FixtureExchangeQuery),
        }
    }
}
