//! Builders wiring port implementations into [`HttpState`].
//!
//! One generic builder serves both storage backends: the in-memory store
//! implements every driven port itself, while PostgreSQL uses one Diesel
//! repository per port over a shared pool.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use swapmeet::domain::ports::{
    AdRepository, CatalogRepository, DEV_STAFF, ExchangeRepository, UserDirectory,
};
use swapmeet::domain::{AdService, CatalogService, DirectoryLoginService, ExchangeService};
use swapmeet::inbound::http::state::HttpState;
use swapmeet::outbound::memory::MemoryStore;
use swapmeet::outbound::persistence::{
    DbPool, DieselAdRepository, DieselCatalogRepository, DieselExchangeRepository,
    DieselUserDirectory,
};

/// Driven ports shared by the domain services.
pub struct Repositories<U, A, E, C> {
    pub users: Arc<U>,
    pub ads: Arc<A>,
    pub exchanges: Arc<E>,
    pub catalog: Arc<C>,
}

impl Repositories<MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    /// Back every port with one process-local store.
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: Arc::clone(&store),
            ads: Arc::clone(&store),
            exchanges: Arc::clone(&store),
            catalog: store,
        }
    }
}

impl
    Repositories<
        DieselUserDirectory,
        DieselAdRepository,
        DieselExchangeRepository,
        DieselCatalogRepository,
    >
{
    /// Back every port with PostgreSQL.
    pub fn postgres(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserDirectory::new(pool.clone())),
            ads: Arc::new(DieselAdRepository::new(pool.clone())),
            exchanges: Arc::new(DieselExchangeRepository::new(pool.clone())),
            catalog: Arc::new(DieselCatalogRepository::new(pool.clone())),
        }
    }
}

/// Assemble the HTTP state from repositories and a clock.
///
/// The `admin` development account is the only catalog curator.
pub fn build_http_state<U, A, E, C>(
    repos: Repositories<U, A, E, C>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserDirectory + 'static,
    A: AdRepository + 'static,
    E: ExchangeRepository + 'static,
    C: CatalogRepository + 'static,
{
    let Repositories {
        users,
        ads,
        exchanges,
        catalog,
    } = repos;
    let ad_service = Arc::new(AdService::new(
        Arc::clone(&ads),
        Arc::clone(&catalog),
        Arc::clone(&clock),
    ));
    let catalog_service = Arc::new(CatalogService::new(catalog, vec![DEV_STAFF]));
    let exchange_service = Arc::new(ExchangeService::new(
        Arc::clone(&users),
        ads,
        exchanges,
        clock,
    ));
    HttpState {
        login: Arc::new(DirectoryLoginService::new(users)),
        ads: ad_service.clone(),
        ads_query: ad_service,
        catalog: catalog_service.clone(),
        catalog_query: catalog_service,
        exchanges: exchange_service.clone(),
        exchanges_query: exchange_service,
    }
}

/// Production clock shared by every service.
pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(DefaultClock)
}
