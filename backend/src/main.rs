//! Server entry-point: loads settings, builds adapters, and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{Repositories, ServerConfig, ServerSettings, build_http_state, create_server, system_clock};
use swapmeet::inbound::http::health::HealthState;
use swapmeet::inbound::http::session_config::{BuildMode, session_settings};
use swapmeet::inbound::http::state::HttpState;
use swapmeet::outbound::persistence::{DbPool, run_pending_migrations};

/// Build the port implementations selected by configuration.
async fn build_state(settings: &ServerSettings) -> std::io::Result<HttpState> {
    let Some(pool_config) = settings.pool_config() else {
        warn!("no database configured; using in-memory storage");
        return Ok(build_http_state(Repositories::in_memory(), system_clock()));
    };
    if settings.run_migrations {
        run_pending_migrations(pool_config.database_url())
            .await
            .map_err(std::io::Error::other)?;
    }
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;
    info!("database pool ready");
    Ok(build_http_state(Repositories::postgres(&pool), system_clock()))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let session = session_settings(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;
    let http_state = build_state(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        ServerConfig {
            session,
            bind_addr,
            http_state,
        },
    )?;
    info!(%bind_addr, "listening");
    server.await
}
