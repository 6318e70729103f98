//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler plus the health probes, the
//! DTOs they exchange, and the schema wrappers ([`ErrorSchema`],
//! [`ErrorCodeSchema`], [`ProposalStatusSchema`]) that describe domain types
//! without coupling them to utoipa.
//!
//! The document backs Swagger UI in debug builds and is exported with
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::ads::{AdPayload, AdResponse, AdSummaryResponse};
use crate::inbound::http::catalog::{CatalogEntryResponse, CatalogPayload, CatalogTitlePayload};
use crate::inbound::http::exchanges::{ExchangeResponse, ProposePayload, RespondPayload};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, ProposalStatusSchema};
use crate::inbound::http::users::LoginRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the marketplace API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Swapmeet API",
        description = "Classified ads and the exchange proposals users make between them.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::ads::list_ads,
        crate::inbound::http::ads::create_ad,
        crate::inbound::http::ads::get_ad,
        crate::inbound::http::ads::update_ad,
        crate::inbound::http::ads::delete_ad,
        crate::inbound::http::catalog::list_categories,
        crate::inbound::http::catalog::create_category,
        crate::inbound::http::catalog::get_category,
        crate::inbound::http::catalog::update_category,
        crate::inbound::http::catalog::delete_category,
        crate::inbound::http::catalog::list_conditions,
        crate::inbound::http::catalog::create_condition,
        crate::inbound::http::catalog::get_condition,
        crate::inbound::http::catalog::update_condition,
        crate::inbound::http::catalog::delete_condition,
        crate::inbound::http::exchanges::propose,
        crate::inbound::http::exchanges::respond,
        crate::inbound::http::exchanges::get_exchange,
        crate::inbound::http::exchanges::list_sent,
        crate::inbound::http::exchanges::list_received,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ProposalStatusSchema,
        LoginRequest,
        AdPayload,
        AdResponse,
        AdSummaryResponse,
        CatalogPayload,
        CatalogTitlePayload,
        CatalogEntryResponse,
        ProposePayload,
        RespondPayload,
        ExchangeResponse
    )),
    tags(
        (name = "users", description = "Session login and logout"),
        (name = "ads", description = "Classified ads"),
        (name = "catalog", description = "Ad categories and item conditions"),
        (name = "exchanges", description = "Exchange proposals between ads"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
