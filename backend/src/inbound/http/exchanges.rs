//! Exchange proposal handlers.
//!
//! ```text
//! POST /api/v1/propose/{user_id}            {"senderAd":..,"receiverAd":..,"comment":..}
//! PUT  /api/v1/exchanges/{exchange_id}      {"status":"accepted"}
//! GET  /api/v1/exchanges/{exchange_id}
//! GET  /api/v1/exchanges/sent?receiverUser=&status=
//! GET  /api/v1/exchanges/received?status=
//! ```
//!
//! Proposing and responding both answer `201 Created`; clients of the
//! marketplace rely on that status for responses too.

use actix_web::{HttpResponse, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{
    GetExchangeRequest, ListReceivedRequest, ListSentRequest, ProposeRequest, RespondRequest,
};
use crate::domain::{ExchangeView, ProposalStatus, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::ads::AdSummaryResponse;
use crate::inbound::http::schemas::{ErrorSchema, ProposalStatusSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_optional_status, parse_status,
};

const USER_ID: FieldName = FieldName::new("user_id");
const EXCHANGE_ID: FieldName = FieldName::new("exchange_id");
const SENDER_AD: FieldName = FieldName::new("senderAd");
const RECEIVER_AD: FieldName = FieldName::new("receiverAd");
const RECEIVER_USER: FieldName = FieldName::new("receiverUser");
const STATUS: FieldName = FieldName::new("status");

/// Body of `POST /api/v1/propose/{user_id}`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposePayload {
    /// Ad offered by the caller.
    #[schema(example = "0b6f3c4e-1f0a-4d52-9a57-3a8e5f7b9c10")]
    pub sender_ad: String,
    /// Ad requested from the target user.
    #[schema(example = "7d2e9a41-5c3b-4f86-b0e2-61c9d4a8f735")]
    pub receiver_ad: String,
    #[schema(example = "Would you swap your bike for my guitar?")]
    pub comment: String,
}

/// Body of `PUT /api/v1/exchanges/{exchange_id}`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RespondPayload {
    /// `accepted` or `rejected`.
    #[schema(example = "accepted")]
    pub status: String,
}

/// Filters for proposals the caller sent.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct SentFilter {
    /// Only proposals for ads owned by this user.
    pub receiver_user: Option<String>,
    /// `pending`, `accepted` or `rejected`.
    pub status: Option<String>,
}

/// Filters for proposals the caller received.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReceivedFilter {
    /// `pending`, `accepted` or `rejected`.
    pub status: Option<String>,
}

/// Proposal with summaries of both ads.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
    pub id: Uuid,
    pub sender_ad: AdSummaryResponse,
    pub receiver_ad: AdSummaryResponse,
    pub comment: String,
    #[schema(value_type = ProposalStatusSchema)]
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ExchangeView> for ExchangeResponse {
    fn from(view: ExchangeView) -> Self {
        let ExchangeView {
            proposal,
            sender_ad,
            receiver_ad,
        } = view;
        Self {
            id: *proposal.id().as_uuid(),
            sender_ad: sender_ad.into(),
            receiver_ad: receiver_ad.into(),
            comment: proposal.comment().as_str().to_owned(),
            status: proposal.status(),
            created_at: proposal.created_at(),
        }
    }
}

fn respond_list(views: Vec<ExchangeView>) -> web::Json<Vec<ExchangeResponse>> {
    web::Json(views.into_iter().map(ExchangeResponse::from).collect())
}

/// Offer one of the caller's ads for an ad owned by `user_id`.
#[utoipa::path(
    post,
    path = "/api/v1/propose/{user_id}",
    params(("user_id" = String, Path, description = "Owner of the requested ad")),
    request_body = ProposePayload,
    responses(
        (status = 201, description = "Proposal created", body = ExchangeResponse),
        (status = 400, description = "Invalid request or duplicate proposal", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Ad ownership mismatch", body = ErrorSchema),
        (status = 404, description = "Unknown user or ad", body = ErrorSchema)
    ),
    tags = ["exchanges"],
    operation_id = "proposeExchange"
)]
#[post("/propose/{user_id}")]
pub async fn propose(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ProposePayload>,
) -> ApiResult<HttpResponse> {
    let acting_user = session.require_user_id()?;
    let target_user: UserId = parse_id(&path, USER_ID)?;
    let ProposePayload {
        sender_ad,
        receiver_ad,
        comment,
    } = payload.into_inner();
    let request = ProposeRequest {
        acting_user,
        target_user,
        sender_ad: parse_id(&sender_ad, SENDER_AD)?,
        receiver_ad: parse_id(&receiver_ad, RECEIVER_AD)?,
        comment,
    };
    let view = state.exchanges.propose(request).await?;
    Ok(HttpResponse::Created().json(ExchangeResponse::from(view)))
}

/// Accept or reject a proposal for one of the caller's ads.
#[utoipa::path(
    put,
    path = "/api/v1/exchanges/{exchange_id}",
    params(("exchange_id" = String, Path, description = "Proposal identifier")),
    request_body = RespondPayload,
    responses(
        (status = 201, description = "Proposal resolved", body = ExchangeResponse),
        (status = 400, description = "Invalid status or proposal already resolved", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Caller does not own the requested ad", body = ErrorSchema),
        (status = 404, description = "Unknown proposal", body = ErrorSchema)
    ),
    tags = ["exchanges"],
    operation_id = "respondToExchange"
)]
#[put("/exchanges/{exchange_id}")]
pub async fn respond(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RespondPayload>,
) -> ApiResult<HttpResponse> {
    let acting_user = session.require_user_id()?;
    let request = RespondRequest {
        acting_user,
        proposal_id: parse_id(&path, EXCHANGE_ID)?,
        status: parse_status(&payload.status, STATUS)?,
    };
    let view = state.exchanges.respond(request).await?;
    Ok(HttpResponse::Created().json(ExchangeResponse::from(view)))
}

/// Fetch a single proposal.
#[utoipa::path(
    get,
    path = "/api/v1/exchanges/{exchange_id}",
    params(("exchange_id" = String, Path, description = "Proposal identifier")),
    responses(
        (status = 200, description = "Proposal", body = ExchangeResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown proposal", body = ErrorSchema)
    ),
    tags = ["exchanges"],
    operation_id = "getExchange"
)]
#[get("/exchanges/{exchange_id}")]
pub async fn get_exchange(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExchangeResponse>> {
    let acting_user = session.require_user_id()?;
    let request = GetExchangeRequest {
        acting_user,
        proposal_id: parse_id(&path, EXCHANGE_ID)?,
    };
    let view = state.exchanges_query.get(request).await?;
    Ok(web::Json(view.into()))
}

/// Proposals whose sender ad belongs to the caller, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/exchanges/sent",
    params(SentFilter),
    responses(
        (status = 200, description = "Sent proposals", body = [ExchangeResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["exchanges"],
    operation_id = "listSentExchanges"
)]
#[get("/exchanges/sent")]
pub async fn list_sent(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<SentFilter>,
) -> ApiResult<web::Json<Vec<ExchangeResponse>>> {
    let acting_user = session.require_user_id()?;
    let SentFilter {
        receiver_user,
        status,
    } = filter.into_inner();
    let request = ListSentRequest {
        acting_user,
        counterpart: receiver_user
            .as_deref()
            .map(|raw| parse_id(raw, RECEIVER_USER))
            .transpose()?,
        status: parse_optional_status(status.as_deref(), STATUS)?,
    };
    let views = state.exchanges_query.list_sent(request).await?;
    Ok(respond_list(views))
}

/// Proposals whose receiver ad belongs to the caller, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/exchanges/received",
    params(ReceivedFilter),
    responses(
        (status = 200, description = "Received proposals", body = [ExchangeResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["exchanges"],
    operation_id = "listReceivedExchanges"
)]
#[get("/exchanges/received")]
pub async fn list_received(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<ReceivedFilter>,
) -> ApiResult<web::Json<Vec<ExchangeResponse>>> {
    let acting_user = session.require_user_id()?;
    let request = ListReceivedRequest {
        acting_user,
        status: parse_optional_status(filter.status.as_deref(), STATUS)?,
    };
    let views = state.exchanges_query.list_received(request).await?;
    Ok(respond_list(views))
}
