//! Ads API handlers.
//!
//! ```text
//! GET    /api/v1/ads?category=&condition=
//! POST   /api/v1/ads
//! GET    /api/v1/ads/{ad_id}
//! PUT    /api/v1/ads/{ad_id}
//! DELETE /api/v1/ads/{ad_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::{AdListFilter, CreateAdRequest, DeleteAdRequest, UpdateAdRequest};
use crate::domain::{Ad, AdDraft, AdId, AdSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_optional_slug};

const AD_ID: FieldName = FieldName::new("ad_id");
const CATEGORY: FieldName = FieldName::new("category");
const CONDITION: FieldName = FieldName::new("condition");

/// Catalog filters for the ad listing.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdListQuery {
    /// Only ads tagged with this category slug.
    pub category: Option<String>,
    /// Only ads in this condition.
    pub condition: Option<String>,
}

/// Ad fields supplied on create and update.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdPayload {
    #[schema(example = "Road bike")]
    pub title: String,
    #[schema(example = "56cm frame, new tyres")]
    pub description: String,
    #[serde(default)]
    #[schema(example = "ads/road-bike.jpg")]
    pub image_url: Option<String>,
    #[schema(example = json!(["bikes", "sport"]))]
    pub categories: Vec<String>,
    #[schema(example = "used")]
    pub condition: String,
}

impl From<AdPayload> for AdDraft {
    fn from(value: AdPayload) -> Self {
        Self {
            title: value.title,
            description: value.description,
            image_url: value.image_url,
            categories: value.categories,
            condition: value.condition,
        }
    }
}

/// Ad as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub condition: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Ad> for AdResponse {
    fn from(ad: &Ad) -> Self {
        let content = ad.content();
        Self {
            id: *ad.id().as_uuid(),
            owner: *ad.owner().as_uuid(),
            title: content.title().to_owned(),
            description: content.description().to_owned(),
            image_url: content.image_url().map(str::to_owned),
            categories: content
                .categories()
                .iter()
                .map(|slug| slug.as_str().to_owned())
                .collect(),
            condition: content.condition().as_str().to_owned(),
            created_at: ad.created_at(),
        }
    }
}

/// Ad fields embedded in exchange proposal views.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdSummaryResponse {
    pub id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub condition: String,
}

impl From<AdSummary> for AdSummaryResponse {
    fn from(summary: AdSummary) -> Self {
        Self {
            id: *summary.id.as_uuid(),
            owner: *summary.owner.as_uuid(),
            title: summary.title,
            description: summary.description,
            image_url: summary.image_url,
            categories: summary.categories.into_iter().map(String::from).collect(),
            condition: summary.condition.into(),
        }
    }
}

/// List ads, newest first, optionally narrowed by category and condition.
#[utoipa::path(
    get,
    path = "/api/v1/ads",
    params(AdListQuery),
    responses(
        (status = 200, description = "Ads", body = [AdResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "listAds"
)]
#[get("/ads")]
pub async fn list_ads(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AdListQuery>,
) -> ApiResult<web::Json<Vec<AdResponse>>> {
    session.require_user_id()?;
    let AdListQuery {
        category,
        condition,
    } = query.into_inner();
    let filter = AdListFilter {
        category: parse_optional_slug(category.as_deref(), CATEGORY)?,
        condition: parse_optional_slug(condition.as_deref(), CONDITION)?,
    };
    let ads = state.ads_query.list_ads(filter).await?;
    Ok(web::Json(ads.iter().map(AdResponse::from).collect()))
}

/// Publish an ad owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/ads",
    request_body = AdPayload,
    responses(
        (status = 201, description = "Ad created", body = AdResponse),
        (status = 400, description = "Invalid ad", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "createAd"
)]
#[post("/ads")]
pub async fn create_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AdPayload>,
) -> ApiResult<HttpResponse> {
    let acting_user = session.require_user_id()?;
    let ad = state
        .ads
        .create_ad(CreateAdRequest {
            acting_user,
            draft: payload.into_inner().into(),
        })
        .await?;
    Ok(HttpResponse::Created().json(AdResponse::from(&ad)))
}

/// Fetch a single ad.
#[utoipa::path(
    get,
    path = "/api/v1/ads/{ad_id}",
    params(("ad_id" = String, Path, description = "Ad identifier")),
    responses(
        (status = 200, description = "Ad", body = AdResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown ad", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "getAd"
)]
#[get("/ads/{ad_id}")]
pub async fn get_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<AdResponse>> {
    session.require_user_id()?;
    let ad_id: AdId = parse_id(&path, AD_ID)?;
    let ad = state.ads_query.get_ad(ad_id).await?;
    Ok(web::Json(AdResponse::from(&ad)))
}

/// Replace the content of an ad the caller owns.
#[utoipa::path(
    put,
    path = "/api/v1/ads/{ad_id}",
    params(("ad_id" = String, Path, description = "Ad identifier")),
    request_body = AdPayload,
    responses(
        (status = 200, description = "Ad updated", body = AdResponse),
        (status = 400, description = "Invalid ad", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Caller does not own the ad", body = ErrorSchema),
        (status = 404, description = "Unknown ad", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "updateAd"
)]
#[put("/ads/{ad_id}")]
pub async fn update_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AdPayload>,
) -> ApiResult<web::Json<AdResponse>> {
    let acting_user = session.require_user_id()?;
    let ad_id = parse_id(&path, AD_ID)?;
    let ad = state
        .ads
        .update_ad(UpdateAdRequest {
            acting_user,
            ad_id,
            draft: payload.into_inner().into(),
        })
        .await?;
    Ok(web::Json(AdResponse::from(&ad)))
}

/// Remove an ad the caller owns, together with proposals that reference it.
#[utoipa::path(
    delete,
    path = "/api/v1/ads/{ad_id}",
    params(("ad_id" = String, Path, description = "Ad identifier")),
    responses(
        (status = 204, description = "Ad deleted"),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Caller does not own the ad", body = ErrorSchema),
        (status = 404, description = "Unknown ad", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "deleteAd"
)]
#[delete("/ads/{ad_id}")]
pub async fn delete_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let acting_user = session.require_user_id()?;
    let ad_id = parse_id(&path, AD_ID)?;
    state
        .ads
        .delete_ad(DeleteAdRequest { acting_user, ad_id })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
