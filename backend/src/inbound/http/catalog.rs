//! Category and condition catalog handlers.
//!
//! ```text
//! GET    /api/v1/categories          GET    /api/v1/conditions
//! POST   /api/v1/categories          POST   /api/v1/conditions
//! GET    /api/v1/categories/{slug}   GET    /api/v1/conditions/{slug}
//! PUT    /api/v1/categories/{slug}   PUT    /api/v1/conditions/{slug}
//! DELETE /api/v1/categories/{slug}   DELETE /api/v1/conditions/{slug}
//! ```
//!
//! Both kinds share one set of helpers; the handlers only fix the kind.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    CreateCatalogEntryRequest, DeleteCatalogEntryRequest, UpdateCatalogEntryRequest,
};
use crate::domain::{CatalogEntry, CatalogKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_slug};

const SLUG: FieldName = FieldName::new("slug");

/// New catalog entry.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CatalogPayload {
    #[schema(example = "board-games")]
    pub slug: String,
    #[schema(example = "Board games")]
    pub title: String,
}

/// Replacement title for an existing entry.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CatalogTitlePayload {
    #[schema(example = "Board games")]
    pub title: String,
}

/// Catalog entry as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CatalogEntryResponse {
    pub slug: String,
    pub title: String,
}

impl From<&CatalogEntry> for CatalogEntryResponse {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            slug: entry.slug().as_str().to_owned(),
            title: entry.title().to_owned(),
        }
    }
}

async fn list_entries(
    state: &HttpState,
    session: &SessionContext,
    kind: CatalogKind,
) -> ApiResult<web::Json<Vec<CatalogEntryResponse>>> {
    session.require_user_id()?;
    let entries = state.catalog_query.list_entries(kind).await?;
    Ok(web::Json(
        entries.iter().map(CatalogEntryResponse::from).collect(),
    ))
}

async fn get_entry(
    state: &HttpState,
    session: &SessionContext,
    kind: CatalogKind,
    slug: &str,
) -> ApiResult<web::Json<CatalogEntryResponse>> {
    session.require_user_id()?;
    let slug = parse_slug(slug, SLUG)?;
    let entry = state.catalog_query.get_entry(kind, slug).await?;
    Ok(web::Json(CatalogEntryResponse::from(&entry)))
}

async fn create_entry(
    state: &HttpState,
    session: &SessionContext,
    kind: CatalogKind,
    payload: CatalogPayload,
) -> ApiResult<HttpResponse> {
    let acting_user = session.require_user_id()?;
    let entry = state
        .catalog
        .create_entry(CreateCatalogEntryRequest {
            acting_user,
            kind,
            slug: payload.slug,
            title: payload.title,
        })
        .await?;
    Ok(HttpResponse::Created().json(CatalogEntryResponse::from(&entry)))
}

async fn update_entry(
    state: &HttpState,
    session: &SessionContext,
    kind: CatalogKind,
    slug: &str,
    payload: CatalogTitlePayload,
) -> ApiResult<web::Json<CatalogEntryResponse>> {
    let acting_user = session.require_user_id()?;
    let slug = parse_slug(slug, SLUG)?;
    let entry = state
        .catalog
        .update_entry(UpdateCatalogEntryRequest {
            acting_user,
            kind,
            slug,
            title: payload.title,
        })
        .await?;
    Ok(web::Json(CatalogEntryResponse::from(&entry)))
}

async fn delete_entry(
    state: &HttpState,
    session: &SessionContext,
    kind: CatalogKind,
    slug: &str,
) -> ApiResult<HttpResponse> {
    let acting_user = session.require_user_id()?;
    let slug = parse_slug(slug, SLUG)?;
    state
        .catalog
        .delete_entry(DeleteCatalogEntryRequest {
            acting_user,
            kind,
            slug,
        })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List categories ordered by slug.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "Categories", body = [CatalogEntryResponse]),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "listCategories"
)]
#[get("/categories")]
pub async fn list_categories(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CatalogEntryResponse>>> {
    list_entries(&state, &session, CatalogKind::Category).await
}

/// Add a category. Staff only.
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CatalogPayload,
    responses(
        (status = 201, description = "Category created", body = CatalogEntryResponse),
        (status = 400, description = "Invalid or duplicate slug", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Caller is not staff", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "createCategory"
)]
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CatalogPayload>,
) -> ApiResult<HttpResponse> {
    create_entry(&state, &session, CatalogKind::Category, payload.into_inner()).await
}

/// Fetch one category.
#[utoipa::path(
    get,
    path = "/api/v1/categories/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 200, description = "Category", body = CatalogEntryResponse),
        (status = 400, description = "Malformed slug", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "getCategory"
)]
#[get("/categories/{slug}")]
pub async fn get_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CatalogEntryResponse>> {
    get_entry(&state, &session, CatalogKind::Category, &path).await
}

/// Retitle a category. Staff only.
#[utoipa::path(
    put,
    path = "/api/v1/categories/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    request_body = CatalogTitlePayload,
    responses(
        (status = 200, description = "Category updated", body = CatalogEntryResponse),
        (status = 400, description = "Invalid title", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Caller is not staff", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "updateCategory"
)]
#[put("/categories/{slug}")]
pub async fn update_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CatalogTitlePayload>,
) -> ApiResult<web::Json<CatalogEntryResponse>> {
    update_entry(
        &state,
        &session,
        CatalogKind::Category,
        &path,
        payload.into_inner(),
    )
    .await
}

/// Remove a category no ad uses. Staff only.
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{slug}",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Category still in use", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Caller is not staff", body = ErrorSchema),
        (status = 404, description = "Unknown category", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "deleteCategory"
)]
#[delete("/categories/{slug}")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    delete_entry(&state, &session, CatalogKind::Category, &path).await
}

/// List conditions ordered by slug.
#[utoipa::path(
    get,
    path = "/api/v1/conditions",
    responses(
        (status = 200, description = "Conditions", body = [CatalogEntryResponse]),
        (status = 401, description = "Login required", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "listConditions"
)]
#[get("/conditions")]
pub async fn list_conditions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CatalogEntryResponse>>> {
    list_entries(&state, &session, CatalogKind::Condition).await
}

/// Add a condition. Staff only.
#[utoipa::path(
    post,
    path = "/api/v1/conditions",
    request_body = CatalogPayload,
    responses(
        (status = 201, description = "Condition created", body = CatalogEntryResponse),
        (status = 400, description = "Invalid or duplicate slug", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Caller is not staff", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "createCondition"
)]
#[post("/conditions")]
pub async fn create_condition(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CatalogPayload>,
) -> ApiResult<HttpResponse> {
    create_entry(&state, &session, CatalogKind::Condition, payload.into_inner()).await
}

/// Fetch one condition.
#[utoipa::path(
    get,
    path = "/api/v1/conditions/{slug}",
    params(("slug" = String, Path, description = "Condition slug")),
    responses(
        (status = 200, description = "Condition", body = CatalogEntryResponse),
        (status = 400, description = "Malformed slug", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown condition", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "getCondition"
)]
#[get("/conditions/{slug}")]
pub async fn get_condition(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CatalogEntryResponse>> {
    get_entry(&state, &session, CatalogKind::Condition, &path).await
}

/// Retitle a condition. Staff only.
#[utoipa::path(
    put,
    path = "/api/v1/conditions/{slug}",
    params(("slug" = String, Path, description = "Condition slug")),
    request_body = CatalogTitlePayload,
    responses(
        (status = 200, description = "Condition updated", body = CatalogEntryResponse),
        (status = 400, description = "Invalid title", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Caller is not staff", body = ErrorSchema),
        (status = 404, description = "Unknown condition", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "updateCondition"
)]
#[put("/conditions/{slug}")]
pub async fn update_condition(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CatalogTitlePayload>,
) -> ApiResult<web::Json<CatalogEntryResponse>> {
    update_entry(
        &state,
        &session,
        CatalogKind::Condition,
        &path,
        payload.into_inner(),
    )
    .await
}

/// Remove a condition no ad uses. Staff only.
#[utoipa::path(
    delete,
    path = "/api/v1/conditions/{slug}",
    params(("slug" = String, Path, description = "Condition slug")),
    responses(
        (status = 204, description = "Condition deleted"),
        (status = 400, description = "Condition still in use", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 403, description = "Caller is not staff", body = ErrorSchema),
        (status = 404, description = "Unknown condition", body = ErrorSchema)
    ),
    tags = ["catalog"],
    operation_id = "deleteCondition"
)]
#[delete("/conditions/{slug}")]
pub async fn delete_condition(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    delete_entry(&state, &session, CatalogKind::Condition, &path).await
}
