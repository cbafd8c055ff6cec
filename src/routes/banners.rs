use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    models::auth::Actor,
    models::banner::{BannerView, CreateBannerRequest, UpdateBannerRequest},
    services::banners::BannerService,
    services::error::BannerError,
    services::search::SearchParams,
    AppState,
};

#[derive(Deserialize)]
pub struct ActiveQuery {
    pub url_path: Option<String>,
}

/// GET /banners/active — public endpoint, banners active for the given path
/// right now.
pub async fn active_banners(
    State(state): State<AppState>,
    Query(query): Query<ActiveQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let path = query.url_path.unwrap_or_else(|| "/".to_string());
    let banners = BannerService::resolve_active(&state.db, &path, Utc::now())
        .await
        .map_err(error_response)?;

    let hits: Vec<BannerView> = banners.iter().map(BannerView::from).collect();
    Ok(Json(json!({ "total": hits.len(), "hits": hits })))
}

/// GET /banners/active/first — single-slot variant, returns the first
/// active banner for the path or null.
pub async fn first_active_banner(
    State(state): State<AppState>,
    Query(query): Query<ActiveQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let path = query.url_path.unwrap_or_else(|| "/".to_string());
    let banner = BannerService::first_active(&state.db, &path, Utc::now())
        .await
        .map_err(error_response)?;

    match banner {
        Some(b) => Ok(Json(json!(BannerView::from(&b)))),
        None => Ok(Json(json!(null))),
    }
}

/// GET /banners — admin search with free-text filter, sort and pagination.
pub async fn search_banners(
    State(state): State<AppState>,
    actor: Actor,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let page = BannerService::search(&state.db, &state.config.banners, &actor, &params)
        .await
        .map_err(error_response)?;

    let items: Vec<BannerView> = page.items.iter().map(BannerView::from).collect();
    Ok(Json(json!({
        "items": items,
        "total": page.total,
        "page":  page.page,
        "size":  page.size,
    })))
}

/// POST /banners
pub async fn create_banner(
    State(state): State<AppState>,
    actor: Actor,
    Json(body): Json<CreateBannerRequest>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let banner = BannerService::create(&state.db, &state.config.banners, &actor, body)
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(json!(BannerView::from(&banner)))))
}

/// GET /banners/{id}
pub async fn read_banner(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let banner = BannerService::read(&state.db, &actor, id)
        .await
        .map_err(error_response)?;

    Ok(Json(json!(BannerView::from(&banner))))
}

/// PUT /banners/{id} — partial update, only supplied fields change.
pub async fn update_banner(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateBannerRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let banner = BannerService::update(&state.db, &state.config.banners, &actor, id, body)
        .await
        .map_err(error_response)?;

    Ok(Json(json!(BannerView::from(&banner))))
}

/// DELETE /banners/{id}
pub async fn delete_banner(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    BannerService::delete(&state.db, &actor, id)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({ "ok": true })))
}

/// POST /banners/disable-expired — explicit sweep of expired banners.
pub async fn disable_expired(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let disabled = BannerService::disable_expired(&state.db, &actor)
        .await
        .map_err(error_response)?;

    Ok(Json(json!({ "disabled": disabled })))
}

fn error_response(err: BannerError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        BannerError::Validation(_)
        | BannerError::InvalidSortField { .. }
        | BannerError::InvalidSortDirection { .. } => StatusCode::BAD_REQUEST,
        BannerError::NotFound { .. } => StatusCode::NOT_FOUND,
        BannerError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
        BannerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}
