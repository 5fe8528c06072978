//! Handlers for link management endpoints (create, list, get, update, delete).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::LinkDetail;
use crate::api::dto::pagination::ListParams;
use crate::api::dto::shorten::{LinkView, ShortenRequest};
use crate::api::dto::update_link::UpdateLinkRequest;
use crate::api::dto::{ApiResponse, MessageResponse};
use crate::api::extract::{ApiJson, ApiQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/urls/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "destinationUrl": "https://example.com/page",
///   "alias": "promo",
///   "description": "Spring campaign",
///   "expiresAt": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// Only `destinationUrl` is required.
///
/// # Response
///
/// `201 Created`:
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "destinationUrl": "https://example.com/page",
///     "shortUrl": "http://localhost:5000/promo",
///     "code": "promo",
///     "createdAt": "2025-01-01T12:00:00Z",
///     "description": "Spring campaign"
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request on a malformed body, an invalid URL, an invalid
/// alias or an alias that is already taken.
pub async fn shorten_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ShortenRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LinkView>>), AppError> {
    payload.validate()?;

    let record = state
        .link_service
        .create_short_link(
            payload.destination_url,
            payload.alias,
            payload.description,
            payload.expires_at,
        )
        .await?;

    let short_url = state.link_service.short_url(&record.code);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(LinkView::from_record(&record, short_url))),
    ))
}

/// Lists links, most recently created first.
///
/// # Endpoint
///
/// `GET /api/urls?limit=50&offset=0`
///
/// `limit` defaults to 50 and is capped at 50.
pub async fn list_links_handler(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<ApiResponse<Vec<LinkDetail>>>, AppError> {
    let records = state
        .link_service
        .list_links(params.limit, params.offset)
        .await?;

    let links = records
        .into_iter()
        .map(|record| {
            let short_url = state.link_service.short_url(&record.code);
            LinkDetail::from_record(record, short_url)
        })
        .collect();

    Ok(Json(ApiResponse::ok(links)))
}

/// Returns one link including its click history.
///
/// # Endpoint
///
/// `GET /api/urls/{code}`
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LinkDetail>>, AppError> {
    let record = state.link_service.get_link(&code).await?;
    let short_url = state.link_service.short_url(&record.code);

    Ok(Json(ApiResponse::ok(LinkDetail::from_record(
        record, short_url,
    ))))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/urls/{code}`
///
/// # Request Body
///
/// ```json
/// {
///   "description": "New text",
///   "active": false,
///   "expiresAt": null
/// }
/// ```
///
/// All fields are optional. `expiresAt: null` clears the expiry.
pub async fn update_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UpdateLinkRequest>,
) -> Result<Json<ApiResponse<LinkDetail>>, AppError> {
    payload.validate()?;

    let record = state.link_service.update_link(&code, payload.into()).await?;
    let short_url = state.link_service.short_url(&record.code);

    Ok(Json(ApiResponse::ok(LinkDetail::from_record(
        record, short_url,
    ))))
}

/// Deletes a link and its click history.
///
/// # Endpoint
///
/// `DELETE /api/urls/{code}`
///
/// The code becomes free for reuse immediately.
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state.link_service.delete_link(&code).await?;

    Ok(Json(MessageResponse::ok("URL deleted successfully")))
}
