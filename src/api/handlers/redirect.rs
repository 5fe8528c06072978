//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use std::net::SocketAddr;

use crate::domain::entities::ClickMeta;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code to its destination and records the click.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Collect client address, `User-Agent` and `Referer`
/// 2. Resolve the code; the click is committed before this returns
/// 3. Return `302 Found` with `Location`
///
/// # Errors
///
/// - 404 if the code does not exist or the link is inactive
/// - 410 if the link has expired
/// - 503 if the store is unavailable
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let meta = ClickMeta {
        source_ip: Some(client_ip(&headers, addr, state.behind_proxy)),
        user_agent: header_str(&headers, header::USER_AGENT),
        referer: header_str(&headers, header::REFERER),
    };

    let destination = state.redirect_service.resolve(&code, meta).await?;

    let location = HeaderValue::try_from(destination)
        .map_err(|e| AppError::Internal(format!("Invalid Location header: {}", e)))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
