//! Best-effort client address extraction.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Returns the client IP for click recording.
///
/// When `behind_proxy` is set, the first address in `X-Forwarded-For` wins,
/// then `X-Real-IP`; the socket peer address is the fallback. Header values
/// are untrusted and kept as strings.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let ip = client_ip(&headers, "127.0.0.1:5000".parse().unwrap(), true);
/// assert_eq!(ip, "203.0.113.7");
/// ```
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded.or_else(|| header_str(headers, "x-real-ip").map(str::trim)) {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
