//! Client identity for rate limiting.
//!
//! Order: first entry of `x-forwarded-for`, then `x-real-ip`, then the TCP peer
//! address, then [`ClientKey::UNKNOWN`]. Headers are trusted as given; deploy
//! behind a proxy that overwrites them.

use std::net::SocketAddr;

use axum::http::HeaderMap;
use prompthancer::ClientKey;

const FORWARDED_FOR: &str = "x-forwarded-for";
const REAL_IP: &str = "x-real-ip";

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub(crate) fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> ClientKey {
    if let Some(first) = header_value(headers, FORWARDED_FOR)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return ClientKey::new(first);
    }
    if let Some(real) = header_value(headers, REAL_IP) {
        return ClientKey::new(real);
    }
    match peer {
        Some(addr) => ClientKey::new(addr.ip().to_string()),
        None => ClientKey::unknown(),
    }
}
