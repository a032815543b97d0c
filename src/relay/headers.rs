//! Response header filtering
//!
//! Upstream response headers are forwarded to the caller minus the
//! connection-scoped ones, which describe the gateway-to-upstream hop and
//! would corrupt the caller-facing connection.

use reqwest::header::{self, HeaderMap, HeaderName};

/// Hop-by-hop headers that must never be relayed
const HOP_BY_HOP_HEADERS: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Check if a header is a hop-by-hop header that should not be relayed
pub fn is_hop_by_hop_header(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(name)
}

/// Copy an upstream response's headers, dropping hop-by-hop entries.
pub fn filter_response_headers(upstream_headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::new();

    for (name, value) in upstream_headers {
        if !is_hop_by_hop_header(name) {
            filtered.insert(name.clone(), value.clone());
        }
    }

    filtered
}
