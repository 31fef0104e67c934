//! Client identity for rate limiting.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// First X-Forwarded-For entry if present, else the peer IP, else `"unknown"`.
pub fn client_key(headers: &HeaderMap, socket_addr: Option<&SocketAddr>) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
    {
        return forwarded.to_string();
    }

    if let Some(addr) = socket_addr {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        let peer: SocketAddr = "10.0.0.2:4242".parse().unwrap();
        assert_eq!(client_key(&headers, Some(&peer)), "203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_peer_ip() {
        let peer: SocketAddr = "192.0.2.10:55000".parse().unwrap();
        assert_eq!(client_key(&HeaderMap::new(), Some(&peer)), "192.0.2.10");

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" , 10.0.0.1"));
        assert_eq!(client_key(&headers, Some(&peer)), "192.0.2.10");
    }

    #[test]
    fn test_unknown_without_any_source() {
        assert_eq!(client_key(&HeaderMap::new(), None), "unknown");
    }
}
