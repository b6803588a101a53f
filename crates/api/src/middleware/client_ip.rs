//! Client IP extraction behind Cloudflare / Fly.io proxies.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

/// Extractor for the real client IP.
///
/// Checks Cloudflare's `CF-Connecting-IP` header first, then the standard
/// proxy headers, then the socket address from `ConnectInfo`.
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub IpAddr);

/// Resolve the client IP from proxy headers, in trust order.
fn ip_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    // CF-Connecting-IP (Cloudflare's real client IP)
    if let Some(ip) = headers
        .get("cf-connecting-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
    {
        return Some(ip);
    }

    // X-Forwarded-For (first IP in the chain)
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
    {
        return Some(ip);
    }

    // X-Real-IP
    if let Some(ip) = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
    {
        return Some(ip);
    }

    // Fly-Client-IP (Fly.io's header)
    headers
        .get("fly-client-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ip) = ip_from_headers(&parts.headers) {
            return Ok(Self(ip));
        }

        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            return Ok(Self(addr.ip()));
        }

        // No proxy headers and no connect info (e.g. in-process test
        // requests): fall back to a fixed key rather than failing the request.
        tracing::debug!("no client ip available, using unspecified");
        Ok(Self(IpAddr::V4(Ipv4Addr::UNSPECIFIED)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_cloudflare_header_wins() {
        let map = headers(&[
            ("cf-connecting-ip", "203.0.113.9"),
            ("x-forwarded-for", "198.51.100.1"),
        ]);
        assert_eq!(ip_from_headers(&map), Some("203.0.113.9".parse().unwrap()));
    }

    #[test]
    fn test_forwarded_for_uses_first_hop() {
        let map = headers(&[("x-forwarded-for", "198.51.100.1, 10.0.0.1, 10.0.0.2")]);
        assert_eq!(ip_from_headers(&map), Some("198.51.100.1".parse().unwrap()));
    }

    #[test]
    fn test_real_ip_and_fly_fallbacks() {
        let map = headers(&[("x-real-ip", " 192.0.2.4 ")]);
        assert_eq!(ip_from_headers(&map), Some("192.0.2.4".parse().unwrap()));

        let map = headers(&[("fly-client-ip", "2001:db8::1")]);
        assert_eq!(ip_from_headers(&map), Some("2001:db8::1".parse().unwrap()));
    }

    #[test]
    fn test_garbage_headers_are_skipped() {
        let map = headers(&[
            ("cf-connecting-ip", "not-an-ip"),
            ("x-real-ip", "192.0.2.7"),
        ]);
        assert_eq!(ip_from_headers(&map), Some("192.0.2.7".parse().unwrap()));
    }

    #[test]
    fn test_no_headers() {
        assert_eq!(ip_from_headers(&HeaderMap::new()), None);
    }
}
