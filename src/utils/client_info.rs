//! Client metadata extraction from HTTP request headers.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Edge headers carrying the client's ISO country code, in priority order.
const COUNTRY_HEADERS: &[&str] = &["cf-ipcountry", "cloudfront-viewer-country", "x-country-code"];

/// Placeholder codes edges send when the country is unknown or anonymised.
const UNKNOWN_COUNTRIES: &[&str] = &["XX", "T1"];

/// Returns a header value as a trimmed, non-empty string.
pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Resolves the client IP.
///
/// With `behind_proxy`, the first `X-Forwarded-For` entry wins, then
/// `X-Real-IP`. Otherwise, or when neither header parses, the peer address is
/// used. Enable `behind_proxy` only behind a trusted reverse proxy.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy {
        let forwarded = header_str(headers, "x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim);

        let candidate = forwarded
            .filter(|ip| ip.parse::<std::net::IpAddr>().is_ok())
            .or_else(|| {
                header_str(headers, "x-real-ip").filter(|ip| ip.parse::<std::net::IpAddr>().is_ok())
            });

        if let Some(ip) = candidate {
            return ip.to_string();
        }
    }

    peer.ip().to_string()
}

/// Two-letter country code from edge headers, uppercased.
pub fn country(headers: &HeaderMap) -> Option<String> {
    COUNTRY_HEADERS
        .iter()
        .filter_map(|name| header_str(headers, name))
        .map(str::to_ascii_uppercase)
        .find(|code| {
            code.len() == 2
                && code.bytes().all(|b| b.is_ascii_alphabetic())
                && !UNKNOWN_COUNTRIES.contains(&code.as_str())
        })
}
