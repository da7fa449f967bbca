use std::net::IpAddr;
use anyhow::Result;

pub const DEFAULT_SCHEME: &str = "https://";

/// Prefix `https://` unless the host already names a scheme.
pub fn normalize_url(host: &str) -> String {
    if has_scheme(host) {
        host.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, host)
    }
}

fn has_scheme(s: &str) -> bool {
    match s.find("://") {
        Some(idx) if idx > 0 => {
            let scheme = &s[..idx];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

pub async fn resolve_host_to_ip(host: &str) -> Result<IpAddr> {
    // First try to parse as IP address
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    // If parsing fails, resolve via DNS
    let addr = format!("{}:0", host);
    let mut addrs = tokio::net::lookup_host(&addr).await?;
    Ok(addrs
        .next()
        .ok_or_else(|| anyhow::anyhow!("Could not resolve hostname: {}", host))?
        .ip())
}
