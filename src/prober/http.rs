use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use reqwest::redirect::Policy;
use reqwest::{Client, Response, Url};
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

use super::tcp_connect::probe_tcp;
use super::{ProbeError, ProbeResult, Seconds};
use crate::config::ProbeConfig;
use crate::util::{normalize_url, resolve_host_to_ip};

const MAX_REDIRECTS: usize = 10;

/// Probe a single host: HEAD with redirects, a raw connect to the peer the
/// HEAD ended on, and a GET when the final status is 2xx.
///
/// A HEAD that runs out of time yields [`ProbeResult::timed_out`]; every
/// other failure is returned to the caller.
pub async fn probe_domain(host: &str, config: &ProbeConfig) -> Result<ProbeResult, ProbeError> {
    let raw = normalize_url(host);
    let url = Url::parse(&raw).map_err(|e| ProbeError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    let hops = Arc::new(AtomicU32::new(0));
    let client = build_client(config, hops.clone())?;

    let start = Instant::now();
    let resp = match client.head(url.clone()).send().await {
        Ok(resp) => resp,
        Err(e) if e.is_timeout() => {
            warn!("head {} timed out", url);
            return Ok(ProbeResult::timed_out(config.timeout));
        }
        Err(e) => return Err(e.into()),
    };
    let resolution_time = start.elapsed();
    let redirects = hops.load(Ordering::Relaxed);
    let status = resp.status();
    let peer = peer_addr(&resp).await?;
    drop(resp);
    debug!("head {} -> {} via {} in {:?}", url, status, peer, resolution_time);

    let ip_connect_time = probe_tcp(peer, config.timeout_duration()).await?;

    let get_content_time = if status.is_success() {
        Some(fetch_content(config, &url).await?.as_secs_f64())
    } else {
        None
    };

    Ok(ProbeResult {
        resolution_time: Some(Seconds::from(resolution_time)),
        ip: peer.ip().to_string(),
        redirects,
        http_code: status.as_u16(),
        ip_connect_time: Some(Seconds::from(ip_connect_time)),
        get_content_time,
    })
}

/// Clients are per probe so the redirect counter only ever sees one host.
fn build_client(config: &ProbeConfig, hops: Arc<AtomicU32>) -> Result<Client, ProbeError> {
    let policy = Policy::custom(move |attempt| {
        // previous() holds every url already requested, the first one included
        let followed = attempt.previous().len();
        if followed > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            hops.store(followed as u32, Ordering::Relaxed);
            attempt.follow()
        }
    });

    let mut builder = Client::builder()
        .redirect(policy)
        .default_headers(config.headers());
    if let Some(limit) = config.timeout_duration() {
        builder = builder.timeout(limit);
    }
    Ok(builder.build()?)
}

/// Peer of the connection the final response came over. Falls back to a
/// fresh lookup of the final host when the client cannot report it.
async fn peer_addr(resp: &Response) -> Result<SocketAddr, ProbeError> {
    if let Some(addr) = resp.remote_addr() {
        return Ok(addr);
    }

    let final_url = resp.url();
    let host = final_url
        .host_str()
        .ok_or_else(|| ProbeError::Resolve(format!("{} has no host", final_url)))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let port = final_url.port_or_known_default().unwrap_or(443);
    let ip = resolve_host_to_ip(host)
        .await
        .map_err(|e| ProbeError::Resolve(format!("{}: {}", host, e)))?;
    Ok(SocketAddr::new(ip, port))
}

/// The GET runs on its own client so it pays for a fresh connection instead
/// of riding the one the HEAD left in the pool.
async fn fetch_content(config: &ProbeConfig, url: &Url) -> Result<Duration, ProbeError> {
    let client = build_client(config, Arc::new(AtomicU32::new(0)))?;
    let start = Instant::now();
    let resp = client.get(url.clone()).send().await?;
    let _ = resp.bytes().await?;
    Ok(start.elapsed())
}
