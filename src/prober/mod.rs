use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Timeout;

pub mod http;
pub mod tcp_connect;

/// Reported when the HEAD request could not complete within the timeout.
pub const UNKNOWN_IP: &str = "not_known";
pub const GATEWAY_TIMEOUT: u16 = 504;

/// A time in seconds. Whole values stand in for a timeout given as an
/// integer and serialize without a fractional part.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Seconds {
    Whole(u64),
    Fractional(f64),
}

impl From<Duration> for Seconds {
    fn from(elapsed: Duration) -> Self {
        Seconds::Fractional(elapsed.as_secs_f64())
    }
}

impl From<Timeout> for Seconds {
    fn from(timeout: Timeout) -> Self {
        match timeout {
            Timeout::Whole(secs) => Seconds::Whole(secs),
            Timeout::Fractional(secs) => Seconds::Fractional(secs),
        }
    }
}

/// Timings and outcome of one probe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeResult {
    pub resolution_time: Option<Seconds>,
    pub ip: String,
    pub redirects: u32,
    pub http_code: u16,
    pub ip_connect_time: Option<Seconds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_content_time: Option<f64>,
}

impl ProbeResult {
    /// The degraded record used when the host did not answer in time.
    pub fn timed_out(timeout: Option<Timeout>) -> Self {
        let secs = timeout.map(Seconds::from);
        Self {
            resolution_time: secs,
            ip: UNKNOWN_IP.to_string(),
            redirects: 0,
            http_code: GATEWAY_TIMEOUT,
            ip_connect_time: secs,
            get_content_time: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("could not resolve peer address: {0}")]
    Resolve(String),

    #[error("connect to {addr} failed: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("connect to {0} timed out")]
    ConnectTimeout(SocketAddr),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_out_record_carries_timeout() {
        let result = ProbeResult::timed_out(Some(Timeout::Whole(3)));
        assert_eq!(result.resolution_time, Some(Seconds::Whole(3)));
        assert_eq!(result.ip_connect_time, Some(Seconds::Whole(3)));
        assert_eq!(result.ip, "not_known");
        assert_eq!(result.redirects, 0);
        assert_eq!(result.http_code, 504);
        assert!(result.get_content_time.is_none());
    }

    #[test]
    fn timed_out_record_keeps_timeout_form_in_json() {
        let whole = serde_json::to_string(&ProbeResult::timed_out(Some(Timeout::Whole(3)))).unwrap();
        assert!(whole.contains("\"resolution_time\":3,"), "{}", whole);
        assert!(whole.contains("\"ip_connect_time\":3"), "{}", whole);
        assert!(!whole.contains("3.0"), "{}", whole);

        let fractional =
            serde_json::to_string(&ProbeResult::timed_out(Some(Timeout::Fractional(2.5)))).unwrap();
        assert!(fractional.contains("\"resolution_time\":2.5,"), "{}", fractional);
    }

    #[test]
    fn seconds_read_back_in_their_form() {
        let whole: Seconds = serde_json::from_str("3").unwrap();
        assert_eq!(whole, Seconds::Whole(3));
        let fractional: Seconds = serde_json::from_str("0.125").unwrap();
        assert_eq!(fractional, Seconds::Fractional(0.125));
        assert_eq!(Seconds::from(Duration::from_millis(1500)), Seconds::Fractional(1.5));
    }

    #[test]
    fn timed_out_without_timeout_has_null_times() {
        let result = ProbeResult::timed_out(None);
        assert_eq!(result.resolution_time, None);
        assert_eq!(result.ip_connect_time, None);
    }

    #[test]
    fn missing_content_time_is_not_serialized() {
        let json = serde_json::to_value(ProbeResult::timed_out(None)).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("get_content_time"));
        assert!(obj["resolution_time"].is_null());
        assert_eq!(obj["http_code"], 504);
    }
}
