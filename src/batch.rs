use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::ProbeConfig;
use crate::prober::ProbeResult;
use crate::prober::http::probe_domain;

/// Results keyed by the host exactly as it was given, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbeReport {
    entries: IndexMap<String, ProbeResult>,
}

impl ProbeReport {
    /// A repeated host overwrites its earlier result without moving.
    pub fn insert(&mut self, host: String, result: ProbeResult) {
        self.entries.insert(host, result);
    }

    #[cfg(test)]
    pub fn get(&self, host: &str) -> Option<&ProbeResult> {
        self.entries.get(host)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProbeResult)> {
        self.entries.iter().map(|(h, r)| (h.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Probe every host in order, one at a time.
///
/// A host whose probe fails for any reason other than a HEAD timeout is
/// logged and left out of the report; the remaining hosts still run.
pub async fn probe_all<I, S>(hosts: I, config: &ProbeConfig) -> ProbeReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ProbeReport::default();
    for host in hosts {
        let host = host.as_ref();
        match probe_domain(host, config).await {
            Ok(result) => {
                info!("probe {} finished: http {} via {}", host, result.http_code, result.ip);
                report.insert(host.to_string(), result);
            }
            Err(e) => {
                error!("probe {} failed: {}", host, e);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::Seconds;
    use wiremock::matchers::path;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn result(code: u16) -> ProbeResult {
        ProbeResult {
            resolution_time: Some(Seconds::Fractional(0.5)),
            ip: "10.0.0.1".to_string(),
            redirects: 0,
            http_code: code,
            ip_connect_time: Some(Seconds::Fractional(0.25)),
            get_content_time: None,
        }
    }

    #[test]
    fn repeated_host_replaces_in_place() {
        let mut report = ProbeReport::default();
        report.insert("a".to_string(), result(200));
        report.insert("b".to_string(), result(200));
        report.insert("a".to_string(), result(404));

        let hosts: Vec<_> = report.iter().map(|(h, _)| h).collect();
        assert_eq!(hosts, vec!["a", "b"]);
        assert_eq!(report.get("a").unwrap().http_code, 404);
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn serializes_as_ordered_object() {
        let mut report = ProbeReport::default();
        report.insert("zeta.com".to_string(), result(200));
        report.insert("alpha.com".to_string(), result(301));

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.find("zeta.com").unwrap() < json.find("alpha.com").unwrap());

        let back: ProbeReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        let keys: Vec<_> = back.iter().map(|(h, _)| h).collect();
        assert_eq!(keys, vec!["zeta.com", "alpha.com"]);
    }

    #[tokio::test]
    async fn probes_hosts_in_order_and_isolates_failures() {
        let server = MockServer::start().await;
        Mock::given(path("/a"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(path("/b"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let dead = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let b = format!("{}/b", server.uri());
        let a = format!("{}/a", server.uri());
        let hosts = vec![b.clone(), dead.clone(), a.clone()];
        let report = probe_all(&hosts, &ProbeConfig::default()).await;

        let keys: Vec<_> = report.iter().map(|(h, _)| h.to_string()).collect();
        assert_eq!(keys, vec![b.clone(), a.clone()]);
        assert!(report.get(&dead).is_none());

        let ok = report.get(&a).unwrap();
        assert_eq!(ok.http_code, 200);
        assert!(ok.get_content_time.is_some());

        let unavailable = report.get(&b).unwrap();
        assert_eq!(unavailable.http_code, 503);
        assert!(unavailable.get_content_time.is_none());
    }
}
