use std::fmt;
use std::str::FromStr;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

use crate::config::ConfigError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Desktop browser identities a probe can present itself as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agent {
    Chrome,
    Firefox,
    Safari,
}

impl Agent {
    pub const ALL: [Agent; 3] = [Agent::Chrome, Agent::Firefox, Agent::Safari];

    pub fn name(&self) -> &'static str {
        match self {
            Agent::Chrome => "chrome",
            Agent::Firefox => "firefox",
            Agent::Safari => "safari",
        }
    }

    pub fn user_agent(&self) -> &'static str {
        match self {
            Agent::Chrome => {
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_13_3) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/64.0.3282.167 Safari/537.36"
            }
            Agent::Firefox => {
                "Mozilla/5.0 (Windows NT 10.0; WOW64; rv:57.0) Gecko/20100101 Firefox/57.0"
            }
            Agent::Safari => {
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_12_1) AppleWebKit/602.2.14 (KHTML, like Gecko) Version/10.0.1 Safari/602.2.14"
            }
        }
    }

    /// User-Agent plus the fixed Accept header sent with every request.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent()));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers
    }
}

impl FromStr for Agent {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Agent::ALL
            .into_iter()
            .find(|agent| agent.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownAgent(s.to_string()))
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
