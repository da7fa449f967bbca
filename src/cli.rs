use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};

use crate::agent::Agent;
use crate::config::{ConfigError, ProbeConfig, Timeout};

/// Measure HTTP(S) reachability and timing for a list of domains
#[derive(Parser, Debug, Clone)]
#[command(name = "domain-probe")]
#[command(version, about, long_about = None)]
#[command(override_usage = "domain-probe -d [domain1 domain2 ...] [arguments]")]
pub struct Cli {
    /// Output results to output.json file
    #[arg(short = 'j', long)]
    pub to_json: bool,

    /// Request timeout in seconds, integer or float
    #[arg(short, long, env = "DOMAIN_PROBE_TIMEOUT")]
    pub timeout: Option<String>,

    /// List of domains to perform testing
    #[arg(short, long, num_args = 1.., action = ArgAction::Append)]
    pub domains: Vec<String>,

    /// File containing list of domains, every domain on new line
    #[arg(short, long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// chrome, firefox or safari
    #[arg(short = 'a', long, env = "DOMAIN_PROBE_AGENT")]
    pub user_agent: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "DOMAIN_PROBE_LOG", default_value = "warn")]
    pub log_level: String,

    /// Set when --timeout came from the command line rather than the environment
    #[arg(skip)]
    pub timeout_passed: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        let matches = Self::command().get_matches();
        Self::from_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut cli = Self::from_arg_matches(matches)?;
        cli.timeout_passed = matches.value_source("timeout") == Some(ValueSource::CommandLine);
        Ok(cli)
    }

    /// False when none of the options that drive a run were passed. A
    /// timeout taken from the environment alone does not count.
    pub fn has_action(&self) -> bool {
        self.to_json || self.timeout_passed || !self.domains.is_empty() || self.file.is_some()
    }

    pub fn has_sources(&self) -> bool {
        !self.domains.is_empty() || self.file.is_some()
    }

    pub fn probe_config(&self) -> Result<ProbeConfig, ConfigError> {
        let timeout = self.timeout.as_deref().map(str::parse::<Timeout>).transpose()?;
        let agent = self.user_agent.as_deref().map(str::parse::<Agent>).transpose()?;
        Ok(ProbeConfig::new(timeout, agent))
    }
}
