mod agent;
mod batch;
mod cli;
mod config;
mod output;
mod prober;
mod util;

use std::path::Path;
use std::process::exit;

use clap::CommandFactory;
use tracing::{info, warn};

use batch::probe_all;
use cli::Cli;
use config::{load_domains, parse_log_level};
use output::{print_report, write_json, OUTPUT_FILE};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    if !cli.has_action() {
        Cli::command().print_help()?;
        exit(1);
    }

    let log_level = match parse_log_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            println!("{}", e);
            exit(1);
        }
    };

    // Logs go to stderr, stdout carries the results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()
                         .add_directive(format!("domain_probe={}", log_level.as_str().to_lowercase()).parse()?))
        .init();

    if !cli.has_sources() {
        println!("You must specify a list of web sites or provide a file");
        exit(1);
    }

    let config = match cli.probe_config() {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e);
            exit(1);
        }
    };

    let mut hosts = cli.domains.clone();
    if let Some(file) = &cli.file {
        hosts.extend(load_domains(file).await?);
    }

    info!(
        "probing {} hosts, timeout {}, agent {}",
        hosts.len(),
        config.timeout.map_or("none".to_string(), |t| t.to_string()),
        config.agent.map_or("none", |a| a.name()),
    );
    let report = probe_all(&hosts, &config).await;
    if report.is_empty() && !hosts.is_empty() {
        warn!("no host produced a result");
    }

    if cli.to_json {
        write_json(&report, Path::new(OUTPUT_FILE)).await?;
        info!("wrote {} results to {}", report.len(), OUTPUT_FILE);
    } else {
        print_report(&report);
    }

    println!("\nCompleted");
    Ok(())
}
