use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::fs;

use crate::batch::ProbeReport;
use crate::prober::{ProbeResult, Seconds};

pub const OUTPUT_FILE: &str = "output.json";

fn seconds(value: Option<Seconds>) -> String {
    match value {
        Some(Seconds::Whole(secs)) => secs.to_string(),
        Some(Seconds::Fractional(secs)) => format!("{:.6}", secs),
        None => "null".to_string(),
    }
}

fn render_result(out: &mut String, host: &str, result: &ProbeResult) {
    let _ = writeln!(out, "{}", host);
    let _ = writeln!(out, "    resolution_time: {}", seconds(result.resolution_time));
    let _ = writeln!(out, "    ip: {}", result.ip);
    let _ = writeln!(out, "    redirects: {}", result.redirects);
    let _ = writeln!(out, "    http_code: {}", result.http_code);
    let _ = writeln!(out, "    ip_connect_time: {}", seconds(result.ip_connect_time));
    if let Some(secs) = result.get_content_time {
        let _ = writeln!(out, "    get_content_time: {}", seconds(Some(Seconds::Fractional(secs))));
    }
}

/// Human-readable form: one indented block per host.
pub fn render(report: &ProbeReport) -> String {
    let mut out = String::new();
    for (host, result) in report.iter() {
        render_result(&mut out, host, result);
    }
    out
}

pub fn print_report(report: &ProbeReport) {
    print!("{}", render(report));
}

/// JSON with four-space indentation.
pub fn to_json(report: &ProbeReport) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    report.serialize(&mut ser)?;
    Ok(buf)
}

pub async fn write_json(report: &ProbeReport, path: &Path) -> Result<()> {
    let json = to_json(report)?;
    fs::write(path, json)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
