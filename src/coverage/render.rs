//! Report rendering
//!
//! Text output keeps the fixed column layout operators grep against. JSON
//! output carries the same rows plus any per-service failures.

use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;
use std::io::{self, Write};

use super::types::{CoverageLine, ServiceReport};
use crate::service::ServiceKind;

pub const COVERED_GLYPH: &str = "\u{2713}";
pub const UNCOVERED_GLYPH: &str = "\u{2717}";

/// Covered/uncovered symbol, green or red when `color` is set
pub fn status_glyph(covered: bool, color: bool) -> String {
    match (covered, color) {
        (true, true) => style(COVERED_GLYPH).green().force_styling(true).to_string(),
        (false, true) => style(UNCOVERED_GLYPH).red().force_styling(true).to_string(),
        (true, false) => COVERED_GLYPH.to_string(),
        (false, false) => UNCOVERED_GLYPH.to_string(),
    }
}

/// Region name centered over an underline two characters wider than the name
pub fn region_header(name: &str) -> String {
    let underline = "=".repeat(name.chars().count() + 2);
    format!("\n {:^15}\n {:^15}", name, underline)
}

pub fn format_line(line: &CoverageLine, color: bool) -> String {
    format!(
        "  {:>12}  Usage: {:>2} Reserved: {:>2} : {}",
        line.type_or_class,
        line.usage,
        line.reserved,
        status_glyph(line.covered, color)
    )
}

/// Write one service section: heading, then one block per region with usage.
pub fn render_text<W: Write>(out: &mut W, report: &ServiceReport, color: bool) -> io::Result<()> {
    writeln!(out, "\n {}\n=====", report.service.section_name())?;
    for coverage in &report.regions {
        writeln!(out, "{}", region_header(coverage.region.as_str()))?;
        for line in coverage.tally.lines() {
            writeln!(out, "{}", format_line(&line, color))?;
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: DateTime<Utc>,
    pub services: Vec<JsonService>,
    pub failures: Vec<JsonFailure>,
}

#[derive(Debug, Serialize)]
pub struct JsonService {
    pub service: ServiceKind,
    pub regions: Vec<JsonRegion>,
}

#[derive(Debug, Serialize)]
pub struct JsonRegion {
    pub region: String,
    pub lines: Vec<CoverageLine>,
}

#[derive(Debug, Serialize)]
pub struct JsonFailure {
    pub service: ServiceKind,
    pub error: String,
}

impl From<&ServiceReport> for JsonService {
    fn from(report: &ServiceReport) -> Self {
        Self {
            service: report.service,
            regions: report
                .regions
                .iter()
                .map(|c| JsonRegion {
                    region: c.region.to_string(),
                    lines: c.tally.lines(),
                })
                .collect(),
        }
    }
}

pub fn render_json<W: Write>(
    out: &mut W,
    reports: &[ServiceReport],
    failures: &[(ServiceKind, String)],
) -> io::Result<()> {
    let doc = JsonReport {
        generated_at: Utc::now(),
        services: reports.iter().map(JsonService::from).collect(),
        failures: failures
            .iter()
            .map(|(service, error)| JsonFailure {
                service: *service,
                error: error.clone(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &doc)?;
    writeln!(out)
}
