//! Report pipeline
//!
//! For each selected service: fetch every region, aggregate, render. A
//! service's section is written only after all of its regions were fetched,
//! so a failing service never leaves a partial section behind.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use tracing::{info, warn};

use crate::coverage::render::{render_json, render_text};
use crate::coverage::types::{Region, ServiceReport};
use crate::coverage::aggregate;
use crate::error::{CoverageError, Result};
use crate::fetch::{fetch_inventory, FetchOptions};
use crate::service::{ResourceService, ServiceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub fetch: FetchOptions,
    pub output: OutputFormat,
    pub color: bool,
    /// Stop at the first failing service instead of moving on
    pub fail_fast: bool,
    /// Show a spinner on stderr while fetching
    pub progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            fetch: FetchOptions::default(),
            output: OutputFormat::Text,
            color: false,
            fail_fast: false,
            progress: false,
        }
    }
}

/// A service whose report could not be produced
#[derive(Debug)]
pub struct ServiceFailure {
    pub service: ServiceKind,
    pub error: CoverageError,
}

#[derive(Debug, Default)]
pub struct RunOutcome {
    pub reports: Vec<ServiceReport>,
    pub failures: Vec<ServiceFailure>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fetch and aggregate one service across `regions`
pub async fn build_service_report(
    service: &dyn ResourceService,
    regions: &[Region],
    options: &FetchOptions,
) -> Result<ServiceReport> {
    let inventory = fetch_inventory(service, regions, options).await?;
    Ok(ServiceReport {
        service: service.kind(),
        regions: aggregate(regions, &inventory.instances, &inventory.reservations),
    })
}

fn spinner(enabled: bool, service: ServiceKind, regions: usize) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching {} across {} regions...", service, regions));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Run every service in order, writing reports to `out`.
///
/// Failures are collected per service unless `fail_fast` is set, in which case
/// the first one is returned as an error.
pub async fn run_reports<W: Write>(
    services: &[Box<dyn ResourceService>],
    regions: &[Region],
    options: &RunOptions,
    out: &mut W,
) -> Result<RunOutcome> {
    let mut outcome = RunOutcome::default();

    for service in services {
        let kind = service.kind();
        let pb = spinner(options.progress, kind, regions.len());
        let result = build_service_report(service.as_ref(), regions, &options.fetch).await;
        pb.finish_and_clear();

        match result {
            Ok(report) => {
                info!("{}: {} regions with running resources", kind, report.regions.len());
                if options.output == OutputFormat::Text {
                    render_text(out, &report, options.color)?;
                    out.flush()?;
                }
                outcome.reports.push(report);
            }
            Err(error) if options.fail_fast => return Err(error),
            Err(error) => {
                warn!("{} report failed: {}", kind, error);
                eprintln!("error: {} report failed: {}", kind, error);
                outcome.failures.push(ServiceFailure {
                    service: kind,
                    error,
                });
            }
        }
    }

    if options.output == OutputFormat::Json {
        let failures: Vec<(ServiceKind, String)> = outcome
            .failures
            .iter()
            .map(|f| (f.service, f.error.to_string()))
            .collect();
        render_json(out, &outcome.reports, &failures)?;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::types::{Reservation, ResourceInstance};
    use crate::service::MockResourceService;

    fn working(kind: ServiceKind) -> Box<dyn ResourceService> {
        let mut mock = MockResourceService::new();
        mock.expect_kind().return_const(kind);
        mock.expect_list_running()
            .returning(|region| Ok(vec![ResourceInstance::new(region.clone(), "small")]));
        mock.expect_list_reservations()
            .returning(|region| Ok(vec![Reservation::new(region.clone(), "small", 1, "active")]));
        Box::new(mock)
    }

    fn failing(kind: ServiceKind) -> Box<dyn ResourceService> {
        let mut mock = MockResourceService::new();
        mock.expect_kind().return_const(kind);
        mock.expect_list_running().returning(move |region| {
            Err(CoverageError::Provider {
                service: kind,
                region: region.to_string(),
                message: "service unavailable".to_string(),
            })
        });
        Box::new(mock)
    }

    #[tokio::test]
    async fn test_failing_service_does_not_stop_the_next() {
        let services = vec![
            working(ServiceKind::ElastiCache),
            failing(ServiceKind::Ec2),
            working(ServiceKind::Rds),
        ];
        let regions = vec![Region::new("us-east-1")];
        let mut out = Vec::new();

        let outcome = run_reports(&services, &regions, &RunOptions::default(), &mut out)
            .await
            .unwrap();

        assert_eq!(outcome.reports.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].service, ServiceKind::Ec2);
        assert!(!outcome.is_success());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" Cache\n====="));
        assert!(text.contains(" RDS\n====="));
        assert!(!text.contains("EC2"));
    }

    #[tokio::test]
    async fn test_fail_fast_returns_first_error() {
        let services = vec![failing(ServiceKind::ElastiCache), working(ServiceKind::Ec2)];
        let regions = vec![Region::new("us-east-1")];
        let options = RunOptions {
            fail_fast: true,
            ..RunOptions::default()
        };
        let mut out = Vec::new();

        let err = run_reports(&services, &regions, &options, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, CoverageError::Provider { .. }));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_json_output_includes_failures() {
        let services = vec![working(ServiceKind::Ec2), failing(ServiceKind::Rds)];
        let regions = vec![Region::new("eu-west-1")];
        let options = RunOptions {
            output: OutputFormat::Json,
            ..RunOptions::default()
        };
        let mut out = Vec::new();

        run_reports(&services, &regions, &options, &mut out)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["services"][0]["service"], "ec2");
        assert_eq!(value["services"][0]["regions"][0]["lines"][0]["covered"], true);
        assert_eq!(value["failures"][0]["service"], "rds");
    }
}
