//! ricoverage library
//!
//! Reports, per AWS region, whether active reserved capacity covers the
//! running EC2 instances, RDS instances, and ElastiCache clusters.

pub mod aws;
pub mod config;
pub mod coverage;
pub mod error;
pub mod exit_codes;
pub mod fetch;
pub mod report;
pub mod retry;
pub mod service;

// Re-export commonly used types
pub use coverage::{aggregate, CoverageTally, Region, Reservation, ResourceInstance};
pub use error::{CoverageError, Result};
pub use service::{ResourceService, ServiceKind};
