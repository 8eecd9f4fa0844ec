//! Service abstraction
//!
//! `ServiceKind` is the closed set of services the report covers. Each kind has
//! one `ResourceService` implementation in `crate::aws` that knows which
//! describe calls to issue and which response field holds the type/class.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coverage::types::{Region, Reservation, ResourceInstance};
use crate::error::Result;

/// Services with reserved capacity
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum ServiceKind {
    #[serde(rename = "cache", alias = "elasticache")]
    #[value(name = "cache", alias = "elasticache")]
    ElastiCache,
    #[serde(rename = "ec2")]
    #[value(name = "ec2")]
    Ec2,
    #[serde(rename = "rds")]
    #[value(name = "rds")]
    Rds,
}

impl ServiceKind {
    /// Report order when no services are selected
    pub const ALL: [ServiceKind; 3] = [ServiceKind::ElastiCache, ServiceKind::Ec2, ServiceKind::Rds];

    /// Heading printed above the service section
    pub fn section_name(&self) -> &'static str {
        match self {
            ServiceKind::ElastiCache => "Cache",
            ServiceKind::Ec2 => "EC2",
            ServiceKind::Rds => "RDS",
        }
    }

    /// API field that holds the type/class on both running and reserved records
    pub fn type_key(&self) -> &'static str {
        match self {
            ServiceKind::ElastiCache => "CacheNodeType",
            ServiceKind::Ec2 => "InstanceType",
            ServiceKind::Rds => "DBInstanceClass",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_name())
    }
}

/// Read-only inventory of one service in one region at a time.
///
/// Implementations must tag every returned record with `region` and must only
/// return reservations whose state is active.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceService: Send + Sync {
    fn kind(&self) -> ServiceKind;

    /// Response field the type/class is read from
    fn type_key(&self) -> &'static str;

    /// Currently running resources, all pages
    async fn list_running(&self, region: &Region) -> Result<Vec<ResourceInstance>>;

    /// Active reservations, all pages
    async fn list_reservations(&self, region: &Region) -> Result<Vec<Reservation>>;
}
