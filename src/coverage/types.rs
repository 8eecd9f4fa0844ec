//! Type definitions for coverage reporting
//!
//! Records produced by the fetchers (`ResourceInstance`, `Reservation`) and the
//! derived per-region tallies consumed by the renderers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::service::ServiceKind;

/// Reservation state counted towards coverage
pub const ACTIVE_STATE: &str = "active";

/// AWS region name as returned by DescribeRegions
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Region {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A running EC2 instance, RDS instance, or ElastiCache cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInstance {
    /// Region of the endpoint that returned this record
    pub region: Region,
    /// Instance type, DB instance class, or cache node type
    pub type_or_class: String,
}

impl ResourceInstance {
    pub fn new(region: Region, type_or_class: impl Into<String>) -> Self {
        Self {
            region,
            type_or_class: type_or_class.into(),
        }
    }
}

/// A purchased reservation; one record may cover several units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub region: Region,
    pub type_or_class: String,
    pub count: u32,
    pub state: String,
}

impl Reservation {
    pub fn new(
        region: Region,
        type_or_class: impl Into<String>,
        count: u32,
        state: impl Into<String>,
    ) -> Self {
        Self {
            region,
            type_or_class: type_or_class.into(),
            count,
            state: state.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == ACTIVE_STATE
    }
}

/// Usage and reserved unit counts for one (region, service) pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageTally {
    pub usage: HashMap<String, u32>,
    pub reserved: HashMap<String, u32>,
}

impl CoverageTally {
    /// Reserved units for a type; absent types count as zero
    pub fn reserved_for(&self, type_or_class: &str) -> u32 {
        self.reserved.get(type_or_class).copied().unwrap_or(0)
    }

    /// One line per used type, sorted by type name.
    ///
    /// Reserved types with no usage never produce a line.
    pub fn lines(&self) -> Vec<CoverageLine> {
        let mut types: Vec<&String> = self.usage.keys().collect();
        types.sort();
        types
            .into_iter()
            .map(|t| {
                let usage = self.usage[t];
                let reserved = self.reserved_for(t);
                CoverageLine {
                    type_or_class: t.clone(),
                    usage,
                    reserved,
                    covered: usage <= reserved,
                }
            })
            .collect()
    }
}

/// A single rendered row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageLine {
    pub type_or_class: String,
    pub usage: u32,
    pub reserved: u32,
    pub covered: bool,
}

/// Tally for one region with running resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCoverage {
    pub region: Region,
    pub tally: CoverageTally,
}

/// All non-empty regions for one service, in enumerator order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReport {
    pub service: ServiceKind,
    pub regions: Vec<RegionCoverage>,
}
