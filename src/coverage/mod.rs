//! Coverage computation and presentation
//!
//! Pure functions only: nothing here talks to AWS.

pub mod aggregate;
pub mod render;
pub mod types;

pub use aggregate::aggregate;
pub use types::{
    CoverageLine, CoverageTally, Region, RegionCoverage, Reservation, ResourceInstance,
    ServiceReport,
};
