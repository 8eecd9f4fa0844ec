//! Coverage aggregation
//!
//! Groups fetched records by region and type/class. Regions without running
//! resources are dropped; reservation counts are summed per type.

use std::collections::HashMap;

use super::types::{CoverageTally, Region, RegionCoverage, Reservation, ResourceInstance};

/// Build one tally per region that has running resources, in `regions` order.
pub fn aggregate(
    regions: &[Region],
    instances: &[ResourceInstance],
    reservations: &[Reservation],
) -> Vec<RegionCoverage> {
    let mut usage_by_region: HashMap<&Region, HashMap<String, u32>> = HashMap::new();
    for instance in instances {
        *usage_by_region
            .entry(&instance.region)
            .or_default()
            .entry(instance.type_or_class.clone())
            .or_insert(0) += 1;
    }

    let mut reserved_by_region: HashMap<&Region, HashMap<String, u32>> = HashMap::new();
    for reservation in reservations.iter().filter(|r| r.is_active()) {
        *reserved_by_region
            .entry(&reservation.region)
            .or_default()
            .entry(reservation.type_or_class.clone())
            .or_insert(0) += reservation.count;
    }

    let mut out = Vec::new();
    for region in regions {
        let Some(usage) = usage_by_region.remove(region) else {
            continue;
        };
        let reserved = reserved_by_region.remove(region).unwrap_or_default();
        out.push(RegionCoverage {
            region: region.clone(),
            tally: CoverageTally { usage, reserved },
        });
    }
    out
}
