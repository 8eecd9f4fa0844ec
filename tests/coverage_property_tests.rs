//! Property-based tests for coverage aggregation
//!
//! These tests use proptest to generate random inventories and verify
//! that the tallies and rendered lines hold for every input ordering.

use proptest::prelude::*;
use ricoverage::coverage::render::render_text;
use ricoverage::coverage::types::ServiceReport;
use ricoverage::{aggregate, Region, Reservation, ResourceInstance, ServiceKind};

const REGIONS: &[&str] = &["us-east-1", "eu-west-1", "ap-northeast-1"];
const TYPES: &[&str] = &["m5.large", "t3.micro", "c6i.xlarge", "r6g.2xlarge", "db.t3.small"];
const STATES: &[&str] = &["active", "retired", "payment-pending", "payment-failed"];

fn instance_strategy() -> impl Strategy<Value = ResourceInstance> {
    (0..REGIONS.len(), 0..TYPES.len())
        .prop_map(|(r, t)| ResourceInstance::new(Region::new(REGIONS[r]), TYPES[t]))
}

fn reservation_strategy() -> impl Strategy<Value = Reservation> {
    (0..REGIONS.len(), 0..TYPES.len(), 1u32..20, 0..STATES.len()).prop_map(|(r, t, count, s)| {
        Reservation::new(Region::new(REGIONS[r]), TYPES[t], count, STATES[s])
    })
}

fn regions() -> Vec<Region> {
    REGIONS.iter().map(|r| Region::new(*r)).collect()
}

proptest! {
    #[test]
    fn test_usage_counts_and_reserved_sums(
        instances in prop::collection::vec(instance_strategy(), 0..60),
        reservations in prop::collection::vec(reservation_strategy(), 0..30)
    ) {
        let result = aggregate(&regions(), &instances, &reservations);

        for coverage in &result {
            let region = &coverage.region;
            for (t, usage) in &coverage.tally.usage {
                let expected = instances
                    .iter()
                    .filter(|i| &i.region == region && &i.type_or_class == t)
                    .count() as u32;
                prop_assert_eq!(*usage, expected);
            }
            for t in TYPES {
                let expected: u32 = reservations
                    .iter()
                    .filter(|r| &r.region == region && r.type_or_class == *t && r.state == "active")
                    .map(|r| r.count)
                    .sum();
                prop_assert_eq!(coverage.tally.reserved_for(t), expected);
            }
        }
    }

    #[test]
    fn test_covered_iff_usage_within_reserved(
        instances in prop::collection::vec(instance_strategy(), 1..60),
        reservations in prop::collection::vec(reservation_strategy(), 0..30)
    ) {
        for coverage in aggregate(&regions(), &instances, &reservations) {
            for line in coverage.tally.lines() {
                prop_assert_eq!(line.covered, line.usage <= line.reserved);
            }
        }
    }

    #[test]
    fn test_regions_without_usage_are_suppressed(
        instances in prop::collection::vec(instance_strategy(), 0..40),
        reservations in prop::collection::vec(reservation_strategy(), 0..30)
    ) {
        let result = aggregate(&regions(), &instances, &reservations);
        for coverage in &result {
            prop_assert!(!coverage.tally.usage.is_empty());
        }
        for region in regions() {
            let has_usage = instances.iter().any(|i| i.region == region);
            let reported = result.iter().any(|c| c.region == region);
            prop_assert_eq!(has_usage, reported);
        }
    }

    #[test]
    fn test_lines_only_for_used_types_and_sorted(
        mut instances in prop::collection::vec(instance_strategy(), 1..60),
        reservations in prop::collection::vec(reservation_strategy(), 0..30),
        seed in any::<u64>()
    ) {
        // Input order must not matter
        let mut rng = fastrand::Rng::with_seed(seed);
        rng.shuffle(&mut instances);

        for coverage in aggregate(&regions(), &instances, &reservations) {
            let lines = coverage.tally.lines();
            let names: Vec<&str> = lines.iter().map(|l| l.type_or_class.as_str()).collect();
            let mut sorted = names.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(&names, &sorted);

            for name in names {
                prop_assert!(coverage.tally.usage.contains_key(name));
            }
        }
    }

    #[test]
    fn test_one_rendered_line_per_used_type(
        instances in prop::collection::vec(instance_strategy(), 1..40),
        reservations in prop::collection::vec(reservation_strategy(), 0..20)
    ) {
        let report = ServiceReport {
            service: ServiceKind::Ec2,
            regions: aggregate(&regions(), &instances, &reservations),
        };
        let mut buf = Vec::new();
        render_text(&mut buf, &report, false).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let expected_lines: usize = report.regions.iter().map(|c| c.tally.usage.len()).sum();
        let usage_lines = text.lines().filter(|l| l.contains("Usage:")).count();
        prop_assert_eq!(usage_lines, expected_lines);
    }
}
