//! Region enumeration

use aws_config::SdkConfig;
use aws_sdk_ec2::config::Region as AwsRegion;
use aws_sdk_ec2::operation::describe_regions::DescribeRegionsOutput;
use aws_sdk_ec2::Client as Ec2Client;
use tracing::{debug, warn};

use super::errors::from_sdk_error;
use crate::coverage::types::Region;
use crate::error::{CoverageError, Result};
use crate::retry::{ExponentialBackoffPolicy, RetryPolicy};
use crate::service::ServiceKind;

/// List the account's enabled regions, in the order EC2 returns them.
///
/// Region listing is global; `home_region` only picks the endpoint.
pub async fn list_regions(
    sdk_config: &SdkConfig,
    home_region: &str,
    max_attempts: u32,
) -> Result<Vec<Region>> {
    let conf = aws_sdk_ec2::config::Builder::from(sdk_config)
        .region(AwsRegion::new(home_region.to_string()))
        .build();
    let client = Ec2Client::from_conf(conf);

    let response = ExponentialBackoffPolicy::new(max_attempts)
        .execute_with_retry(|| async {
            client.describe_regions().send().await.map_err(|e| {
                from_sdk_error(ServiceKind::Ec2, home_region, "DescribeRegions", e)
            })
        })
        .await?;

    let regions = regions_from(&response);
    debug!("Enumerated {} regions via {}", regions.len(), home_region);
    Ok(regions)
}

fn regions_from(response: &DescribeRegionsOutput) -> Vec<Region> {
    response
        .regions()
        .iter()
        .filter_map(|r| r.region_name())
        .map(Region::new)
        .collect()
}

/// Keep only allow-listed regions, preserving enumerator order.
///
/// An empty allow-list keeps everything.
pub fn filter_regions(regions: Vec<Region>, allow: &[String]) -> Vec<Region> {
    if allow.is_empty() {
        return regions;
    }
    for name in allow {
        if !regions.iter().any(|r| r.as_str() == name) {
            warn!("Region {} is not enabled for this account, skipping", name);
        }
    }
    regions
        .into_iter()
        .filter(|r| allow.iter().any(|a| a == r.as_str()))
        .collect()
}

/// Like `filter_regions`, but an allow-list matching nothing is an error
pub fn select_regions(regions: Vec<Region>, allow: &[String]) -> Result<Vec<Region>> {
    let selected = filter_regions(regions, allow);
    if selected.is_empty() && !allow.is_empty() {
        return Err(CoverageError::Validation {
            field: "region".to_string(),
            reason: format!("none of {} is enabled for this account", allow.join(", ")),
        });
    }
    Ok(selected)
}
