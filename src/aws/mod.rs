//! AWS backends
//!
//! ## Module Organization
//!
//! - `regions`: enabled-region enumeration (EC2 DescribeRegions)
//! - `ec2`, `rds`, `elasticache`: one `ResourceService` per service
//! - `errors`: SDK error classification
//!
//! Every call is a read-only describe/list. Credentials come from the
//! standard `aws-config` provider chain.

pub mod ec2;
pub mod elasticache;
pub mod errors;
pub mod rds;
pub mod regions;

pub use ec2::Ec2Service;
pub use elasticache::ElastiCacheService;
pub use rds::RdsService;
pub use regions::{filter_regions, list_regions, select_regions};

use aws_config::{BehaviorVersion, SdkConfig};

use crate::service::{ResourceService, ServiceKind};

/// Load the shared SDK configuration from the default provider chain
pub async fn load_sdk_config() -> SdkConfig {
    aws_config::load_defaults(BehaviorVersion::latest()).await
}

pub fn service_for(kind: ServiceKind, sdk_config: &SdkConfig) -> Box<dyn ResourceService> {
    match kind {
        ServiceKind::ElastiCache => Box::new(ElastiCacheService::new(sdk_config)),
        ServiceKind::Ec2 => Box::new(Ec2Service::new(sdk_config)),
        ServiceKind::Rds => Box::new(RdsService::new(sdk_config)),
    }
}

/// Unit count of a reservation record; a missing count means one unit
pub(crate) fn unit_count(count: Option<i32>) -> u32 {
    count.map(|c| c.max(0) as u32).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_count() {
        assert_eq!(unit_count(Some(3)), 3);
        assert_eq!(unit_count(None), 1);
        assert_eq!(unit_count(Some(-2)), 0);
    }

    #[test]
    fn test_service_for_matches_kind() {
        let sdk_config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .build();
        for kind in ServiceKind::ALL {
            let service = service_for(kind, &sdk_config);
            assert_eq!(service.kind(), kind);
            assert_eq!(service.type_key(), kind.type_key());
        }
    }
}
