//! ElastiCache clusters and reserved cache nodes

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_elasticache::config::Region as AwsRegion;
use aws_sdk_elasticache::operation::describe_cache_clusters::DescribeCacheClustersOutput;
use aws_sdk_elasticache::types::ReservedCacheNode;
use aws_sdk_elasticache::Client;
use tracing::debug;

use super::errors::from_sdk_error;
use super::unit_count;
use crate::coverage::types::{Region, Reservation, ResourceInstance};
use crate::error::Result;
use crate::service::{ResourceService, ServiceKind};

pub struct ElastiCacheService {
    sdk_config: SdkConfig,
}

impl ElastiCacheService {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            sdk_config: sdk_config.clone(),
        }
    }

    fn client(&self, region: &Region) -> Client {
        let conf = aws_sdk_elasticache::config::Builder::from(&self.sdk_config)
            .region(AwsRegion::new(region.as_str().to_string()))
            .build();
        Client::from_conf(conf)
    }
}

/// One record per cache node, so a three-node cluster is three units of usage.
/// Reserved cache nodes are bought per node. A cluster that does not report
/// its node count is one unit.
fn instances_from(page: &DescribeCacheClustersOutput, region: &Region) -> Vec<ResourceInstance> {
    let mut out = Vec::new();
    for cluster in page.cache_clusters() {
        let Some(node_type) = cluster.cache_node_type() else {
            continue;
        };
        for _ in 0..unit_count(cluster.num_cache_nodes()) {
            out.push(ResourceInstance::new(region.clone(), node_type));
        }
    }
    out
}

/// `None` for records without a node type and for anything not active
fn reservation_from(node: &ReservedCacheNode, region: &Region) -> Option<Reservation> {
    let reservation = Reservation::new(
        region.clone(),
        node.cache_node_type()?,
        unit_count(node.cache_node_count()),
        node.state().unwrap_or_default(),
    );
    reservation.is_active().then_some(reservation)
}

#[async_trait]
impl ResourceService for ElastiCacheService {
    fn kind(&self) -> ServiceKind {
        ServiceKind::ElastiCache
    }

    fn type_key(&self) -> &'static str {
        ServiceKind::ElastiCache.type_key()
    }

    async fn list_running(&self, region: &Region) -> Result<Vec<ResourceInstance>> {
        let client = self.client(region);
        let mut pages = client.describe_cache_clusters().into_paginator().send();

        let mut out = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                from_sdk_error(
                    ServiceKind::ElastiCache,
                    region.as_str(),
                    "DescribeCacheClusters",
                    e,
                )
            })?;
            out.extend(instances_from(&page, region));
        }
        debug!("{}: {} cache nodes", region, out.len());
        Ok(out)
    }

    async fn list_reservations(&self, region: &Region) -> Result<Vec<Reservation>> {
        let client = self.client(region);
        let mut pages = client
            .describe_reserved_cache_nodes()
            .into_paginator()
            .send();

        let mut out = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                from_sdk_error(
                    ServiceKind::ElastiCache,
                    region.as_str(),
                    "DescribeReservedCacheNodes",
                    e,
                )
            })?;
            out.extend(
                page.reserved_cache_nodes()
                    .iter()
                    .filter_map(|node| reservation_from(node, region)),
            );
        }
        debug!("{}: {} active cache node reservations", region, out.len());
        Ok(out)
    }
}
