//! RDS DB instances and reserved DB instances

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_rds::config::Region as AwsRegion;
use aws_sdk_rds::operation::describe_db_instances::DescribeDbInstancesOutput;
use aws_sdk_rds::types::ReservedDbInstance;
use aws_sdk_rds::Client;
use tracing::debug;

use super::errors::from_sdk_error;
use super::unit_count;
use crate::coverage::types::{Region, Reservation, ResourceInstance};
use crate::error::Result;
use crate::service::{ResourceService, ServiceKind};

pub struct RdsService {
    sdk_config: SdkConfig,
}

impl RdsService {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            sdk_config: sdk_config.clone(),
        }
    }

    fn client(&self, region: &Region) -> Client {
        let conf = aws_sdk_rds::config::Builder::from(&self.sdk_config)
            .region(AwsRegion::new(region.as_str().to_string()))
            .build();
        Client::from_conf(conf)
    }
}

fn instances_from(page: &DescribeDbInstancesOutput, region: &Region) -> Vec<ResourceInstance> {
    page.db_instances()
        .iter()
        .filter_map(|db| db.db_instance_class())
        .map(|class| ResourceInstance::new(region.clone(), class))
        .collect()
}

/// No server-side state filter for RDS; retired and pending records map to `None`
fn reservation_from(ri: &ReservedDbInstance, region: &Region) -> Option<Reservation> {
    let reservation = Reservation::new(
        region.clone(),
        ri.db_instance_class()?,
        unit_count(ri.db_instance_count()),
        ri.state().unwrap_or_default(),
    );
    reservation.is_active().then_some(reservation)
}

#[async_trait]
impl ResourceService for RdsService {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Rds
    }

    fn type_key(&self) -> &'static str {
        ServiceKind::Rds.type_key()
    }

    async fn list_running(&self, region: &Region) -> Result<Vec<ResourceInstance>> {
        let client = self.client(region);
        let mut pages = client.describe_db_instances().into_paginator().send();

        let mut out = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                from_sdk_error(ServiceKind::Rds, region.as_str(), "DescribeDBInstances", e)
            })?;
            out.extend(instances_from(&page, region));
        }
        debug!("{}: {} RDS instances", region, out.len());
        Ok(out)
    }

    async fn list_reservations(&self, region: &Region) -> Result<Vec<Reservation>> {
        let client = self.client(region);
        let mut pages = client
            .describe_reserved_db_instances()
            .into_paginator()
            .send();

        let mut out = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                from_sdk_error(
                    ServiceKind::Rds,
                    region.as_str(),
                    "DescribeReservedDBInstances",
                    e,
                )
            })?;
            out.extend(
                page.reserved_db_instances()
                    .iter()
                    .filter_map(|ri| reservation_from(ri, region)),
            );
        }
        debug!("{}: {} active RDS reservations", region, out.len());
        Ok(out)
    }
}
