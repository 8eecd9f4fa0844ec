//! EC2 running instances and reserved instances

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ec2::config::Region as AwsRegion;
use aws_sdk_ec2::operation::describe_instances::DescribeInstancesOutput;
use aws_sdk_ec2::types::{Filter, ReservedInstances};
use aws_sdk_ec2::Client;
use tracing::debug;

use super::errors::from_sdk_error;
use super::unit_count;
use crate::coverage::types::{Region, Reservation, ResourceInstance, ACTIVE_STATE};
use crate::error::Result;
use crate::service::{ResourceService, ServiceKind};

pub struct Ec2Service {
    sdk_config: SdkConfig,
}

impl Ec2Service {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            sdk_config: sdk_config.clone(),
        }
    }

    fn client(&self, region: &Region) -> Client {
        let conf = aws_sdk_ec2::config::Builder::from(&self.sdk_config)
            .region(AwsRegion::new(region.as_str().to_string()))
            .build();
        Client::from_conf(conf)
    }
}

/// Flatten reservation groups; each group holds one or more instances
fn instances_from(page: &DescribeInstancesOutput, region: &Region) -> Vec<ResourceInstance> {
    page.reservations()
        .iter()
        .flat_map(|group| group.instances())
        .filter_map(|instance| instance.instance_type())
        .map(|instance_type| ResourceInstance::new(region.clone(), instance_type.as_str()))
        .collect()
}

/// Records come back filtered to `state=active`; a missing state is taken as active
fn reservation_from(ri: &ReservedInstances, region: &Region) -> Option<Reservation> {
    let reservation = Reservation::new(
        region.clone(),
        ri.instance_type()?.as_str(),
        unit_count(ri.instance_count()),
        ri.state().map(|s| s.as_str()).unwrap_or(ACTIVE_STATE),
    );
    reservation.is_active().then_some(reservation)
}

#[async_trait]
impl ResourceService for Ec2Service {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Ec2
    }

    fn type_key(&self) -> &'static str {
        ServiceKind::Ec2.type_key()
    }

    async fn list_running(&self, region: &Region) -> Result<Vec<ResourceInstance>> {
        let client = self.client(region);
        let mut pages = client
            .describe_instances()
            .filters(
                Filter::builder()
                    .name("instance-state-name")
                    .values("running")
                    .build(),
            )
            .into_paginator()
            .send();

        let mut out = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                from_sdk_error(ServiceKind::Ec2, region.as_str(), "DescribeInstances", e)
            })?;
            out.extend(instances_from(&page, region));
        }
        debug!("{}: {} running EC2 instances", region, out.len());
        Ok(out)
    }

    async fn list_reservations(&self, region: &Region) -> Result<Vec<Reservation>> {
        let client = self.client(region);
        // DescribeReservedInstances is not paginated
        let response = client
            .describe_reserved_instances()
            .filters(Filter::builder().name("state").values(ACTIVE_STATE).build())
            .send()
            .await
            .map_err(|e| {
                from_sdk_error(
                    ServiceKind::Ec2,
                    region.as_str(),
                    "DescribeReservedInstances",
                    e,
                )
            })?;

        let out: Vec<Reservation> = response
            .reserved_instances()
            .iter()
            .filter_map(|ri| reservation_from(ri, region))
            .collect();
        debug!("{}: {} active EC2 reservations", region, out.len());
        Ok(out)
    }
}
