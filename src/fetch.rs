//! Multi-region fetching
//!
//! Runs a service's two listings across every region. Regions are fetched
//! sequentially by default; with `concurrency > 1` up to that many regions are
//! in flight at once, and results are still returned in region order.
//! The first error aborts the whole fetch.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::info;

use crate::coverage::types::{Region, Reservation, ResourceInstance};
use crate::error::Result;
use crate::retry::{ExponentialBackoffPolicy, RetryPolicy};
use crate::service::ResourceService;

#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Regions in flight at once
    pub concurrency: usize,
    pub retry: ExponentialBackoffPolicy,
}

impl FetchOptions {
    /// `max_attempts` counts the first call of each listing
    pub fn new(concurrency: usize, max_attempts: u32) -> Self {
        Self {
            concurrency: concurrency.max(1),
            retry: ExponentialBackoffPolicy::new(max_attempts),
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::new(1, 3)
    }
}

/// Everything fetched for one service
#[derive(Debug, Default)]
pub struct Inventory {
    pub instances: Vec<ResourceInstance>,
    pub reservations: Vec<Reservation>,
}

pub async fn list_running(
    service: &dyn ResourceService,
    regions: &[Region],
    options: &FetchOptions,
) -> Result<Vec<ResourceInstance>> {
    let per_region: Vec<Vec<ResourceInstance>> = stream::iter(regions)
        .map(move |region| {
            options
                .retry
                .execute_with_retry(move || service.list_running(region))
        })
        .buffered(options.concurrency)
        .try_collect()
        .await?;
    Ok(per_region.into_iter().flatten().collect())
}

pub async fn list_reservations(
    service: &dyn ResourceService,
    regions: &[Region],
    options: &FetchOptions,
) -> Result<Vec<Reservation>> {
    let per_region: Vec<Vec<Reservation>> = stream::iter(regions)
        .map(move |region| {
            options
                .retry
                .execute_with_retry(move || service.list_reservations(region))
        })
        .buffered(options.concurrency)
        .try_collect()
        .await?;
    Ok(per_region.into_iter().flatten().collect())
}

/// Running resources first, then reservations
pub async fn fetch_inventory(
    service: &dyn ResourceService,
    regions: &[Region],
    options: &FetchOptions,
) -> Result<Inventory> {
    let kind = service.kind();
    let instances = list_running(service, regions, options).await?;
    let reservations = list_reservations(service, regions, options).await?;
    info!(
        "{}: {} running, {} active reservations across {} regions",
        kind,
        instances.len(),
        reservations.len(),
        regions.len()
    );
    Ok(Inventory {
        instances,
        reservations,
    })
}
