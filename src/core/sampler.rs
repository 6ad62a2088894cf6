use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::kubernetes::ClusterAccessor;

use super::aggregator::aggregate;
use super::store::ResourceStore;

#[cfg(test)]
#[path = "./sampler.tests.rs"]
mod sampler_tests;

/// Polls the cluster on a background task until cancelled, accumulating results in a store.\
/// Only one poll is ever in flight and an in-flight poll runs to completion before
/// the cancellation is observed.
#[derive(Default)]
pub struct PodSampler {
    task: Option<JoinHandle<ResourceStore>>,
    cancellation_token: Option<CancellationToken>,
}

impl PodSampler {
    /// Starts new [`PodSampler`] task that polls the cluster every `interval`.\
    /// The task takes ownership of `store` and gives it back from [`PodSampler::stop`].
    pub fn start(
        &mut self,
        accessor: Arc<dyn ClusterAccessor>,
        mut store: ResourceStore,
        namespaces: Vec<String>,
        interval: Duration,
    ) {
        self.cancel();

        let cancellation_token = CancellationToken::new();
        let _cancellation_token = cancellation_token.clone();

        let task = tokio::spawn(async move {
            while !_cancellation_token.is_cancelled() {
                match aggregate(&mut store, accessor.as_ref(), &namespaces).await {
                    Ok(()) => debug!("polling pass finished, {} pods tracked", store.pods_count()),
                    Err(error) => error!("polling pass failed: {}", error),
                }

                tokio::select! {
                    _ = _cancellation_token.cancelled() => (),
                    _ = sleep(interval) => (),
                }
            }

            store
        });

        self.cancellation_token = Some(cancellation_token);
        self.task = Some(task);
    }

    /// Cancels [`PodSampler`] task.
    pub fn cancel(&mut self) {
        if let Some(cancellation_token) = self.cancellation_token.take() {
            cancellation_token.cancel();
        }
    }

    /// Cancels [`PodSampler`] task and waits until it is finished,
    /// returning the accumulated store.
    pub async fn stop(&mut self) -> Option<ResourceStore> {
        self.cancel();

        match self.task.take() {
            Some(task) => task.await.ok(),
            None => None,
        }
    }
}

impl Drop for PodSampler {
    fn drop(&mut self) {
        self.cancel();
    }
}
