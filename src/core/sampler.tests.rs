use super::*;
use crate::kubernetes::ClusterError;
use crate::kubernetes::metrics::PodMetrics;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Accessor that counts polls and exposes no pods.
#[derive(Default)]
struct CountingCluster {
    polls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl ClusterAccessor for CountingCluster {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        self.polls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            Err(ClusterError::KubeError(kube::Error::Api(kube::core::ErrorResponse {
                status: "Failure".to_owned(),
                message: "boom".to_owned(),
                reason: "InternalError".to_owned(),
                code: 500,
            })))
        } else {
            Ok(vec!["default".to_owned()])
        }
    }

    async fn list_pods(&self, _namespace: &str) -> Result<Vec<Pod>, ClusterError> {
        Ok(Vec::new())
    }

    async fn get_persistent_volume_claim(
        &self,
        _namespace: &str,
        _name: &str,
    ) -> Result<PersistentVolumeClaim, ClusterError> {
        unreachable!("no pods are exposed")
    }

    async fn get_pod_metrics(&self, _namespace: &str, _name: &str) -> Result<PodMetrics, ClusterError> {
        unreachable!("no pods are exposed")
    }
}

#[tokio::test]
async fn sampler_polls_until_stopped_test() {
    let cluster = Arc::new(CountingCluster::default());
    let mut sampler = PodSampler::default();
    sampler.start(
        cluster.clone(),
        ResourceStore::default(),
        vec!["all".to_owned()],
        Duration::from_millis(10),
    );

    tokio::time::sleep(Duration::from_millis(45)).await;
    let store = sampler.stop().await.expect("sampler should give the store back");

    assert!(store.is_empty());
    assert!(cluster.polls.load(Ordering::Relaxed) >= 2);
}

#[tokio::test]
async fn sampler_continues_after_poll_errors_test() {
    let cluster = Arc::new(CountingCluster {
        polls: AtomicUsize::new(0),
        fail: true,
    });
    let mut sampler = PodSampler::default();
    sampler.start(
        cluster.clone(),
        ResourceStore::default(),
        vec!["all".to_owned()],
        Duration::from_millis(10),
    );

    tokio::time::sleep(Duration::from_millis(45)).await;
    let store = sampler.stop().await.expect("sampler should give the store back");

    assert!(store.is_empty());
    assert!(cluster.polls.load(Ordering::Relaxed) >= 2);
}

#[tokio::test]
async fn sampler_cancellation_is_prompt_test() {
    let cluster = Arc::new(CountingCluster::default());
    let mut sampler = PodSampler::default();
    sampler.start(
        cluster.clone(),
        ResourceStore::default(),
        vec!["all".to_owned()],
        Duration::from_secs(3_600),
    );

    tokio::time::sleep(Duration::from_millis(20)).await;
    let stopped = tokio::time::timeout(Duration::from_millis(500), sampler.stop()).await;

    assert!(stopped.expect("cancellation must not wait for the full interval").is_some());
    assert_eq!(1, cluster.polls.load(Ordering::Relaxed));
}

#[tokio::test]
async fn stop_without_start_test() {
    let mut sampler = PodSampler::default();
    assert!(sampler.stop().await.is_none());
}
