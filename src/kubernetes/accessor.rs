use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, PersistentVolumeClaim, Pod};
use kube::{Api, ResourceExt, api::ListParams};

use super::client::KubernetesClient;
use super::metrics::{PodMetrics, QuantityError};

/// Possible errors from polling the cluster.
#[derive(thiserror::Error, Debug)]
pub enum ClusterError {
    /// Kubernetes API request failed.
    #[error("kubernetes API request failed")]
    KubeError(#[from] kube::Error),

    /// Cluster returned an unparseable resource quantity.
    #[error("cluster returned an unparseable resource quantity")]
    QuantityError(#[from] QuantityError),
}

/// Capability consumed by the aggregator to reach the cluster.
#[async_trait]
pub trait ClusterAccessor: Send + Sync {
    /// Lists names of all namespaces in the cluster.
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError>;

    /// Lists pods in the provided namespace.
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, ClusterError>;

    /// Gets a persistent volume claim by name.
    async fn get_persistent_volume_claim(&self, namespace: &str, name: &str)
    -> Result<PersistentVolumeClaim, ClusterError>;

    /// Gets live metrics for the provided pod.
    async fn get_pod_metrics(&self, namespace: &str, name: &str) -> Result<PodMetrics, ClusterError>;
}

#[async_trait]
impl ClusterAccessor for KubernetesClient {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        let namespaces: Api<Namespace> = Api::all(self.get_client());
        let list = namespaces.list(&ListParams::default()).await?;

        Ok(list.items.into_iter().map(|n| n.name_any()).collect())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, ClusterError> {
        let pods: Api<Pod> = Api::namespaced(self.get_client(), namespace);

        Ok(pods.list(&ListParams::default()).await?.items)
    }

    async fn get_persistent_volume_claim(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<PersistentVolumeClaim, ClusterError> {
        let claims: Api<PersistentVolumeClaim> = Api::namespaced(self.get_client(), namespace);

        Ok(claims.get(name).await?)
    }

    async fn get_pod_metrics(&self, namespace: &str, name: &str) -> Result<PodMetrics, ClusterError> {
        let metrics: Api<PodMetrics> = Api::namespaced(self.get_client(), namespace);

        Ok(metrics.get(name).await?)
    }
}
