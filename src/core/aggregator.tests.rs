use super::*;
use crate::kubernetes::metrics::{ContainerMetrics, ContainerUsage};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{
    Container, PersistentVolumeClaim, PersistentVolumeClaimSpec, PersistentVolumeClaimVolumeSource, PodSpec, PodStatus,
    ResourceRequirements, Volume, VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use rstest::rstest;
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
struct FakeCluster {
    namespaces: Vec<String>,
    pods: HashMap<String, Vec<Pod>>,
    claims: HashMap<(String, String), PersistentVolumeClaim>,
    metrics: HashMap<(String, String), PodMetrics>,
}

impl FakeCluster {
    fn with_namespaces(names: &[&str]) -> Self {
        Self {
            namespaces: names.iter().map(|n| (*n).to_owned()).collect(),
            ..Default::default()
        }
    }

    fn add_pod(&mut self, namespace: &str, pod: Pod) {
        self.pods.entry(namespace.to_owned()).or_default().push(pod);
    }

    fn set_metrics(&mut self, namespace: &str, pod: &str, metrics: PodMetrics) {
        self.metrics.insert((namespace.to_owned(), pod.to_owned()), metrics);
    }
}

#[async_trait]
impl ClusterAccessor for FakeCluster {
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        Ok(self.namespaces.clone())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, ClusterError> {
        Ok(self.pods.get(namespace).cloned().unwrap_or_default())
    }

    async fn get_persistent_volume_claim(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<PersistentVolumeClaim, ClusterError> {
        self.claims
            .get(&(namespace.to_owned(), name.to_owned()))
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn get_pod_metrics(&self, namespace: &str, name: &str) -> Result<PodMetrics, ClusterError> {
        self.metrics
            .get(&(namespace.to_owned(), name.to_owned()))
            .cloned()
            .ok_or_else(|| not_found(name))
    }
}

fn not_found(name: &str) -> ClusterError {
    ClusterError::KubeError(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_owned(),
        message: format!("'{name}' not found"),
        reason: "NotFound".to_owned(),
        code: 404,
    }))
}

fn pod(namespace: &str, name: &str, phase: &str, containers: Vec<Container>, volumes: Option<Vec<Volume>>) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            namespace: Some(namespace.to_owned()),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers,
            volumes,
            ..Default::default()
        }),
        status: Some(PodStatus {
            phase: Some(phase.to_owned()),
            ..Default::default()
        }),
    }
}

fn container(requests: &[(&str, &str)], limits: &[(&str, &str)]) -> Container {
    Container {
        name: "main".to_owned(),
        resources: Some(ResourceRequirements {
            requests: if requests.is_empty() { None } else { Some(quantities(requests)) },
            limits: if limits.is_empty() { None } else { Some(quantities(limits)) },
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn claim(storage_request: &str, storage_limit: &str) -> PersistentVolumeClaim {
    PersistentVolumeClaim {
        spec: Some(PersistentVolumeClaimSpec {
            resources: Some(VolumeResourceRequirements {
                requests: Some(quantities(&[("storage", storage_request)])),
                limits: Some(quantities(&[("storage", storage_limit)])),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn pvc_volume(claim_name: &str) -> Volume {
    Volume {
        name: "data".to_owned(),
        persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
            claim_name: claim_name.to_owned(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn usage(cpu: &str, memory: &str) -> PodMetrics {
    PodMetrics {
        metadata: ObjectMeta::default(),
        containers: vec![ContainerMetrics {
            name: "main".to_owned(),
            usage: ContainerUsage {
                cpu: Some(Quantity(cpu.to_owned())),
                memory: Some(Quantity(memory.to_owned())),
                storage: None,
            },
        }],
    }
}

fn quantities(items: &[(&str, &str)]) -> BTreeMap<String, Quantity> {
    items
        .iter()
        .map(|(key, value)| ((*key).to_owned(), Quantity((*value).to_owned())))
        .collect()
}

#[tokio::test]
async fn two_polls_track_usage_bounds_test() {
    let mut cluster = FakeCluster::with_namespaces(&["team-a"]);
    cluster.add_pod(
        "team-a",
        pod(
            "team-a",
            "api-0",
            "Running",
            vec![container(&[("cpu", "100m"), ("memory", "128Mi")], &[("cpu", "200m"), ("memory", "256Mi")])],
            None,
        ),
    );
    cluster.set_metrics("team-a", "api-0", usage("50m", "64Mi"));

    let mut store = ResourceStore::default();
    let namespaces = vec!["all".to_owned()];

    aggregate(&mut store, &cluster, &namespaces).await.unwrap();

    cluster.set_metrics("team-a", "api-0", usage("150m", "200Mi"));
    aggregate(&mut store, &cluster, &namespaces).await.unwrap();

    let resources = store.get("team-a", "api-0").unwrap();
    assert_eq!(100, resources.requests.cpu);
    assert_eq!(134_217_728, resources.requests.memory);
    assert_eq!(200, resources.limits.cpu);
    assert_eq!(268_435_456, resources.limits.memory);

    assert_eq!(150, resources.usage.cpu);
    assert_eq!((50, 150), (resources.cpu_usage.min(), resources.cpu_usage.max()));
    assert_eq!(209_715_200, resources.usage.memory);
    assert_eq!(
        (67_108_864, 209_715_200),
        (resources.memory_usage.min(), resources.memory_usage.max())
    );
}

#[tokio::test]
async fn totals_reflect_latest_container_set_test() {
    let mut cluster = FakeCluster::with_namespaces(&["team-a"]);
    cluster.add_pod(
        "team-a",
        pod(
            "team-a",
            "api-0",
            "Running",
            vec![container(&[("cpu", "100m")], &[]), container(&[("cpu", "200m")], &[])],
            None,
        ),
    );
    cluster.set_metrics("team-a", "api-0", usage("10m", "1Mi"));

    let mut store = ResourceStore::default();
    let namespaces = vec!["all".to_owned()];

    aggregate(&mut store, &cluster, &namespaces).await.unwrap();
    assert_eq!(300, store.get("team-a", "api-0").unwrap().requests.cpu);

    cluster.pods.get_mut("team-a").unwrap()[0] =
        pod("team-a", "api-0", "Running", vec![container(&[("cpu", "100m")], &[])], None);
    aggregate(&mut store, &cluster, &namespaces).await.unwrap();

    assert_eq!(100, store.get("team-a", "api-0").unwrap().requests.cpu);
}

#[tokio::test]
async fn not_running_pod_is_skipped_test() {
    let mut cluster = FakeCluster::with_namespaces(&["team-a"]);
    cluster.add_pod("team-a", pod("team-a", "api-0", "Pending", vec![container(&[("cpu", "100m")], &[])], None));

    let mut store = ResourceStore::default();
    aggregate(&mut store, &cluster, &["all".to_owned()]).await.unwrap();

    assert!(store.is_empty());
}

#[rstest]
#[case(&["all"], &["ns-a", "ns-b"])]
#[case(&["ns-a", "ns-missing"], &["ns-a"])]
#[case(&[], &[])]
#[tokio::test]
async fn namespace_selection_test(#[case] configured: &[&str], #[case] expected: &[&str]) {
    let mut cluster = FakeCluster::with_namespaces(&["ns-a", "ns-b"]);
    for namespace in ["ns-a", "ns-b"] {
        cluster.add_pod(namespace, pod(namespace, "pod-0", "Running", vec![container(&[], &[])], None));
        cluster.set_metrics(namespace, "pod-0", usage("1m", "1Mi"));
    }

    let configured = configured.iter().map(|n| (*n).to_owned()).collect::<Vec<_>>();
    let mut store = ResourceStore::default();
    aggregate(&mut store, &cluster, &configured).await.unwrap();

    let mut polled = store.iter().map(|(ns, _, _)| ns).collect::<Vec<_>>();
    polled.sort_unstable();
    assert_eq!(expected, polled.as_slice());
}

#[tokio::test]
async fn claim_storage_counts_as_disk_test() {
    let mut cluster = FakeCluster::with_namespaces(&["team-a"]);
    cluster.add_pod(
        "team-a",
        pod(
            "team-a",
            "db-0",
            "Running",
            vec![container(&[], &[])],
            Some(vec![pvc_volume("db-data")]),
        ),
    );
    cluster
        .claims
        .insert(("team-a".to_owned(), "db-data".to_owned()), claim("1Gi", "2Gi"));
    cluster.set_metrics("team-a", "db-0", usage("1m", "1Mi"));

    let mut store = ResourceStore::default();
    aggregate(&mut store, &cluster, &["all".to_owned()]).await.unwrap();

    let resources = store.get("team-a", "db-0").unwrap();
    assert_eq!(1_073_741_824, resources.requests.disk);
    assert_eq!(2_147_483_648, resources.limits.disk);
}

#[tokio::test]
async fn missing_claim_aborts_poll_test() {
    let mut cluster = FakeCluster::with_namespaces(&["team-a"]);
    cluster.add_pod(
        "team-a",
        pod("team-a", "db-0", "Running", vec![container(&[("cpu", "100m")], &[])], None),
    );
    cluster.set_metrics("team-a", "db-0", usage("50m", "64Mi"));

    let mut store = ResourceStore::default();
    let namespaces = vec!["all".to_owned()];
    aggregate(&mut store, &cluster, &namespaces).await.unwrap();
    let before = store.get("team-a", "db-0").cloned().unwrap();

    // second poll references a claim the cluster cannot resolve
    cluster.pods.get_mut("team-a").unwrap()[0] = pod(
        "team-a",
        "db-0",
        "Running",
        vec![container(&[("cpu", "100m")], &[])],
        Some(vec![pvc_volume("missing")]),
    );

    let result = aggregate(&mut store, &cluster, &namespaces).await;
    assert!(matches!(result, Err(ClusterError::KubeError(_))));
    assert_eq!(Some(&before), store.get("team-a", "db-0"));
}

#[tokio::test]
async fn missing_metrics_abort_poll_without_record_test() {
    let mut cluster = FakeCluster::with_namespaces(&["team-a"]);
    cluster.add_pod("team-a", pod("team-a", "api-0", "Running", vec![container(&[], &[])], None));

    let mut store = ResourceStore::default();
    let result = aggregate(&mut store, &cluster, &["all".to_owned()]).await;

    assert!(result.is_err());
    assert!(store.is_empty());
}
