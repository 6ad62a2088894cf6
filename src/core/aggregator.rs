use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use tracing::debug;

use crate::kubernetes::metrics::{PodMetrics, cpu_millis, memory_bytes};
use crate::kubernetes::{ALL_NAMESPACES, ClusterAccessor, ClusterError};

use super::store::{PodResources, ResourceStore};

#[cfg(test)]
#[path = "./aggregator.tests.rs"]
mod aggregator_tests;

/// Runs one polling pass over the target namespaces, updating the store in place.\
/// Figures for each pod are staged and committed only after all its fetches succeed,
/// so a failed pass never leaves partial figures behind.
pub async fn aggregate(
    store: &mut ResourceStore,
    accessor: &dyn ClusterAccessor,
    namespaces: &[String],
) -> Result<(), ClusterError> {
    let targets = resolve_namespaces(accessor.list_namespaces().await?, namespaces);

    for namespace in &targets {
        for pod in accessor.list_pods(namespace).await? {
            let name = pod.name_any();
            if !is_running(&pod) {
                debug!("pod '{}' in '{}' is not running", name, namespace);
                continue;
            }

            let mut resources = store.get(namespace, &name).cloned().unwrap_or_default();
            resources.reset_totals();

            collect_containers(&mut resources, &pod)?;
            collect_volumes(&mut resources, &pod, namespace, accessor).await?;
            collect_usage(&mut resources, &accessor.get_pod_metrics(namespace, &name).await?)?;
            resources.observe_usage();

            store.insert(namespace, &name, resources);
        }
    }

    Ok(())
}

/// Resolves configured namespace names against namespaces existing in the cluster.\
/// Configured names unknown to the cluster are silently dropped.
fn resolve_namespaces(all: Vec<String>, configured: &[String]) -> Vec<String> {
    if configured.iter().any(|n| n == ALL_NAMESPACES) {
        all
    } else {
        all.into_iter().filter(|n| configured.contains(n)).collect()
    }
}

fn is_running(pod: &Pod) -> bool {
    pod.status.as_ref().and_then(|s| s.phase.as_deref()) == Some("Running")
}

/// Sums requests and limits over all containers of the pod.
fn collect_containers(resources: &mut PodResources, pod: &Pod) -> Result<(), ClusterError> {
    let Some(spec) = &pod.spec else {
        return Ok(());
    };

    for container in &spec.containers {
        let Some(requirements) = &container.resources else {
            continue;
        };

        if let Some(requests) = &requirements.requests {
            resources.requests.cpu += cpu_millis(requests.get("cpu"))?;
            resources.requests.memory += memory_bytes(requests.get("memory"))?;
        }

        if let Some(limits) = &requirements.limits {
            resources.limits.cpu += cpu_millis(limits.get("cpu"))?;
            resources.limits.memory += memory_bytes(limits.get("memory"))?;
        }
    }

    Ok(())
}

/// Sums storage requests and limits over all persistent volume claims referenced by the pod.
async fn collect_volumes(
    resources: &mut PodResources,
    pod: &Pod,
    namespace: &str,
    accessor: &dyn ClusterAccessor,
) -> Result<(), ClusterError> {
    let Some(volumes) = pod.spec.as_ref().and_then(|s| s.volumes.as_ref()) else {
        return Ok(());
    };

    for volume in volumes {
        let Some(claim_source) = &volume.persistent_volume_claim else {
            continue;
        };

        let claim = accessor
            .get_persistent_volume_claim(namespace, &claim_source.claim_name)
            .await?;
        let Some(requirements) = claim.spec.as_ref().and_then(|s| s.resources.as_ref()) else {
            continue;
        };

        if let Some(requests) = &requirements.requests {
            resources.requests.disk += memory_bytes(requests.get("storage"))?;
        }

        if let Some(limits) = &requirements.limits {
            resources.limits.disk += memory_bytes(limits.get("storage"))?;
        }
    }

    Ok(())
}

/// Sums live usage over all containers reported in the pod metrics.
fn collect_usage(resources: &mut PodResources, metrics: &PodMetrics) -> Result<(), ClusterError> {
    for container in &metrics.containers {
        resources.usage.cpu += cpu_millis(container.usage.cpu.as_ref())?;
        resources.usage.memory += memory_bytes(container.usage.memory.as_ref())?;
        resources.usage.disk += memory_bytes(container.usage.storage.as_ref())?;
    }

    Ok(())
}
