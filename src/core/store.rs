use std::collections::HashMap;

#[cfg(test)]
#[path = "./store.tests.rs"]
mod store_tests;

/// Totals for one metric class, tracked per resource kind.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceFigures {
    /// CPU in millicores.
    pub cpu: u64,

    /// Memory in bytes.
    pub memory: u64,

    /// Disk in bytes.
    pub disk: u64,
}

/// Running usage bounds for a single resource kind.\
/// Bounds start unset so that a genuinely zero first sample still seeds them.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageBounds {
    min: Option<u64>,
    max: Option<u64>,
}

impl UsageBounds {
    /// Tightens bounds with a new sample, the first sample seeds both.
    pub fn observe(&mut self, sample: u64) {
        self.min = Some(self.min.map_or(sample, |min| min.min(sample)));
        self.max = Some(self.max.map_or(sample, |max| max.max(sample)));
    }

    /// Returns the lowest observed sample or zero if nothing was sampled yet.
    pub fn min(&self) -> u64 {
        self.min.unwrap_or_default()
    }

    /// Returns the highest observed sample or zero if nothing was sampled yet.
    pub fn max(&self) -> u64 {
        self.max.unwrap_or_default()
    }

    /// Returns `true` if at least one sample was observed.
    pub fn is_set(&self) -> bool {
        self.min.is_some()
    }
}

/// Aggregated resource figures for a single pod.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct PodResources {
    pub requests: ResourceFigures,
    pub limits: ResourceFigures,
    pub usage: ResourceFigures,
    pub cpu_usage: UsageBounds,
    pub memory_usage: UsageBounds,
    pub disk_usage: UsageBounds,
}

impl PodResources {
    /// Clears figures that are re-summed on every poll, keeping the usage bounds.
    pub fn reset_totals(&mut self) {
        self.requests = ResourceFigures::default();
        self.limits = ResourceFigures::default();
        self.usage = ResourceFigures::default();
    }

    /// Folds current usage totals into the running min/max bounds.
    pub fn observe_usage(&mut self) {
        self.cpu_usage.observe(self.usage.cpu);
        self.memory_usage.observe(self.usage.memory);
        self.disk_usage.observe(self.usage.disk);
    }
}

/// In-memory store of per-pod resource figures keyed by namespace and pod name.\
/// Records are created on the first sighting of a pod and kept for the life of the run.
#[derive(Default, Debug)]
pub struct ResourceStore {
    namespaces: HashMap<String, HashMap<String, PodResources>>,
}

impl ResourceStore {
    /// Returns resources recorded for the provided pod.
    pub fn get(&self, namespace: &str, pod: &str) -> Option<&PodResources> {
        self.namespaces.get(namespace).and_then(|pods| pods.get(pod))
    }

    /// Inserts or replaces resources recorded for the provided pod.
    pub fn insert(&mut self, namespace: &str, pod: &str, resources: PodResources) {
        self.namespaces
            .entry(namespace.to_owned())
            .or_default()
            .insert(pod.to_owned(), resources);
    }

    /// Returns number of pods tracked in the store.
    pub fn pods_count(&self) -> usize {
        self.namespaces.values().map(|pods| pods.len()).sum()
    }

    /// Returns `true` if the store tracks no pods.
    pub fn is_empty(&self) -> bool {
        self.pods_count() == 0
    }

    /// Iterates over all tracked pods as (namespace, pod name, resources) triples.\
    /// Iteration order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &PodResources)> {
        self.namespaces.iter().flat_map(|(namespace, pods)| {
            pods.iter()
                .map(move |(pod, resources)| (namespace.as_str(), pod.as_str(), resources))
        })
    }
}
