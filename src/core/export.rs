use std::io::Write;

use super::store::ResourceStore;

#[cfg(test)]
#[path = "./export.tests.rs"]
mod export_tests;

/// Writes the store as a flat comma-separated report, one line per pod.\
/// Values are raw integers in their native units (millicores for CPU, bytes
/// for memory and disk), usage bounds that were never sampled render as zero.
pub fn export(store: &ResourceStore, writer: &mut impl Write) -> std::io::Result<()> {
    for (namespace, pod, resources) in store.iter() {
        writeln!(
            writer,
            "{}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}",
            namespace,
            pod,
            resources.requests.cpu,
            resources.requests.memory,
            resources.requests.disk,
            resources.limits.cpu,
            resources.limits.memory,
            resources.limits.disk,
            resources.cpu_usage.min(),
            resources.usage.cpu,
            resources.cpu_usage.max(),
            resources.memory_usage.min(),
            resources.usage.memory,
            resources.memory_usage.max(),
            resources.usage.disk,
        )?;
    }

    Ok(())
}
