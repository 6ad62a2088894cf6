pub use self::accessor::{ClusterAccessor, ClusterError};

pub mod client;
pub mod metrics;

mod accessor;

/// Sentinel namespace name that selects every namespace in the cluster.
pub const ALL_NAMESPACES: &str = "all";
