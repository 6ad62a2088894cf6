pub use self::aggregator::aggregate;
pub use self::export::export;
pub use self::sampler::PodSampler;
pub use self::store::{PodResources, ResourceFigures, ResourceStore, UsageBounds};

mod aggregator;
mod export;
mod sampler;
mod store;
