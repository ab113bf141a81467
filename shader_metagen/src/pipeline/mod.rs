/// Pipeline-level reconciliation: declared input, per-pipeline aggregation
/// and cross-pipeline global set population

pub mod pipeline_config;
pub mod aggregator;
pub mod global_populator;

pub use pipeline_config::*;
pub use aggregator::*;
pub use global_populator::*;
