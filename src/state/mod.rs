//! State: the shared partition of operations into active, completed, and errored.

mod aggregator;
mod operation;

pub use aggregator::{Snapshot, StateAggregator};
pub use operation::{OperationKind, Phase};
