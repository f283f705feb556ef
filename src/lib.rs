pub mod config;
pub mod consts;
pub mod error;
pub mod optimizer;
pub mod partition;
pub mod population;
pub mod scorer;

pub use error::{TeamForgeError, TfResult};
pub use optimizer::{Optimizer, OptimizerOptions};
pub use partition::{PartitionState, PartitionView};
pub use scorer::{CostFunction, FairnessCost};
