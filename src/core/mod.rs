pub mod types;
pub mod report;
pub mod thresholds;

pub use types::*;
pub use report::*;
pub use thresholds::*;
