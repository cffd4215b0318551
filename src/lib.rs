// Core types, report and thresholds
pub mod core;
pub mod error;

// Market data plumbing
pub mod market;
pub mod util;

// Scoring and monitoring
pub mod safety;
pub mod monitor;

pub mod config;

// Re-export commonly used types for convenience
pub use crate::core::*;
pub use error::{ConfigError, MarketDataError};
pub use market::{MarketDataSource, MarketSnapshot};
pub use safety::{risk_badge, RiskBadge, SafetyScorer};
pub use util::dexscreener::DexScreenerClient;
