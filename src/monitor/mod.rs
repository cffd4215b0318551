pub mod watcher;

pub use watcher::{TierChange, WatchlistMonitor};
