/// Configuration management with hot-reload

pub mod settings;
pub mod manager;

pub use settings::*;
pub use manager::ConfigManager;
