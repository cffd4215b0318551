/// Token safety analysis

pub mod badge;
pub mod checks;
pub mod scorer;

pub use badge::{risk_badge, RiskBadge};
pub use scorer::SafetyScorer;
