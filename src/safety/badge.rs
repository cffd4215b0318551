use serde::Serialize;

use crate::core::RiskLevel;

/// Display metadata for a risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskBadge {
    pub text: &'static str,
    /// Hex color
    pub color: &'static str,
    pub emoji: &'static str,
}

pub fn risk_badge(level: RiskLevel) -> RiskBadge {
    match level {
        RiskLevel::Safe => RiskBadge {
            text: "Safe",
            color: "#22c55e",
            emoji: "✅",
        },
        RiskLevel::Low => RiskBadge {
            text: "Low Risk",
            color: "#84cc16",
            emoji: "🟢",
        },
        RiskLevel::Medium => RiskBadge {
            text: "Medium Risk",
            color: "#eab308",
            emoji: "⚠️",
        },
        RiskLevel::High => RiskBadge {
            text: "High Risk",
            color: "#f97316",
            emoji: "🔶",
        },
        RiskLevel::Critical => RiskBadge {
            text: "Critical Risk",
            color: "#ef4444",
            emoji: "🚨",
        },
    }
}
