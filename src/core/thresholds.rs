/// Heuristic weights and cut-offs used by the safety checks

use serde::{Deserialize, Serialize};

use super::types::RiskLevel;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub honeypot: HoneypotThresholds,
    pub liquidity: LiquidityThresholds,
    pub concentration: ConcentrationThresholds,
    pub age: AgeThresholds,
    pub activity: ActivityThresholds,
    pub balance: BalanceThresholds,
    pub tiers: TierThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoneypotThresholds {
    pub weight: f64,
    /// Minimum 24h transactions before the sell-share test applies
    pub min_txns_24h: u64,
    /// Sell share of 24h transactions below which sells look blocked
    pub max_sell_share: f64,
    /// Rising-price pattern: minimum 24h change in percent
    pub pump_min_change_24h: f64,
    pub pump_max_sells: u64,
    pub pump_min_buys: u64,
}

impl Default for HoneypotThresholds {
    fn default() -> Self {
        Self {
            weight: 40.0,
            min_txns_24h: 50,
            max_sell_share: 0.05,
            pump_min_change_24h: 50.0,
            pump_max_sells: 5,
            pump_min_buys: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityThresholds {
    pub weight: f64,
    pub critical_below_usd: f64,
    pub high_below_usd: f64,
    pub medium_below_usd: f64,
    pub high_factor: f64,
    pub medium_factor: f64,
}

impl Default for LiquidityThresholds {
    fn default() -> Self {
        Self {
            weight: 15.0,
            critical_below_usd: 10_000.0,
            high_below_usd: 50_000.0,
            medium_below_usd: 250_000.0,
            high_factor: 0.6,
            medium_factor: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcentrationThresholds {
    pub weight: f64,
    /// Few trades carrying large volume suggests a handful of holders
    pub max_txns_24h: u64,
    pub min_volume_24h_usd: f64,
    pub concentrated_estimate_pct: f64,
    pub normal_estimate_pct: f64,
    /// Used when pair data is unavailable
    pub unknown_estimate_pct: f64,
    pub high_above_pct: f64,
    pub medium_above_pct: f64,
    pub medium_factor: f64,
}

impl Default for ConcentrationThresholds {
    fn default() -> Self {
        Self {
            weight: 20.0,
            max_txns_24h: 50,
            min_volume_24h_usd: 100_000.0,
            concentrated_estimate_pct: 70.0,
            normal_estimate_pct: 40.0,
            unknown_estimate_pct: 50.0,
            high_above_pct: 70.0,
            medium_above_pct: 50.0,
            medium_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgeThresholds {
    pub weight: f64,
    pub new_below_hours: f64,
    pub young_below_hours: f64,
    pub young_factor: f64,
}

impl Default for AgeThresholds {
    fn default() -> Self {
        Self {
            weight: 10.0,
            new_below_hours: 1.0,
            young_below_hours: 24.0,
            young_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityThresholds {
    pub high_above_ratio: f64,
    pub low_at_or_below_ratio: f64,
    pub low_activity_points: f64,
}

impl Default for ActivityThresholds {
    fn default() -> Self {
        Self {
            high_above_ratio: 10.0,
            low_at_or_below_ratio: 1.0,
            low_activity_points: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceThresholds {
    pub one_sided_above: f64,
    pub one_sided_points: f64,
    pub imbalanced_above: f64,
    pub imbalanced_below: f64,
    pub imbalanced_points: f64,
}

impl Default for BalanceThresholds {
    fn default() -> Self {
        Self {
            one_sided_above: 0.9,
            one_sided_points: 10.0,
            imbalanced_above: 0.75,
            imbalanced_below: 0.25,
            imbalanced_points: 5.0,
        }
    }
}

/// Minimum score for each tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub critical: u8,
    pub high: u8,
    pub medium: u8,
    pub low: u8,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            critical: 60,
            high: 40,
            medium: 25,
            low: 10,
        }
    }
}

impl TierThresholds {
    /// Map a clamped score to a tier. A flagged honeypot is always critical.
    pub fn classify(&self, score: u8, is_honeypot: bool) -> RiskLevel {
        if is_honeypot || score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else if score >= self.low {
            RiskLevel::Low
        } else {
            RiskLevel::Safe
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        let tiers = TierThresholds::default();
        assert_eq!(tiers.classify(0, false), RiskLevel::Safe);
        assert_eq!(tiers.classify(9, false), RiskLevel::Safe);
        assert_eq!(tiers.classify(10, false), RiskLevel::Low);
        assert_eq!(tiers.classify(24, false), RiskLevel::Low);
        assert_eq!(tiers.classify(25, false), RiskLevel::Medium);
        assert_eq!(tiers.classify(39, false), RiskLevel::Medium);
        assert_eq!(tiers.classify(40, false), RiskLevel::High);
        assert_eq!(tiers.classify(59, false), RiskLevel::High);
        assert_eq!(tiers.classify(60, false), RiskLevel::Critical);
        assert_eq!(tiers.classify(100, false), RiskLevel::Critical);
    }

    #[test]
    fn test_honeypot_overrides_score() {
        let tiers = TierThresholds::default();
        assert_eq!(tiers.classify(0, true), RiskLevel::Critical);
    }

    #[test]
    fn test_classification_is_monotonic() {
        let tiers = TierThresholds::default();
        let mut previous = RiskLevel::Safe;
        for score in 0..=100u8 {
            let tier = tiers.classify(score, false);
            assert!(tier >= previous);
            previous = tier;
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let thresholds: RiskThresholds = toml::from_str(
            r#"
            [liquidity]
            critical_below_usd = 20000.0

            [tiers]
            critical = 70
            "#,
        )
        .unwrap();

        assert_eq!(thresholds.liquidity.critical_below_usd, 20_000.0);
        assert_eq!(thresholds.liquidity.weight, 15.0);
        assert_eq!(thresholds.tiers.critical, 70);
        assert_eq!(thresholds.tiers.high, 40);
        assert_eq!(thresholds.honeypot, HoneypotThresholds::default());
    }
}
