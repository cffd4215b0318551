/// Safety report structures returned by the scorer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{ChainId, RiskLevel, Severity};

/// One named heuristic result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyCheck {
    pub name: String,
    pub passed: bool,
    pub severity: Severity,
    pub details: String,
}

impl SafetyCheck {
    pub fn new(name: &str, passed: bool, severity: Severity, details: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            passed,
            severity,
            details: details.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoneypotInfo {
    pub is_honeypot: bool,
    pub buy_tax: f64,
    pub sell_tax: f64,
    pub transfer_tax: f64,
    pub reason: String,
}

impl Default for HoneypotInfo {
    fn default() -> Self {
        Self {
            is_honeypot: false,
            buy_tax: 0.0,
            sell_tax: 0.0,
            transfer_tax: 0.0,
            reason: String::new(),
        }
    }
}

/// Holder distribution. `total` has no data source yet and stays `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderInfo {
    pub total: Option<u64>,
    pub top10_percentage: f64,
    pub is_concentrated: bool,
}

/// Liquidity lock status. No lock-detection source is wired in, so every field is unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityLockInfo {
    pub locked: Option<bool>,
    pub lock_duration: Option<u64>,
    pub lock_percentage: Option<f64>,
}

/// Contract verification status. Requires bytecode analysis, so every field is unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    pub verified: Option<bool>,
    pub renounced: Option<bool>,
    pub has_proxy: Option<bool>,
    pub has_mint: Option<bool>,
    pub has_blacklist: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReport {
    pub chain: ChainId,
    pub token_address: String,
    pub overall_risk: RiskLevel,
    pub risk_score: u8,
    /// In execution order, not sorted by severity
    pub checks: Vec<SafetyCheck>,
    pub honeypot: HoneypotInfo,
    pub holders: HolderInfo,
    pub liquidity: LiquidityLockInfo,
    pub contract: ContractInfo,
    pub analyzed_at: DateTime<Utc>,
}

impl SafetyReport {
    pub fn failed_checks(&self) -> impl Iterator<Item = &SafetyCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }
}
