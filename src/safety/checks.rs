//! Individual safety heuristics
//!
//! Every check is a pure function over already-fetched market data, returning the
//! [`SafetyCheck`] entry for the report and the risk points it contributes.

use chrono::{DateTime, Utc};

use crate::core::{
    ActivityThresholds, AgeThresholds, BalanceThresholds, ConcentrationThresholds, HolderInfo,
    HoneypotInfo, HoneypotThresholds, LiquidityThresholds, RiskLevel, SafetyCheck,
};
use crate::market::{best_pair, MarketSnapshot};
use crate::util::dexscreener::TokenPair;

pub const HONEYPOT: &str = "Honeypot Check";
pub const LIQUIDITY: &str = "Liquidity";
pub const CONCENTRATION: &str = "Holder Concentration";
pub const TOKEN_AGE: &str = "Token Age";
pub const ACTIVITY: &str = "Trading Activity";
pub const BALANCE: &str = "Buy/Sell Balance";

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub check: SafetyCheck,
    pub points: f64,
}

impl CheckOutcome {
    fn new(check: SafetyCheck, points: f64) -> Self {
        Self { check, points }
    }
}

pub fn honeypot(pairs: &[TokenPair], t: &HoneypotThresholds) -> (HoneypotInfo, CheckOutcome) {
    let Some(pair) = best_pair(pairs) else {
        let info = HoneypotInfo {
            reason: "No trading data".to_string(),
            ..Default::default()
        };
        let check = SafetyCheck::new(
            HONEYPOT,
            true,
            RiskLevel::Low,
            "No trading data available, cannot detect honeypot patterns",
        );
        return (info, CheckOutcome::new(check, 0.0));
    };

    let day = pair.txns.h24;
    let total = day.total();
    let sell_share = if total > 0 {
        day.sells as f64 / total as f64
    } else {
        0.0
    };
    let change = &pair.price_change;
    let only_rising = change.m5 > 0.0 && change.h1 > 0.0 && change.h6 > 0.0 && change.h24 > 0.0;

    let mut info = HoneypotInfo::default();
    if total > t.min_txns_24h && sell_share < t.max_sell_share {
        info.is_honeypot = true;
        info.sell_tax = 100.0;
        info.reason = format!(
            "Only {} of {} trades in 24h were sells ({:.1}%)",
            day.sells,
            total,
            sell_share * 100.0
        );
    } else if only_rising
        && change.h24 > t.pump_min_change_24h
        && day.sells < t.pump_max_sells
        && day.buys > t.pump_min_buys
    {
        info.is_honeypot = true;
        info.reason = format!(
            "Price up {:.0}% in 24h with {} buys and only {} sells",
            change.h24, day.buys, day.sells
        );
    }

    if info.is_honeypot {
        let check = SafetyCheck::new(HONEYPOT, false, RiskLevel::Critical, info.reason.clone());
        (info, CheckOutcome::new(check, t.weight))
    } else {
        info.reason = "Normal buy/sell pattern".to_string();
        let check = SafetyCheck::new(
            HONEYPOT,
            true,
            RiskLevel::Safe,
            format!("Sells are {:.0}% of {} trades in 24h", sell_share * 100.0, total),
        );
        (info, CheckOutcome::new(check, 0.0))
    }
}

/// Fallback when pair data could not be fetched
pub fn honeypot_unavailable() -> (HoneypotInfo, CheckOutcome) {
    let info = HoneypotInfo {
        reason: "Unable to check".to_string(),
        ..Default::default()
    };
    let check = SafetyCheck::new(HONEYPOT, true, RiskLevel::Low, "Unable to check");
    (info, CheckOutcome::new(check, 0.0))
}

pub fn liquidity(snapshot: &MarketSnapshot, t: &LiquidityThresholds) -> CheckOutcome {
    let usd = snapshot.liquidity_usd;
    let amount = format_usd(usd);

    let (passed, severity, points, details) = if usd < t.critical_below_usd {
        (false, RiskLevel::Critical, t.weight, format!("Very low liquidity ({})", amount))
    } else if usd < t.high_below_usd {
        (
            false,
            RiskLevel::High,
            t.weight * t.high_factor,
            format!("Low liquidity ({})", amount),
        )
    } else if usd < t.medium_below_usd {
        (
            true,
            RiskLevel::Medium,
            t.weight * t.medium_factor,
            format!("Moderate liquidity ({})", amount),
        )
    } else {
        (true, RiskLevel::Safe, 0.0, format!("Good liquidity ({})", amount))
    };

    CheckOutcome::new(SafetyCheck::new(LIQUIDITY, passed, severity, details), points)
}

/// Estimate top-10 holder share from trade count versus volume.
///
/// No holder indexer is integrated: a token moving large volume through very few
/// trades is assumed to be held by a handful of wallets.
pub fn estimate_holders(pairs: &[TokenPair], t: &ConcentrationThresholds) -> HolderInfo {
    let Some(pair) = best_pair(pairs) else {
        return unknown_holders(t);
    };

    let concentrated =
        pair.txns.h24.total() < t.max_txns_24h && pair.volume.h24 > t.min_volume_24h_usd;

    HolderInfo {
        total: None,
        top10_percentage: if concentrated {
            t.concentrated_estimate_pct
        } else {
            t.normal_estimate_pct
        },
        is_concentrated: concentrated,
    }
}

/// Neutral estimate used when pair data is missing
pub fn unknown_holders(t: &ConcentrationThresholds) -> HolderInfo {
    HolderInfo {
        total: None,
        top10_percentage: t.unknown_estimate_pct,
        is_concentrated: false,
    }
}

pub fn concentration(holders: &HolderInfo, t: &ConcentrationThresholds) -> CheckOutcome {
    let pct = holders.top10_percentage;

    let (passed, severity, points, details) = if holders.is_concentrated || pct > t.high_above_pct
    {
        (
            false,
            RiskLevel::High,
            t.weight,
            format!("Highly concentrated: top 10 holders est. {:.0}%", pct),
        )
    } else if pct > t.medium_above_pct {
        (
            false,
            RiskLevel::Medium,
            t.weight * t.medium_factor,
            format!("Moderately concentrated: top 10 holders est. {:.0}%", pct),
        )
    } else {
        (
            true,
            RiskLevel::Safe,
            0.0,
            format!("Distribution looks normal: top 10 holders est. {:.0}%", pct),
        )
    };

    CheckOutcome::new(SafetyCheck::new(CONCENTRATION, passed, severity, details), points)
}

/// `None` when the pair creation time is unknown
pub fn token_age(
    snapshot: &MarketSnapshot,
    now: DateTime<Utc>,
    t: &AgeThresholds,
) -> Option<CheckOutcome> {
    let created = snapshot.pair_created_at?;
    let age = (now - created).max(chrono::Duration::zero());
    let hours = age.num_seconds() as f64 / 3600.0;
    let described = describe_age(age);

    let outcome = if hours < t.new_below_hours {
        CheckOutcome::new(
            SafetyCheck::new(
                TOKEN_AGE,
                false,
                RiskLevel::High,
                format!("Very new token, created {} ago", described),
            ),
            t.weight,
        )
    } else if hours < t.young_below_hours {
        CheckOutcome::new(
            SafetyCheck::new(
                TOKEN_AGE,
                true,
                RiskLevel::Medium,
                format!("New token, created {} ago", described),
            ),
            t.weight * t.young_factor,
        )
    } else {
        CheckOutcome::new(
            SafetyCheck::new(
                TOKEN_AGE,
                true,
                RiskLevel::Safe,
                format!("Established token, created {} ago", described),
            ),
            0.0,
        )
    };

    Some(outcome)
}

pub fn trading_activity(snapshot: &MarketSnapshot, t: &ActivityThresholds) -> CheckOutcome {
    let ratio = snapshot.volume_to_liquidity();

    if ratio > t.high_above_ratio {
        CheckOutcome::new(
            SafetyCheck::new(
                ACTIVITY,
                true,
                RiskLevel::Safe,
                format!("High trading activity ({:.1}x volume/liquidity)", ratio),
            ),
            0.0,
        )
    } else if ratio > t.low_at_or_below_ratio {
        CheckOutcome::new(
            SafetyCheck::new(
                ACTIVITY,
                true,
                RiskLevel::Low,
                format!("Moderate trading activity ({:.1}x volume/liquidity)", ratio),
            ),
            0.0,
        )
    } else {
        CheckOutcome::new(
            SafetyCheck::new(
                ACTIVITY,
                false,
                RiskLevel::Medium,
                format!("Low trading activity ({:.2}x volume/liquidity)", ratio),
            ),
            t.low_activity_points,
        )
    }
}

/// `None` when there were no trades in the last 24h
pub fn buy_sell_balance(snapshot: &MarketSnapshot, t: &BalanceThresholds) -> Option<CheckOutcome> {
    let day = snapshot.txns.h24;
    let total = day.total();
    if total == 0 {
        return None;
    }

    let buy_ratio = day.buys as f64 / total as f64;
    let buy_pct = buy_ratio * 100.0;

    let outcome = if buy_ratio > t.one_sided_above {
        CheckOutcome::new(
            SafetyCheck::new(
                BALANCE,
                false,
                RiskLevel::High,
                format!("One-sided trading: {:.0}% buys", buy_pct),
            ),
            t.one_sided_points,
        )
    } else if buy_ratio > t.imbalanced_above || buy_ratio < t.imbalanced_below {
        CheckOutcome::new(
            SafetyCheck::new(
                BALANCE,
                false,
                RiskLevel::Medium,
                format!("Imbalanced trading: {:.0}% buys", buy_pct),
            ),
            t.imbalanced_points,
        )
    } else {
        CheckOutcome::new(
            SafetyCheck::new(
                BALANCE,
                true,
                RiskLevel::Safe,
                format!("Balanced trading: {:.0}% buys", buy_pct),
            ),
            0.0,
        )
    };

    Some(outcome)
}

fn format_usd(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

fn describe_age(age: chrono::Duration) -> String {
    if age.num_hours() >= 48 {
        format!("{} days", age.num_days())
    } else if age.num_minutes() >= 60 {
        format!("{:.1} hours", age.num_minutes() as f64 / 60.0)
    } else {
        format!("{} minutes", age.num_minutes())
    }
}
