use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::util::dexscreener::{PriceChange, TokenPair, TransactionCount};

/// Buy/sell counts per trading window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowCounts {
    pub m5: TransactionCount,
    pub h1: TransactionCount,
    pub h6: TransactionCount,
    pub h24: TransactionCount,
}

/// Point-in-time market view of one token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub pair_address: String,
    pub symbol: String,
    pub price_usd: f64,
    pub price_change_m5: f64,
    pub price_change_h1: f64,
    pub price_change_h6: f64,
    pub price_change_h24: f64,
    pub volume_h1: f64,
    pub volume_h24: f64,
    pub liquidity_usd: f64,
    pub market_cap: Option<f64>,
    pub fdv: Option<f64>,
    pub txns: WindowCounts,
    pub pair_created_at: Option<DateTime<Utc>>,
}

impl MarketSnapshot {
    pub fn from_pair(pair: &TokenPair) -> Self {
        let PriceChange { m5, h1, h6, h24 } = pair.price_change;

        Self {
            pair_address: pair.pair_address.clone(),
            symbol: pair.base_token.symbol.clone(),
            price_usd: pair.price_usd(),
            price_change_m5: m5,
            price_change_h1: h1,
            price_change_h6: h6,
            price_change_h24: h24,
            volume_h1: pair.volume.h1,
            volume_h24: pair.volume.h24,
            liquidity_usd: pair.liquidity_usd(),
            market_cap: pair.market_cap,
            fdv: pair.fdv,
            txns: WindowCounts {
                m5: pair.txns.m5,
                h1: pair.txns.h1,
                h6: pair.txns.h6,
                h24: pair.txns.h24,
            },
            pair_created_at: pair
                .pair_created_at
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        }
    }

    /// 24h volume divided by liquidity, 0 when there is no liquidity
    pub fn volume_to_liquidity(&self) -> f64 {
        if self.liquidity_usd > 0.0 {
            self.volume_h24 / self.liquidity_usd
        } else {
            0.0
        }
    }
}

/// Pair with the highest USD liquidity
pub fn best_pair(pairs: &[TokenPair]) -> Option<&TokenPair> {
    pairs
        .iter()
        .max_by(|a, b| a.liquidity_usd().total_cmp(&b.liquidity_usd()))
}
