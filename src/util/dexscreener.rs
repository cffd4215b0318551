/// DexScreener API client for token pair and market data

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ApiSettings;
use crate::core::ChainId;
use crate::error::MarketDataError;
use crate::market::MarketDataSource;
use crate::util::cache::{Clock, TtlCache};

pub const DEXSCREENER_API: &str = "https://api.dexscreener.com";
pub const CACHE_DURATION_SECS: u64 = 30;
pub const API_TIMEOUT_SECS: u64 = 15;
const USER_AGENT: &str = concat!("sentinel/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DexScreenerResponse {
    #[serde(rename = "schemaVersion", default)]
    pub schema_version: String,
    pub pairs: Option<Vec<TokenPair>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TokenPair {
    #[serde(rename = "chainId")]
    pub chain_id: String,
    #[serde(rename = "dexId", default)]
    pub dex_id: String,
    pub url: Option<String>,
    #[serde(rename = "pairAddress", default)]
    pub pair_address: String,
    #[serde(rename = "baseToken", default)]
    pub base_token: PairToken,
    #[serde(rename = "quoteToken", default)]
    pub quote_token: PairToken,
    #[serde(rename = "priceNative")]
    pub price_native: Option<String>,
    #[serde(rename = "priceUsd")]
    pub price_usd: Option<String>,
    #[serde(default)]
    pub txns: Transactions,
    #[serde(default)]
    pub volume: Volume,
    #[serde(rename = "priceChange", default)]
    pub price_change: PriceChange,
    pub liquidity: Option<Liquidity>,
    pub fdv: Option<f64>,
    #[serde(rename = "marketCap")]
    pub market_cap: Option<f64>,
    /// Milliseconds since the epoch
    #[serde(rename = "pairCreatedAt")]
    pub pair_created_at: Option<i64>,
}

impl TokenPair {
    pub fn liquidity_usd(&self) -> f64 {
        self.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0)
    }

    pub fn price_usd(&self) -> f64 {
        self.price_usd
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PairToken {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Transactions {
    pub m5: TransactionCount,
    pub h1: TransactionCount,
    pub h6: TransactionCount,
    pub h24: TransactionCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TransactionCount {
    pub buys: u64,
    pub sells: u64,
}

impl TransactionCount {
    pub fn total(&self) -> u64 {
        self.buys.saturating_add(self.sells)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Volume {
    pub h24: f64,
    pub h6: f64,
    pub h1: f64,
    pub m5: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PriceChange {
    pub m5: f64,
    pub h1: f64,
    pub h6: f64,
    pub h24: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Liquidity {
    pub usd: Option<f64>,
    #[serde(default)]
    pub base: f64,
    #[serde(default)]
    pub quote: f64,
}

pub struct DexScreenerClient {
    client: Client,
    base_url: String,
    cache: TtlCache<(ChainId, String), Vec<TokenPair>>,
}

impl DexScreenerClient {
    pub fn with_settings(
        settings: &ApiSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cache: TtlCache::new(cache_ttl(settings.cache_ttl_secs), clock),
        })
    }

    pub fn cache(&self) -> &TtlCache<(ChainId, String), Vec<TokenPair>> {
        &self.cache
    }

    async fn fetch_pairs(&self, address: &str) -> Result<Vec<TokenPair>, MarketDataError> {
        let url = format!("{}/latest/dex/tokens/{}", self.base_url, address);

        debug!(%url, "🌐 Fetching token pairs from DexScreener");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }
        if !status.is_success() {
            return Err(MarketDataError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        parse_pairs(&body)
    }
}

#[async_trait]
impl MarketDataSource for DexScreenerClient {
    async fn get_token_pairs(
        &self,
        token_address: &str,
        chain: ChainId,
    ) -> Result<Vec<TokenPair>, MarketDataError> {
        let key = (chain, chain.normalize_address(token_address));
        if let Some(pairs) = self.cache.get(&key) {
            debug!(%chain, token = token_address, "💾 Using cached DexScreener data");
            return Ok(pairs);
        }

        let pairs = filter_chain(self.fetch_pairs(token_address).await?, chain);
        if pairs.is_empty() {
            warn!(%chain, token = token_address, "⚠️ DexScreener returned no pairs");
        } else {
            info!(
                %chain,
                token = token_address,
                pairs = pairs.len(),
                "📊 DexScreener pairs loaded"
            );
        }

        let purged = self.cache.purge_expired();
        if purged > 0 {
            debug!(purged, "🧹 Dropped expired DexScreener cache entries");
        }
        self.cache.insert(key, pairs.clone());
        Ok(pairs)
    }
}

/// Seconds beyond chrono's range saturate to the longest representable TTL
fn cache_ttl(secs: u64) -> chrono::Duration {
    chrono::Duration::from_std(Duration::from_secs(secs)).unwrap_or(chrono::Duration::MAX)
}

/// `pairs: null` is how DexScreener answers for unknown tokens
pub fn parse_pairs(body: &str) -> Result<Vec<TokenPair>, MarketDataError> {
    let data: DexScreenerResponse = serde_json::from_str(body)?;
    Ok(data.pairs.unwrap_or_default())
}

pub fn filter_chain(pairs: Vec<TokenPair>, chain: ChainId) -> Vec<TokenPair> {
    pairs
        .into_iter()
        .filter(|p| p.chain_id.eq_ignore_ascii_case(chain.as_str()))
        .collect()
}
