//! Market-data aggregator seam
//!
//! The scorer only depends on [`MarketDataSource`]. Production code plugs in
//! [`DexScreenerClient`](crate::util::dexscreener::DexScreenerClient); tests plug in fakes.

pub mod snapshot;

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::ChainId;
use crate::error::MarketDataError;
use crate::util::dexscreener::TokenPair;

pub use snapshot::{best_pair, MarketSnapshot, WindowCounts};

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// All trading pairs for a token on one chain. Unknown tokens yield an empty list.
    async fn get_token_pairs(
        &self,
        token_address: &str,
        chain: ChainId,
    ) -> Result<Vec<TokenPair>, MarketDataError>;

    /// Aggregated snapshot taken from the most liquid pair, `None` when the token has no pairs.
    async fn get_token_market_data(
        &self,
        token_address: &str,
        chain: ChainId,
    ) -> Result<Option<MarketSnapshot>, MarketDataError> {
        let pairs = self.get_token_pairs(token_address, chain).await?;
        Ok(best_pair(&pairs).map(MarketSnapshot::from_pair))
    }
}

#[async_trait]
impl<T: MarketDataSource + ?Sized> MarketDataSource for Arc<T> {
    async fn get_token_pairs(
        &self,
        token_address: &str,
        chain: ChainId,
    ) -> Result<Vec<TokenPair>, MarketDataError> {
        (**self).get_token_pairs(token_address, chain).await
    }

    async fn get_token_market_data(
        &self,
        token_address: &str,
        chain: ChainId,
    ) -> Result<Option<MarketSnapshot>, MarketDataError> {
        (**self).get_token_market_data(token_address, chain).await
    }
}
