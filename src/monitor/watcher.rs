/// Watchlist monitor: re-scores configured tokens on an interval and reports tier changes

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::config::ConfigManager;
use crate::core::{ChainId, RiskLevel, SafetyReport};
use crate::market::MarketDataSource;
use crate::safety::{risk_badge, SafetyScorer};
use crate::util::cache::{Clock, SystemClock};

#[derive(Debug, Clone, PartialEq)]
pub struct TierChange {
    pub chain: ChainId,
    pub address: String,
    /// `None` on the first observation
    pub from: Option<RiskLevel>,
    pub to: RiskLevel,
    pub risk_score: u8,
}

impl TierChange {
    pub fn is_escalation(&self) -> bool {
        self.from.map_or(false, |from| self.to > from)
    }
}

pub struct WatchlistMonitor<S: ?Sized> {
    source: Arc<S>,
    config: Arc<ConfigManager>,
    clock: Arc<dyn Clock>,
    last_tiers: HashMap<(ChainId, String), RiskLevel>,
}

impl<S> WatchlistMonitor<S>
where
    S: MarketDataSource + ?Sized,
{
    pub fn new(source: Arc<S>, config: Arc<ConfigManager>) -> Self {
        Self {
            source,
            config,
            clock: Arc::new(SystemClock),
            last_tiers: HashMap::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn last_tier(&self, chain: ChainId, address: &str) -> Option<RiskLevel> {
        self.last_tiers
            .get(&(chain, chain.normalize_address(address)))
            .copied()
    }

    /// Score the current watchlist once. Thresholds are read fresh from the config
    /// so hot-reloaded edits apply on the next poll.
    #[instrument(skip(self))]
    pub async fn poll_once(&mut self) -> Vec<TierChange> {
        let config = self.config.get_config().await;
        let targets = config.watch_targets();
        if targets.is_empty() {
            debug!("Watchlist is empty");
            return Vec::new();
        }

        let scorer = SafetyScorer::new(Arc::clone(&self.source))
            .with_thresholds(config.thresholds.clone())
            .with_clock(Arc::clone(&self.clock));

        let reports = scorer.analyze_many(&targets).await;
        reports
            .iter()
            .filter_map(|report| self.record(report))
            .collect()
    }

    fn record(&mut self, report: &SafetyReport) -> Option<TierChange> {
        let key = (report.chain, report.chain.normalize_address(&report.token_address));
        let previous = self.last_tiers.insert(key, report.overall_risk);
        if previous == Some(report.overall_risk) {
            return None;
        }

        let change = TierChange {
            chain: report.chain,
            address: report.token_address.clone(),
            from: previous,
            to: report.overall_risk,
            risk_score: report.risk_score,
        };

        let badge = risk_badge(change.to);
        if change.is_escalation() || (previous.is_none() && change.to >= RiskLevel::High) {
            warn!(
                chain = %change.chain,
                token = %change.address,
                from = ?change.from,
                to = %change.to,
                risk_score = change.risk_score,
                "{} Risk tier raised to {}",
                badge.emoji,
                badge.text
            );
        } else {
            info!(
                chain = %change.chain,
                token = %change.address,
                from = ?change.from,
                to = %change.to,
                risk_score = change.risk_score,
                "{} Risk tier now {}",
                badge.emoji,
                badge.text
            );
        }

        Some(change)
    }

    /// Poll interval from the current config, never below one second
    pub async fn poll_interval(&self) -> Duration {
        let config = self.config.get_config().await;
        Duration::from_secs(config.watch.interval_secs.max(1))
    }

    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let mut every = self.poll_interval().await;
        let mut ticker = poll_ticker(Instant::now(), every);
        let tokens = self.config.get_config().await.watchlist.len();

        info!(
            tokens,
            interval_secs = every.as_secs(),
            "👁️ Watchlist monitor starting"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let changes = self.poll_once().await;
                    debug!(changes = changes.len(), "Watchlist poll complete");

                    let reloaded = self.poll_interval().await;
                    if reloaded != every {
                        info!(
                            from_secs = every.as_secs(),
                            to_secs = reloaded.as_secs(),
                            "⏱️ Watch interval changed"
                        );
                        every = reloaded;
                        ticker = poll_ticker(Instant::now() + every, every);
                    }
                }
                _ = shutdown.recv() => {
                    info!("🛑 Watchlist monitor shutting down gracefully");
                    return Ok(());
                }
            }
        }
    }
}

fn poll_ticker(start: Instant, every: Duration) -> Interval {
    let mut ticker = interval_at(start, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
