/// Token safety scorer: runs the heuristic checks and classifies the result

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::checks::{self, CheckOutcome};
use crate::core::{
    ChainId, ContractInfo, LiquidityLockInfo, RiskThresholds, SafetyCheck, SafetyReport,
};
use crate::market::MarketDataSource;
use crate::util::cache::{Clock, SystemClock};

pub struct SafetyScorer<S: ?Sized> {
    source: Arc<S>,
    thresholds: RiskThresholds,
    clock: Arc<dyn Clock>,
}

impl<S> SafetyScorer<S>
where
    S: MarketDataSource + ?Sized,
{
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            thresholds: RiskThresholds::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Produce a complete report. Fetch failures degrade individual checks and never
    /// surface as errors: an unreachable source scores as low risk.
    #[instrument(skip(self), fields(chain = %chain))]
    pub async fn analyze(&self, chain: ChainId, token_address: &str) -> SafetyReport {
        let t = &self.thresholds;

        let pairs = match self.source.get_token_pairs(token_address, chain).await {
            Ok(pairs) => Some(pairs),
            Err(e) => {
                warn!(error = %e, "⚠️ Pair lookup failed, honeypot and concentration fall back");
                None
            }
        };

        // Served from the source's cache when it has one
        let market = match self.source.get_token_market_data(token_address, chain).await {
            Ok(market) => market,
            Err(e) => {
                warn!(error = %e, "⚠️ Market data unavailable, skipping market checks");
                None
            }
        };

        let mut outcomes: Vec<CheckOutcome> = Vec::with_capacity(6);

        let (honeypot, outcome) = match &pairs {
            Some(pairs) => checks::honeypot(pairs, &t.honeypot),
            None => checks::honeypot_unavailable(),
        };
        outcomes.push(outcome);

        if let Some(snapshot) = &market {
            outcomes.push(checks::liquidity(snapshot, &t.liquidity));
        }

        let holders = match &pairs {
            Some(pairs) => checks::estimate_holders(pairs, &t.concentration),
            None => checks::unknown_holders(&t.concentration),
        };
        outcomes.push(checks::concentration(&holders, &t.concentration));

        if let Some(snapshot) = &market {
            outcomes.extend(checks::token_age(snapshot, self.clock.now(), &t.age));
            outcomes.push(checks::trading_activity(snapshot, &t.activity));
            outcomes.extend(checks::buy_sell_balance(snapshot, &t.balance));
        } else {
            debug!("Liquidity, age, activity and balance checks skipped");
        }

        let points: f64 = outcomes.iter().map(|o| o.points).sum();
        let risk_score = points.round().clamp(0.0, 100.0) as u8;
        let overall_risk = t.tiers.classify(risk_score, honeypot.is_honeypot);
        let checks: Vec<SafetyCheck> = outcomes.into_iter().map(|o| o.check).collect();

        info!(
            token = token_address,
            risk_score,
            overall_risk = %overall_risk,
            honeypot = honeypot.is_honeypot,
            checks = checks.len(),
            "🛡️ Safety analysis complete"
        );

        SafetyReport {
            chain,
            token_address: token_address.to_string(),
            overall_risk,
            risk_score,
            checks,
            honeypot,
            holders,
            liquidity: LiquidityLockInfo::default(),
            contract: ContractInfo::default(),
            analyzed_at: self.clock.now(),
        }
    }

    pub async fn quick_risk_score(&self, chain: ChainId, token_address: &str) -> u8 {
        self.analyze(chain, token_address).await.risk_score
    }

    /// Analyze several tokens concurrently. Reports come back in input order.
    pub async fn analyze_many(&self, tokens: &[(ChainId, String)]) -> Vec<SafetyReport> {
        join_all(
            tokens
                .iter()
                .map(|(chain, address)| self.analyze(*chain, address)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RiskLevel, TierThresholds};
    use crate::error::MarketDataError;
    use crate::market::{best_pair, MarketSnapshot};
    use crate::util::cache::ManualClock;
    use crate::util::dexscreener::{Liquidity, TokenPair, TransactionCount};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeSource {
        pairs: HashMap<String, Vec<TokenPair>>,
        fail_pairs: bool,
        fail_market: bool,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn with_pair(address: &str, pair: TokenPair) -> Self {
            let mut pairs = HashMap::new();
            pairs.insert(address.to_string(), vec![pair]);
            Self {
                pairs,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl MarketDataSource for FakeSource {
        async fn get_token_pairs(
            &self,
            token_address: &str,
            _chain: ChainId,
        ) -> Result<Vec<TokenPair>, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_pairs {
                return Err(MarketDataError::RateLimited);
            }
            Ok(self.pairs.get(token_address).cloned().unwrap_or_default())
        }

        async fn get_token_market_data(
            &self,
            token_address: &str,
            _chain: ChainId,
        ) -> Result<Option<MarketSnapshot>, MarketDataError> {
            if self.fail_market {
                return Err(MarketDataError::Status {
                    status: 502,
                    url: "http://fake".to_string(),
                });
            }
            Ok(self
                .pairs
                .get(token_address)
                .and_then(|p| best_pair(p))
                .map(MarketSnapshot::from_pair))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn pair(liquidity: f64, volume: f64, buys: u64, sells: u64, age: Duration) -> TokenPair {
        let mut p = TokenPair {
            chain_id: "base".to_string(),
            pair_address: "0xpair".to_string(),
            liquidity: Some(Liquidity {
                usd: Some(liquidity),
                ..Default::default()
            }),
            pair_created_at: Some((now() - age).timestamp_millis()),
            ..Default::default()
        };
        p.volume.h24 = volume;
        p.txns.h24 = TransactionCount { buys, sells };
        p.price_change.h1 = -2.0;
        p.price_change.h24 = 4.0;
        p
    }

    fn scorer(source: FakeSource) -> SafetyScorer<FakeSource> {
        SafetyScorer::new(Arc::new(source)).with_clock(Arc::new(ManualClock::new(now())))
    }

    #[tokio::test]
    async fn test_deep_liquidity_token_is_low_risk() {
        let source = FakeSource::with_pair(
            "0xgood",
            pair(5_000_000.0, 2_500_000.0, 500, 500, Duration::days(10)),
        );
        let report = scorer(source).analyze(ChainId::Base, "0xgood").await;

        assert_eq!(report.risk_score, 5);
        assert!(matches!(report.overall_risk, RiskLevel::Safe | RiskLevel::Low));
        assert!(!report.honeypot.is_honeypot);
        assert_eq!(report.checks.len(), 6);
    }

    #[tokio::test]
    async fn test_fractional_points_round_to_nearest() {
        // moderate liquidity band (4.5) plus low activity (5)
        let source = FakeSource::with_pair(
            "0xmid",
            pair(100_000.0, 50_000.0, 500, 500, Duration::days(10)),
        );
        let report = scorer(source).analyze(ChainId::Base, "0xmid").await;

        assert_eq!(report.risk_score, 10);
        assert_eq!(report.overall_risk, RiskLevel::Low);
        assert_eq!(report.failed_checks().count(), 1);
    }

    #[tokio::test]
    async fn test_thin_honeypot_is_critical() {
        let source = FakeSource::with_pair(
            "0xtrap",
            pair(5_000.0, 20_000.0, 196, 4, Duration::days(10)),
        );
        let report = scorer(source).analyze(ChainId::Base, "0xtrap").await;

        assert!(report.honeypot.is_honeypot);
        assert_eq!(report.honeypot.sell_tax, 100.0);
        assert_eq!(report.overall_risk, RiskLevel::Critical);
        assert!(report.risk_score >= 40);
        // honeypot 40 + liquidity 15 + one-sided 10
        assert_eq!(report.risk_score, 65);
    }

    #[tokio::test]
    async fn test_honeypot_forces_critical_even_with_low_score() {
        let source = FakeSource::with_pair(
            "0xtrap",
            pair(5_000_000.0, 60_000_000.0, 196, 4, Duration::days(10)),
        );
        let mut thresholds = RiskThresholds::default();
        thresholds.honeypot.weight = 0.0;
        thresholds.balance.one_sided_points = 0.0;

        let report = scorer(source)
            .with_thresholds(thresholds)
            .analyze(ChainId::Base, "0xtrap")
            .await;

        assert_eq!(report.risk_score, 0);
        assert_eq!(report.overall_risk, RiskLevel::Critical);
    }

    #[tokio::test]
    async fn test_market_failure_keeps_only_pair_checks() {
        let mut source = FakeSource::with_pair(
            "0xtoken",
            pair(5_000.0, 1_000.0, 30, 30, Duration::minutes(5)),
        );
        source.fail_market = true;

        let report = scorer(source).analyze(ChainId::Base, "0xtoken").await;
        let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(names, vec![checks::HONEYPOT, checks::CONCENTRATION]);
        assert!(report.risk_score <= 100);
    }

    #[tokio::test]
    async fn test_total_outage_scores_zero() {
        let source = FakeSource {
            fail_pairs: true,
            fail_market: true,
            ..Default::default()
        };
        let report = scorer(source).analyze(ChainId::Solana, "anything").await;

        assert_eq!(report.risk_score, 0);
        assert_eq!(report.overall_risk, RiskLevel::Safe);
        assert_eq!(report.honeypot.reason, "Unable to check");
        assert_eq!(report.holders.top10_percentage, 50.0);
        assert!(!report.holders.is_concentrated);
        assert_eq!(report.checks.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_token_reports_no_trading_data() {
        let report = scorer(FakeSource::default())
            .analyze(ChainId::Base, "not-an-address")
            .await;

        assert_eq!(report.risk_score, 0);
        assert_eq!(report.checks.len(), 2);
        assert!(report.checks[0].details.contains("No trading data"));
    }

    #[tokio::test]
    async fn test_checks_run_in_fixed_order() {
        let source = FakeSource::with_pair(
            "0xnew",
            pair(30_000.0, 10_000.0, 90, 10, Duration::minutes(30)),
        );
        let report = scorer(source).analyze(ChainId::Base, "0xnew").await;
        let names: Vec<&str> = report.checks.iter().map(|c| c.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                checks::HONEYPOT,
                checks::LIQUIDITY,
                checks::CONCENTRATION,
                checks::TOKEN_AGE,
                checks::ACTIVITY,
                checks::BALANCE,
            ]
        );
        // liquidity 9 + age 10 + activity 5 + imbalance 5
        assert_eq!(report.risk_score, 29);
        assert_eq!(report.overall_risk, RiskLevel::Medium);
    }

    #[tokio::test]
    async fn test_score_is_clamped() {
        let source = FakeSource::with_pair(
            "0xtrap",
            pair(5_000.0, 500_000.0, 10, 0, Duration::minutes(1)),
        );
        let mut thresholds = RiskThresholds::default();
        thresholds.liquidity.weight = 80.0;
        thresholds.concentration.weight = 80.0;

        let report = scorer(source)
            .with_thresholds(thresholds)
            .analyze(ChainId::Base, "0xtrap")
            .await;

        assert_eq!(report.risk_score, 100);
        assert_eq!(report.overall_risk, RiskLevel::Critical);
    }

    #[tokio::test]
    async fn test_quick_score_matches_full_analysis() {
        let source = FakeSource::with_pair(
            "0xnew",
            pair(30_000.0, 10_000.0, 90, 10, Duration::minutes(30)),
        );
        let scorer = scorer(source);

        let full = scorer.analyze(ChainId::Base, "0xnew").await;
        let quick = scorer.quick_risk_score(ChainId::Base, "0xnew").await;
        assert_eq!(quick, full.risk_score);
    }

    #[tokio::test]
    async fn test_custom_tiers_apply() {
        let source = FakeSource::with_pair(
            "0xgood",
            pair(5_000_000.0, 2_500_000.0, 500, 500, Duration::days(10)),
        );
        let thresholds = RiskThresholds {
            tiers: TierThresholds {
                low: 5,
                ..Default::default()
            },
            ..Default::default()
        };

        let report = scorer(source)
            .with_thresholds(thresholds)
            .analyze(ChainId::Base, "0xgood")
            .await;
        assert_eq!(report.overall_risk, RiskLevel::Low);
    }

    #[tokio::test]
    async fn test_placeholder_fields_stay_unknown() {
        let source = FakeSource::with_pair(
            "0xgood",
            pair(5_000_000.0, 2_500_000.0, 500, 500, Duration::days(10)),
        );
        let report = scorer(source).analyze(ChainId::Base, "0xgood").await;

        assert_eq!(report.holders.total, None);
        assert_eq!(report.liquidity, LiquidityLockInfo::default());
        assert_eq!(report.contract, ContractInfo::default());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["liquidity"]["locked"].is_null());
        assert!(json["contract"]["verified"].is_null());
        assert_eq!(json["overallRisk"], "safe");
        assert_eq!(json["riskScore"], 5);
    }

    #[tokio::test]
    async fn test_analyze_many_keeps_input_order() {
        let mut source = FakeSource::with_pair(
            "0xgood",
            pair(5_000_000.0, 2_500_000.0, 500, 500, Duration::days(10)),
        );
        source.pairs.insert(
            "0xtrap".to_string(),
            vec![pair(5_000.0, 20_000.0, 196, 4, Duration::days(10))],
        );
        let scorer = scorer(source);

        let reports = scorer
            .analyze_many(&[
                (ChainId::Base, "0xtrap".to_string()),
                (ChainId::Base, "0xgood".to_string()),
            ])
            .await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].token_address, "0xtrap");
        assert_eq!(reports[0].overall_risk, RiskLevel::Critical);
        assert_eq!(reports[1].token_address, "0xgood");
        assert_eq!(scorer.source.calls.load(Ordering::SeqCst), 2);
    }
}
