use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownChain;

/// Chains the market-data aggregator indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
    Ethereum,
    Base,
    Arbitrum,
    Optimism,
    Polygon,
    Bsc,
    Avalanche,
    Solana,
    Fantom,
    Blast,
    Linea,
    Zksync,
}

impl ChainId {
    pub const ALL: [ChainId; 12] = [
        ChainId::Ethereum,
        ChainId::Base,
        ChainId::Arbitrum,
        ChainId::Optimism,
        ChainId::Polygon,
        ChainId::Bsc,
        ChainId::Avalanche,
        ChainId::Solana,
        ChainId::Fantom,
        ChainId::Blast,
        ChainId::Linea,
        ChainId::Zksync,
    ];

    /// DexScreener chain id
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "ethereum",
            ChainId::Base => "base",
            ChainId::Arbitrum => "arbitrum",
            ChainId::Optimism => "optimism",
            ChainId::Polygon => "polygon",
            ChainId::Bsc => "bsc",
            ChainId::Avalanche => "avalanche",
            ChainId::Solana => "solana",
            ChainId::Fantom => "fantom",
            ChainId::Blast => "blast",
            ChainId::Linea => "linea",
            ChainId::Zksync => "zksync",
        }
    }

    pub fn is_evm(&self) -> bool {
        !matches!(self, ChainId::Solana)
    }

    /// EVM addresses are case-insensitive hex; base58 addresses are not
    pub fn normalize_address(&self, address: &str) -> String {
        let address = address.trim();
        if self.is_evm() {
            address.to_ascii_lowercase()
        } else {
            address.to_string()
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainId {
    type Err = UnknownChain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chain = match s.trim().to_ascii_lowercase().as_str() {
            "ethereum" | "eth" | "mainnet" => ChainId::Ethereum,
            "base" => ChainId::Base,
            "arbitrum" | "arb" => ChainId::Arbitrum,
            "optimism" | "op" => ChainId::Optimism,
            "polygon" | "matic" => ChainId::Polygon,
            "bsc" | "bnb" => ChainId::Bsc,
            "avalanche" | "avax" => ChainId::Avalanche,
            "solana" | "sol" => ChainId::Solana,
            "fantom" | "ftm" => ChainId::Fantom,
            "blast" => ChainId::Blast,
            "linea" => ChainId::Linea,
            "zksync" => ChainId::Zksync,
            _ => return Err(UnknownChain(s.to_string())),
        };
        Ok(chain)
    }
}

/// Discrete risk classification, ordered from least to most risky.
///
/// Used both as the overall tier of a report and as the severity of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Low,
    Medium,
    High,
    Critical,
}

/// Severity of an individual check
pub type Severity = RiskLevel;

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(RiskLevel::Safe),
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            other => Err(format!("unknown risk level `{}`", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_parsing_accepts_aliases() {
        assert_eq!("ETH".parse::<ChainId>(), Ok(ChainId::Ethereum));
        assert_eq!("bnb".parse::<ChainId>(), Ok(ChainId::Bsc));
        assert_eq!(" solana ".parse::<ChainId>(), Ok(ChainId::Solana));
        assert!("dogechain".parse::<ChainId>().is_err());
    }

    #[test]
    fn test_chain_round_trips_through_its_id() {
        for chain in ChainId::ALL {
            assert_eq!(chain.as_str().parse::<ChainId>(), Ok(chain));
        }
    }

    #[test]
    fn test_only_evm_addresses_are_lowercased() {
        assert_eq!(ChainId::Base.normalize_address(" 0xAbC "), "0xabc");
        assert_eq!(
            ChainId::Solana.normalize_address("So11111111111111111111111111111111111111112"),
            "So11111111111111111111111111111111111111112"
        );
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Safe < RiskLevel::Low);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert_eq!(
            serde_json::to_string(&RiskLevel::Critical).unwrap(),
            "\"critical\""
        );
    }
}
