//! Configuration: per-chain contract addresses and client settings.

use alloy_primitives::{address, Address};
use serde::Deserialize;

use crate::signing::SignatureType;
use crate::{Error, Result};

/// Chain ID for Polygon mainnet.
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Chain ID for Polygon Amoy testnet.
pub const POLYGON_AMOY_CHAIN_ID: u64 = 80002;

/// Decimals of the USDC collateral token. Order amounts are encoded at this scale.
pub const COLLATERAL_TOKEN_DECIMALS: u32 = 6;

/// Decimals of the conditional (outcome) tokens.
pub const CONDITIONAL_TOKEN_DECIMALS: u32 = 6;

/// Default CLOB API base URL.
pub const DEFAULT_HOST: &str = "https://clob.polymarket.com";

/// Contract addresses deployed on one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractConfig {
    pub exchange: Address,
    pub neg_risk_exchange: Address,
    pub neg_risk_adapter: Address,
    pub collateral: Address,
    pub conditional_tokens: Address,
}

const POLYGON_CONTRACTS: ContractConfig = ContractConfig {
    exchange: address!("4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E"),
    neg_risk_exchange: address!("C5d563A36AE78145C45a50134d48A1215220f80a"),
    neg_risk_adapter: address!("d91E80cF2E7be2e162c6513ceD06f1dD0dA35296"),
    collateral: address!("2791Bca1f2de4661ED88A30C99A7a9449Aa84174"),
    conditional_tokens: address!("4D97DCd97eC945f40cF65F87097ACe5EA0476045"),
};

const AMOY_CONTRACTS: ContractConfig = ContractConfig {
    exchange: address!("dFE02Eb6733538f8Ea35D585af8DE5958AD99E40"),
    neg_risk_exchange: address!("C5d563A36AE78145C45a50134d48A1215220f80a"),
    neg_risk_adapter: address!("d91E80cF2E7be2e162c6513ceD06f1dD0dA35296"),
    collateral: address!("9c4e1703476e875070ee25b56a58b008cfb8fa78"),
    conditional_tokens: address!("69308FB512518e39F9b16112fA8d994F4e2Bf8bB"),
};

impl ContractConfig {
    /// Look up the contract table for a chain.
    pub fn for_chain(chain_id: u64) -> Result<&'static ContractConfig> {
        match chain_id {
            POLYGON_CHAIN_ID => Ok(&POLYGON_CONTRACTS),
            POLYGON_AMOY_CHAIN_ID => Ok(&AMOY_CONTRACTS),
            other => Err(Error::Config {
                message: format!("no contract configuration for chain {}", other),
            }),
        }
    }

    /// The exchange that verifies orders for a market.
    pub fn exchange_for(&self, neg_risk: bool) -> Address {
        if neg_risk {
            self.neg_risk_exchange
        } else {
            self.exchange
        }
    }
}

/// Client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub host: String,
    pub chain_id: u64,
    #[serde(default)]
    pub signature_type: u8,
    /// Address funding orders when it differs from the signer (proxy wallets).
    #[serde(default)]
    pub funder: Option<String>,
}

impl ClientConfig {
    /// Load configuration from `CLOB_*` environment variables (and `.env`).
    ///
    /// Recognised keys: `CLOB_HOST`, `CLOB_CHAIN_ID`, `CLOB_SIGNATURE_TYPE`,
    /// `CLOB_FUNDER`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("chain_id", POLYGON_CHAIN_ID as i64)?
            .set_default("signature_type", 0)?
            .add_source(config::Environment::with_prefix("CLOB").try_parsing(true))
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Defaults for Polygon mainnet with an EOA signer.
    pub fn polygon() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            chain_id: POLYGON_CHAIN_ID,
            signature_type: 0,
            funder: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ContractConfig::for_chain(self.chain_id)?;
        self.signature_type()?;
        self.funder_address()?;
        Ok(())
    }

    pub fn signature_type(&self) -> Result<SignatureType> {
        SignatureType::try_from(self.signature_type)
    }

    pub fn funder_address(&self) -> Result<Option<Address>> {
        self.funder
            .as_deref()
            .map(|raw| {
                raw.parse::<Address>().map_err(|e| Error::Config {
                    message: format!("invalid funder address '{}': {}", raw, e),
                })
            })
            .transpose()
    }

    pub fn contracts(&self) -> Result<&'static ContractConfig> {
        ContractConfig::for_chain(self.chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_lookup() {
        let polygon = ContractConfig::for_chain(POLYGON_CHAIN_ID).unwrap();
        assert_eq!(
            polygon.exchange,
            "0x4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E"
                .parse::<Address>()
                .unwrap()
        );
        let amoy = ContractConfig::for_chain(POLYGON_AMOY_CHAIN_ID).unwrap();
        assert_ne!(amoy.exchange, polygon.exchange);
        assert!(matches!(
            ContractConfig::for_chain(1),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_exchange_for_neg_risk() {
        let polygon = ContractConfig::for_chain(POLYGON_CHAIN_ID).unwrap();
        assert_eq!(polygon.exchange_for(false), polygon.exchange);
        assert_eq!(polygon.exchange_for(true), polygon.neg_risk_exchange);
    }

    #[test]
    fn test_client_config_validation() {
        let mut config = ClientConfig::polygon();
        assert!(config.validate().is_ok());

        config.signature_type = 9;
        assert!(config.validate().is_err());

        config.signature_type = 1;
        config.funder = Some("not-an-address".to_string());
        assert!(matches!(config.validate(), Err(Error::Config { .. })));

        config.funder = Some("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string());
        assert!(config.funder_address().unwrap().is_some());
    }
}
