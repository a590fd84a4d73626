//! Builds signed exchange orders from user intents.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

use super::amounts::{limit_order_amounts, market_order_amounts, RawAmounts};
use crate::address::ZERO_ADDRESS;
use crate::config::{ClientConfig, ContractConfig, COLLATERAL_TOKEN_DECIMALS};
use crate::decimal::to_integer_string;
use crate::signing::{exchange_domain, OrderData, OrderSigner, SignatureType, SignedOrder};
use crate::types::{CreateOrderOptions, OrderIntent, UserMarketOrder, UserOrder};
use crate::{Error, Result};

/// Source of order salts.
pub trait SaltGenerator: Send + Sync {
    /// A value in `[0, 2^32)`.
    fn next_salt(&self) -> u64;
}

/// Salts drawn from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSalt;

impl SaltGenerator for RandomSalt {
    fn next_salt(&self) -> u64 {
        u64::from(rand::rng().random::<u32>())
    }
}

/// Always returns the same salt.
#[derive(Debug, Clone, Copy)]
pub struct FixedSalt(pub u32);

impl SaltGenerator for FixedSalt {
    fn next_salt(&self) -> u64 {
        u64::from(self.0)
    }
}

/// Turns [`OrderIntent`]s into signed orders for one signing key.
#[derive(Clone)]
pub struct OrderCodec {
    signer: OrderSigner,
    funder: Address,
    signature_type: SignatureType,
    chain_id: u64,
    contracts: &'static ContractConfig,
    salt: Arc<dyn SaltGenerator>,
}

impl OrderCodec {
    /// EOA codec where the signer also funds its orders.
    pub fn new(signer: OrderSigner, chain_id: u64) -> Result<Self> {
        let contracts = ContractConfig::for_chain(chain_id)?;
        Ok(Self {
            funder: signer.address(),
            signer,
            signature_type: SignatureType::Eoa,
            chain_id,
            contracts,
            salt: Arc::new(RandomSalt),
        })
    }

    /// Codec for the chain, signature type and funder named in `config`.
    pub fn from_config(signer: OrderSigner, config: &ClientConfig) -> Result<Self> {
        let mut codec = Self::new(signer, config.chain_id)?.with_signature_type(config.signature_type()?);
        if let Some(funder) = config.funder_address()? {
            codec = codec.with_funder(funder);
        }
        Ok(codec)
    }

    /// Orders are drawn from `funder` (a proxy wallet) rather than the signer.
    pub fn with_funder(mut self, funder: Address) -> Self {
        self.funder = funder;
        self
    }

    pub fn with_signature_type(mut self, signature_type: SignatureType) -> Self {
        self.signature_type = signature_type;
        self
    }

    pub fn with_salt_generator(mut self, salt: Arc<dyn SaltGenerator>) -> Self {
        self.salt = salt;
        self
    }

    pub fn signer(&self) -> &OrderSigner {
        &self.signer
    }

    pub fn funder(&self) -> Address {
        self.funder
    }

    pub fn signature_type(&self) -> SignatureType {
        self.signature_type
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn contracts(&self) -> &'static ContractConfig {
        self.contracts
    }

    /// Compute amounts, assemble the order and sign it against the exchange
    /// selected by `options.neg_risk`.
    pub fn build(&self, intent: &OrderIntent, options: &CreateOrderOptions) -> Result<SignedOrder> {
        let order = match intent {
            OrderIntent::Limit(order) => self.limit_order_data(order, options)?,
            OrderIntent::Market(order) => self.market_order_data(order, options)?,
        };

        let exchange = self.contracts.exchange_for(options.neg_risk);
        let signed = self
            .signer
            .sign_order(&order, &exchange_domain(self.chain_id, exchange))?;

        info!(
            token_id = %order.token_id,
            side = %order.side,
            maker_amount = %order.maker_amount,
            taker_amount = %order.taker_amount,
            tick_size = %options.tick_size,
            neg_risk = options.neg_risk,
            "Built signed order"
        );
        Ok(signed)
    }

    fn limit_order_data(&self, order: &UserOrder, options: &CreateOrderOptions) -> Result<OrderData> {
        let amounts = limit_order_amounts(
            order.side,
            order.size,
            order.price,
            options.tick_size.round_config(),
        )?;
        self.order_data(
            &order.token_id,
            amounts,
            order.taker,
            order.fee_rate_bps,
            order.nonce,
            order.expiration.unwrap_or(0),
        )
    }

    fn market_order_data(
        &self,
        order: &UserMarketOrder,
        options: &CreateOrderOptions,
    ) -> Result<OrderData> {
        let price = order.price.ok_or_else(|| {
            Error::InvalidArgument("market order price must be resolved before encoding".to_string())
        })?;
        let amounts = market_order_amounts(
            order.side,
            order.amount,
            price,
            options.tick_size.round_config(),
        )?;
        self.order_data(
            &order.token_id,
            amounts,
            order.taker,
            order.fee_rate_bps,
            order.nonce,
            0,
        )
    }

    fn order_data(
        &self,
        token_id: &str,
        amounts: RawAmounts,
        taker: Option<Address>,
        fee_rate_bps: Option<u64>,
        nonce: Option<u64>,
        expiration: u64,
    ) -> Result<OrderData> {
        Ok(OrderData {
            salt: self.salt.next_salt(),
            maker: self.funder,
            signer: self.signer.address(),
            taker: taker.unwrap_or(ZERO_ADDRESS),
            token_id: parse_token_id(token_id)?,
            maker_amount: to_token_units(amounts.maker)?,
            taker_amount: to_token_units(amounts.taker)?,
            expiration: U256::from(expiration),
            nonce: U256::from(nonce.unwrap_or(0)),
            fee_rate_bps: U256::from(fee_rate_bps.unwrap_or(0)),
            side: amounts.side,
            signature_type: self.signature_type,
        })
    }
}

impl std::fmt::Debug for OrderCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderCodec")
            .field("signer", &self.signer)
            .field("funder", &self.funder)
            .field("signature_type", &self.signature_type)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

/// Parse a decimal ERC-1155 token id.
pub fn parse_token_id(token_id: &str) -> Result<U256> {
    U256::from_str_radix(token_id.trim(), 10)
        .map_err(|e| Error::malformed(token_id, format!("invalid token id: {}", e)))
}

/// Scale a decimal amount to integer collateral units.
fn to_token_units(amount: Decimal) -> Result<U256> {
    let units = to_integer_string(&amount.to_string(), COLLATERAL_TOKEN_DECIMALS)?;
    U256::from_str_radix(&units, 10).map_err(|e| Error::malformed(units, e.to_string()))
}
