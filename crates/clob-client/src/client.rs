//! Authenticated Polymarket CLOB client.
//!
//! Builds every request locally (headers, signatures, JSON bodies) and sends
//! it through an injected [`HttpTransport`]. Authentication requirements are
//! checked before anything is sent.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use clob_auth::{
    canonical_body, create_l1_headers, create_l2_headers, ApiKeyCreds, TradingWallet,
};
use clob_core::address::to_lower_hex;
use clob_core::clock::{Clock, SystemClock};
use clob_core::config::ClientConfig;
use clob_core::order::{OrderCodec, PostOrderRequest, TickSize};
use clob_core::signing::{OrderSide, SignedOrder};
use clob_core::types::{
    OrderBookSummary, OrderType, PartialCreateOrderOptions, UserMarketOrder, UserOrder,
};
use clob_core::{Error, Result};

use crate::endpoints;
use crate::facade::{book_market_price, OrderFacade};
use crate::market_data::MarketData;
use crate::transport::{ApiRequest, HttpMethod, HttpTransport, ReqwestTransport};

/// Response from posting an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostOrderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "errorMsg", default)]
    pub error_msg: String,
    /// Order ID assigned by the CLOB.
    #[serde(rename = "orderID", default)]
    pub order_id: String,
    /// Status of the order (e.g. "matched", "delayed", "unmatched").
    #[serde(default)]
    pub status: String,
    #[serde(rename = "transactionsHashes", default)]
    pub transaction_hashes: Vec<String>,
}

/// Response from any cancel endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CancelOrdersResponse {
    #[serde(default)]
    pub canceled: Vec<String>,
    /// Order id to the reason it was not cancelled.
    #[serde(default)]
    pub not_canceled: HashMap<String, String>,
}

/// One entry of a batch submission.
#[derive(Debug, Clone)]
pub struct PostOrdersArgs {
    pub order: SignedOrder,
    pub order_type: OrderType,
    pub post_only: Option<bool>,
}

impl PostOrdersArgs {
    pub fn new(order: SignedOrder, order_type: OrderType) -> Self {
        Self {
            order,
            order_type,
            post_only: None,
        }
    }
}

/// Filters for open orders and trades.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub id: Option<String>,
    pub market: Option<String>,
    pub asset_id: Option<String>,
}

impl OrderQuery {
    pub fn market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    pub fn asset_id(mut self, asset_id: impl Into<String>) -> Self {
        self.asset_id = Some(asset_id.into());
        self
    }

    fn pairs(&self) -> Vec<(String, String)> {
        [("id", &self.id), ("market", &self.market), ("asset_id", &self.asset_id)]
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetType {
    Collateral,
    Conditional,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Collateral => "COLLATERAL",
            AssetType::Conditional => "CONDITIONAL",
        }
    }
}

/// Response from the balance-allowance endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BalanceAllowance {
    /// Balance in base units (as string).
    #[serde(default)]
    pub balance: String,
    /// Allowance per spender contract, in base units.
    #[serde(default)]
    pub allowances: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastTradePrice {
    pub price: Decimal,
    /// Absent when the token has not traded.
    pub side: Option<OrderSide>,
}

/// One page of the market listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketsPage {
    #[serde(default)]
    pub data: Vec<Value>,
    /// `"LTE="` marks the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Serialize)]
struct CancelOrderBody<'a> {
    #[serde(rename = "orderID")]
    order_id: &'a str,
}

#[derive(Serialize)]
struct CancelMarketOrdersBody<'a> {
    market: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    asset_id: Option<&'a str>,
}

/// Polymarket CLOB client with L1 and L2 authentication.
pub struct ClobClient {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
    chain_id: u64,
    codec: Option<OrderCodec>,
    credentials: Option<ApiKeyCreds>,
    tick_sizes: DashMap<String, TickSize>,
    neg_risk: DashMap<String, bool>,
    fee_rates: DashMap<String, u64>,
}

impl ClobClient {
    /// Unauthenticated client: market data only.
    pub fn new(transport: Arc<dyn HttpTransport>, chain_id: u64) -> Self {
        Self {
            transport,
            clock: Arc::new(SystemClock),
            chain_id,
            codec: None,
            credentials: None,
            tick_sizes: DashMap::new(),
            neg_risk: DashMap::new(),
            fee_rates: DashMap::new(),
        }
    }

    /// Client over `reqwest` for the host and chain in `config`.
    pub fn from_config(
        config: &ClientConfig,
        wallet: Option<&TradingWallet>,
        credentials: Option<ApiKeyCreds>,
    ) -> Result<Self> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::new(config.host.clone())?);
        let mut client = Self::new(transport, config.chain_id);
        if let Some(wallet) = wallet {
            client.codec = Some(OrderCodec::from_config(wallet.order_signer(), config)?);
        }
        client.credentials = credentials;
        Ok(client)
    }

    /// Enable L1 auth and order signing.
    pub fn with_codec(mut self, codec: OrderCodec) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Enable L2 auth.
    pub fn with_credentials(mut self, credentials: ApiKeyCreds) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn set_credentials(&mut self, credentials: ApiKeyCreds) {
        self.credentials = Some(credentials);
    }

    pub fn credentials(&self) -> Option<&ApiKeyCreds> {
        self.credentials.as_ref()
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Signing wallet address, if a wallet is configured.
    pub fn address(&self) -> Option<Address> {
        self.codec.as_ref().map(|codec| codec.signer().address())
    }

    /// Drop cached tick sizes, neg-risk flags and fee rates.
    pub fn clear_market_cache(&self) {
        self.tick_sizes.clear();
        self.neg_risk.clear();
        self.fee_rates.clear();
    }

    // ------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------

    fn require_codec(&self) -> Result<&OrderCodec> {
        self.codec.as_ref().ok_or_else(|| Error::AuthenticationUnavailable {
            message: "L1 authentication not available: private key required".to_string(),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let value = self.transport.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn l1_request(&self, method: HttpMethod, path: &str, nonce: Option<u64>) -> Result<Value> {
        let signer = self.codec.as_ref().map(|codec| codec.signer());
        let headers = create_l1_headers(signer, self.chain_id, nonce, None, self.clock.as_ref())?;
        let request = ApiRequest::new(method, path).headers(headers.to_pairs());
        self.transport.send(request).await
    }

    /// Send an L2-authenticated request. The signature covers `path` and
    /// `body` but not `query`.
    async fn l2_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<String>,
    ) -> Result<Value> {
        let address = self.address().ok_or_else(|| Error::AuthenticationUnavailable {
            message: "L2 authentication not available: wallet address required".to_string(),
        })?;
        let headers = create_l2_headers(
            &to_lower_hex(&address),
            self.credentials.as_ref(),
            method.as_str(),
            path,
            body.as_deref(),
            None,
            self.clock.as_ref(),
        )?;

        let mut request = ApiRequest::new(method, path)
            .headers(headers.to_pairs())
            .body(body);
        request.query = query;
        self.transport.send(request).await
    }

    // ------------------------------------------------------------------
    // Public endpoints
    // ------------------------------------------------------------------

    /// Server Unix time in seconds.
    pub async fn server_time(&self) -> Result<u64> {
        self.send_json(ApiRequest::get(endpoints::TIME)).await
    }

    pub async fn get_tick_size(&self, token_id: &str) -> Result<TickSize> {
        if let Some(tick) = self.tick_sizes.get(token_id) {
            debug!(token_id, tick_size = %*tick, "Tick size cache hit");
            return Ok(*tick);
        }

        let response = self
            .transport
            .send(ApiRequest::get(endpoints::GET_TICK_SIZE).query("token_id", token_id))
            .await?;
        let raw = response
            .get("minimum_tick_size")
            .ok_or_else(|| Error::InvalidTickSize {
                message: format!("no minimum_tick_size for token {}", token_id),
            })?;
        let tick = TickSize::try_from(json_decimal(raw)?)?;

        self.tick_sizes.insert(token_id.to_string(), tick);
        Ok(tick)
    }

    pub async fn get_neg_risk(&self, token_id: &str) -> Result<bool> {
        if let Some(neg_risk) = self.neg_risk.get(token_id) {
            return Ok(*neg_risk);
        }

        let response = self
            .transport
            .send(ApiRequest::get(endpoints::GET_NEG_RISK).query("token_id", token_id))
            .await?;
        // A missing flag must not default: it selects the exchange orders sign against
        let neg_risk = response
            .get("neg_risk")
            .and_then(Value::as_bool)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "no neg_risk flag for token {}: {}",
                    token_id, response
                ))
            })?;

        self.neg_risk.insert(token_id.to_string(), neg_risk);
        Ok(neg_risk)
    }

    pub async fn get_fee_rate_bps(&self, token_id: &str) -> Result<u64> {
        if let Some(rate) = self.fee_rates.get(token_id) {
            return Ok(*rate);
        }

        let response = self
            .transport
            .send(ApiRequest::get(endpoints::GET_FEE_RATE).query("token_id", token_id))
            .await?;
        let rate = match response.get("fee_rate_bps").or_else(|| response.get("feeRateBps")) {
            Some(raw) => json_u64(raw)?,
            None => 0,
        };

        self.fee_rates.insert(token_id.to_string(), rate);
        Ok(rate)
    }

    /// Order book snapshot. Never cached.
    pub async fn get_order_book(&self, token_id: &str) -> Result<OrderBookSummary> {
        self.send_json(ApiRequest::get(endpoints::GET_ORDER_BOOK).query("token_id", token_id))
            .await
    }

    /// Midpoint between the best bid and ask.
    pub async fn get_midpoint(&self, token_id: &str) -> Result<Decimal> {
        let response = self
            .transport
            .send(ApiRequest::get(endpoints::GET_MIDPOINT).query("token_id", token_id))
            .await?;
        price_field(&response, "mid")
    }

    /// Best price available to an order on `side`.
    pub async fn get_price(&self, token_id: &str, side: OrderSide) -> Result<Decimal> {
        let response = self
            .transport
            .send(
                ApiRequest::get(endpoints::GET_PRICE)
                    .query("token_id", token_id)
                    .query("side", side.as_str()),
            )
            .await?;
        price_field(&response, "price")
    }

    pub async fn get_last_trade_price(&self, token_id: &str) -> Result<LastTradePrice> {
        let response = self
            .transport
            .send(ApiRequest::get(endpoints::GET_LAST_TRADE_PRICE).query("token_id", token_id))
            .await?;
        let side = match response.get("side").and_then(Value::as_str) {
            Some("BUY") => Some(OrderSide::Buy),
            Some("SELL") => Some(OrderSide::Sell),
            _ => None,
        };
        Ok(LastTradePrice {
            price: price_field(&response, "price")?,
            side,
        })
    }

    /// One page of markets; pass the previous page's cursor to continue.
    pub async fn get_markets(&self, next_cursor: Option<&str>) -> Result<MarketsPage> {
        let mut request = ApiRequest::get(endpoints::GET_MARKETS);
        if let Some(cursor) = next_cursor {
            request = request.query("next_cursor", cursor);
        }
        self.send_json(request).await
    }

    pub async fn get_market(&self, condition_id: &str) -> Result<Value> {
        if condition_id.is_empty() {
            return Err(Error::InvalidArgument("condition id is empty".to_string()));
        }
        self.transport
            .send(ApiRequest::get(format!("{}{}", endpoints::GET_MARKET, condition_id)))
            .await
    }

    // ------------------------------------------------------------------
    // API keys (L1)
    // ------------------------------------------------------------------

    pub async fn create_api_key(&mut self, nonce: Option<u64>) -> Result<ApiKeyCreds> {
        let response = self
            .l1_request(HttpMethod::Post, endpoints::CREATE_API_KEY, nonce)
            .await?;
        let credentials: ApiKeyCreds = serde_json::from_value(response)?;
        info!("Successfully created API credentials");
        self.credentials = Some(credentials.clone());
        Ok(credentials)
    }

    pub async fn derive_api_key(&mut self, nonce: Option<u64>) -> Result<ApiKeyCreds> {
        let response = self
            .l1_request(HttpMethod::Get, endpoints::DERIVE_API_KEY, nonce)
            .await?;
        let credentials: ApiKeyCreds = serde_json::from_value(response)?;
        info!("Successfully derived API credentials");
        self.credentials = Some(credentials.clone());
        Ok(credentials)
    }

    /// Derive the existing key; only create one when derivation fails.
    pub async fn create_or_derive_api_key(&mut self, nonce: Option<u64>) -> Result<ApiKeyCreds> {
        match self.derive_api_key(nonce).await {
            Ok(credentials) => Ok(credentials),
            Err(e @ Error::AuthenticationUnavailable { .. }) => Err(e),
            Err(e) => {
                warn!(error = %e, "Derive API key failed, creating a new key");
                self.create_api_key(nonce).await
            }
        }
    }

    // ------------------------------------------------------------------
    // API keys (L2)
    // ------------------------------------------------------------------

    pub async fn get_api_keys(&self) -> Result<Value> {
        self.l2_request(HttpMethod::Get, endpoints::GET_API_KEYS, Vec::new(), None)
            .await
    }

    pub async fn delete_api_key(&self) -> Result<Value> {
        self.l2_request(HttpMethod::Delete, endpoints::DELETE_API_KEY, Vec::new(), None)
            .await
    }

    // ------------------------------------------------------------------
    // Order construction
    // ------------------------------------------------------------------

    pub async fn create_order(
        &self,
        order: UserOrder,
        options: Option<PartialCreateOrderOptions>,
    ) -> Result<SignedOrder> {
        let codec = self.require_codec()?;
        OrderFacade::new(codec, self).create_order(order, options).await
    }

    pub async fn create_market_order(
        &self,
        order: UserMarketOrder,
        options: Option<PartialCreateOrderOptions>,
    ) -> Result<SignedOrder> {
        let codec = self.require_codec()?;
        OrderFacade::new(codec, self)
            .create_market_order(order, options)
            .await
    }

    /// Price a market order against the current book.
    pub async fn calculate_market_price(
        &self,
        token_id: &str,
        side: OrderSide,
        amount: Decimal,
        order_type: OrderType,
    ) -> Result<Decimal> {
        book_market_price(self, token_id, side, amount, order_type).await
    }

    // ------------------------------------------------------------------
    // Order submission and management (L2)
    // ------------------------------------------------------------------

    fn owner(&self) -> Result<&str> {
        self.credentials
            .as_ref()
            .map(|creds| creds.key.as_str())
            .ok_or_else(|| Error::AuthenticationUnavailable {
                message: "L2 authentication not available: API credentials required".to_string(),
            })
    }

    pub async fn post_order(
        &self,
        order: &SignedOrder,
        order_type: OrderType,
        defer_exec: bool,
        post_only: Option<bool>,
    ) -> Result<PostOrderResponse> {
        let payload = PostOrderRequest::new(order, self.owner()?, order_type, defer_exec, post_only)?;
        let body = canonical_body(&payload)?;

        let response = self
            .l2_request(HttpMethod::Post, endpoints::POST_ORDER, Vec::new(), Some(body))
            .await?;
        let response: PostOrderResponse = serde_json::from_value(response)?;
        info!(
            order_id = %response.order_id,
            status = %response.status,
            order_type = %order_type,
            "Order posted"
        );
        Ok(response)
    }

    /// Submit several orders in one request. Entries without their own
    /// `post_only` use `default_post_only`.
    pub async fn post_orders(
        &self,
        orders: &[PostOrdersArgs],
        defer_exec: bool,
        default_post_only: Option<bool>,
    ) -> Result<Vec<PostOrderResponse>> {
        let owner = self.owner()?;
        let payload = orders
            .iter()
            .map(|entry| {
                PostOrderRequest::new(
                    &entry.order,
                    owner,
                    entry.order_type,
                    defer_exec,
                    entry.post_only.or(default_post_only),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        let body = canonical_body(&payload)?;

        let response = self
            .l2_request(HttpMethod::Post, endpoints::POST_ORDERS, Vec::new(), Some(body))
            .await?;
        Ok(serde_json::from_value(response)?)
    }

    pub async fn create_and_post_order(
        &self,
        order: UserOrder,
        options: Option<PartialCreateOrderOptions>,
        order_type: OrderType,
        defer_exec: bool,
        post_only: Option<bool>,
    ) -> Result<PostOrderResponse> {
        // Fail before any market-data lookups when L2 is unavailable
        self.owner()?;
        let signed = self.create_order(order, options).await?;
        self.post_order(&signed, order_type, defer_exec, post_only)
            .await
    }

    /// Order type defaults to the market order's own, then FOK.
    pub async fn create_and_post_market_order(
        &self,
        order: UserMarketOrder,
        options: Option<PartialCreateOrderOptions>,
        defer_exec: bool,
    ) -> Result<PostOrderResponse> {
        self.owner()?;
        let order_type = order.order_type_or_default();
        let signed = self.create_market_order(order, options).await?;
        self.post_order(&signed, order_type, defer_exec, None).await
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<CancelOrdersResponse> {
        let body = canonical_body(&CancelOrderBody { order_id })?;
        let response = self
            .l2_request(HttpMethod::Delete, endpoints::CANCEL_ORDER, Vec::new(), Some(body))
            .await?;
        Ok(serde_json::from_value(response)?)
    }

    pub async fn cancel_orders(&self, order_ids: &[String]) -> Result<CancelOrdersResponse> {
        let body = canonical_body(order_ids)?;
        let response = self
            .l2_request(HttpMethod::Delete, endpoints::CANCEL_ORDERS, Vec::new(), Some(body))
            .await?;
        Ok(serde_json::from_value(response)?)
    }

    pub async fn cancel_all(&self) -> Result<CancelOrdersResponse> {
        let response = self
            .l2_request(HttpMethod::Delete, endpoints::CANCEL_ALL, Vec::new(), None)
            .await?;
        info!("All orders cancelled");
        Ok(serde_json::from_value(response)?)
    }

    pub async fn cancel_market_orders(
        &self,
        market: &str,
        asset_id: Option<&str>,
    ) -> Result<CancelOrdersResponse> {
        let body = canonical_body(&CancelMarketOrdersBody { market, asset_id })?;
        let response = self
            .l2_request(
                HttpMethod::Delete,
                endpoints::CANCEL_MARKET_ORDERS,
                Vec::new(),
                Some(body),
            )
            .await?;
        Ok(serde_json::from_value(response)?)
    }

    pub async fn get_open_orders(&self, query: &OrderQuery) -> Result<Value> {
        self.l2_request(HttpMethod::Get, endpoints::GET_OPEN_ORDERS, query.pairs(), None)
            .await
    }

    pub async fn get_trades(&self, query: &OrderQuery) -> Result<Value> {
        self.l2_request(HttpMethod::Get, endpoints::GET_TRADES, query.pairs(), None)
            .await
    }

    /// Balance and allowances for collateral, or for one conditional token.
    pub async fn get_balance_allowance(
        &self,
        asset_type: AssetType,
        token_id: Option<&str>,
    ) -> Result<BalanceAllowance> {
        let codec = self.require_codec()?;
        let mut query = vec![("asset_type".to_string(), asset_type.as_str().to_string())];
        if let Some(token_id) = token_id {
            query.push(("token_id".to_string(), token_id.to_string()));
        }
        query.push((
            "signature_type".to_string(),
            codec.signature_type().as_u8().to_string(),
        ));

        let response = self
            .l2_request(HttpMethod::Get, endpoints::GET_BALANCE_ALLOWANCE, query, None)
            .await?;
        Ok(serde_json::from_value(response)?)
    }
}

#[async_trait]
impl MarketData for ClobClient {
    async fn tick_size(&self, token_id: &str) -> Result<TickSize> {
        self.get_tick_size(token_id).await
    }

    async fn neg_risk(&self, token_id: &str) -> Result<bool> {
        self.get_neg_risk(token_id).await
    }

    async fn fee_rate_bps(&self, token_id: &str) -> Result<u64> {
        self.get_fee_rate_bps(token_id).await
    }

    async fn order_book(&self, token_id: &str) -> Result<OrderBookSummary> {
        self.get_order_book(token_id).await
    }
}

impl std::fmt::Debug for ClobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClobClient")
            .field("chain_id", &self.chain_id)
            .field("address", &self.address())
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

/// A decimal sent either as a JSON number or a string.
fn json_decimal(value: &Value) -> Result<Decimal> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => return Err(Error::malformed(other.to_string(), "expected a decimal")),
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|e| Error::malformed(raw, e.to_string()))
}

fn price_field(response: &Value, field: &str) -> Result<Decimal> {
    let raw = response
        .get(field)
        .ok_or_else(|| Error::malformed(response.to_string(), format!("missing {}", field)))?;
    json_decimal(raw)
}

fn json_u64(value: &Value) -> Result<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| Error::malformed(n.to_string(), "expected a non-negative integer")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| Error::malformed(s.as_str(), "expected a non-negative integer")),
        other => Err(Error::malformed(other.to_string(), "expected an integer")),
    }
}
