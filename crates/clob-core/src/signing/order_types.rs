//! Order types for Polymarket CLOB signing.
//!
//! Defines the order struct hashed under EIP-712 and the JSON shape the CLOB
//! API accepts for a signed order.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use super::domain::{OrderSide, SignatureType};
use crate::address::to_lower_hex;
use crate::eip712::{Field, FieldType, StructType, Value};
use crate::Result;

const ORDER_FIELDS: &[Field] = &[
    Field::new("salt", FieldType::Uint(256)),
    Field::new("maker", FieldType::Address),
    Field::new("signer", FieldType::Address),
    Field::new("taker", FieldType::Address),
    Field::new("tokenId", FieldType::Uint(256)),
    Field::new("makerAmount", FieldType::Uint(256)),
    Field::new("takerAmount", FieldType::Uint(256)),
    Field::new("expiration", FieldType::Uint(256)),
    Field::new("nonce", FieldType::Uint(256)),
    Field::new("feeRateBps", FieldType::Uint(256)),
    Field::new("side", FieldType::Uint(8)),
    Field::new("signatureType", FieldType::Uint(8)),
];

/// The CTF Exchange `Order` struct.
pub const ORDER_TYPE: StructType = StructType {
    name: "Order",
    fields: ORDER_FIELDS,
};

/// Raw order data for EIP-712 signing.
///
/// This matches the struct used by the CTF Exchange contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderData {
    /// Random salt for uniqueness, in `[0, 2^32)`.
    pub salt: u64,
    /// Address whose funds back the order (the funder).
    pub maker: Address,
    /// Address of the signing key.
    pub signer: Address,
    /// Taker address (zero for any taker).
    pub taker: Address,
    /// ERC-1155 id of the outcome being traded.
    pub token_id: U256,
    /// Maker amount in base units.
    pub maker_amount: U256,
    /// Taker amount in base units.
    pub taker_amount: U256,
    /// Order expiration timestamp (unix seconds, 0 for none).
    pub expiration: U256,
    pub nonce: U256,
    pub fee_rate_bps: U256,
    pub side: OrderSide,
    pub signature_type: SignatureType,
}

impl OrderData {
    /// Field values keyed by their `Order` member names.
    pub fn typed_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("salt", Value::from(self.salt)),
            ("maker", Value::from(self.maker)),
            ("signer", Value::from(self.signer)),
            ("taker", Value::from(self.taker)),
            ("tokenId", Value::from(self.token_id)),
            ("makerAmount", Value::from(self.maker_amount)),
            ("takerAmount", Value::from(self.taker_amount)),
            ("expiration", Value::from(self.expiration)),
            ("nonce", Value::from(self.nonce)),
            ("feeRateBps", Value::from(self.fee_rate_bps)),
            ("side", Value::from(self.side.as_u8())),
            ("signatureType", Value::from(self.signature_type.as_u8())),
        ]
    }

    /// Compute the EIP-712 struct hash for this order.
    pub fn struct_hash(&self) -> Result<B256> {
        ORDER_TYPE.hash_struct(&self.typed_values())
    }
}

/// An order together with its 65-byte `r‖s‖v` signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedOrder {
    pub order: OrderData,
    /// `0x`-prefixed hex signature.
    pub signature: String,
}

impl SignedOrder {
    pub fn new(order: OrderData, signature: String) -> Self {
        Self { order, signature }
    }

    /// Render the order in the JSON shape the CLOB API expects.
    pub fn to_wire(&self) -> WireOrder {
        let order = &self.order;
        WireOrder {
            salt: order.salt,
            maker: to_lower_hex(&order.maker),
            signer: to_lower_hex(&order.signer),
            taker: to_lower_hex(&order.taker),
            token_id: order.token_id.to_string(),
            maker_amount: order.maker_amount.to_string(),
            taker_amount: order.taker_amount.to_string(),
            side: order.side,
            expiration: order.expiration.to_string(),
            nonce: order.nonce.to_string(),
            fee_rate_bps: order.fee_rate_bps.to_string(),
            signature_type: order.signature_type.as_u8(),
            signature: self.signature.clone(),
        }
    }
}

/// A signed order as submitted to the CLOB API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireOrder {
    /// Order salt (must be a JSON number).
    pub salt: u64,
    pub maker: String,
    pub signer: String,
    pub taker: String,
    #[serde(rename = "tokenId")]
    pub token_id: String,
    #[serde(rename = "makerAmount")]
    pub maker_amount: String,
    #[serde(rename = "takerAmount")]
    pub taker_amount: String,
    /// Side ("BUY" or "SELL").
    pub side: OrderSide,
    pub expiration: String,
    pub nonce: String,
    #[serde(rename = "feeRateBps")]
    pub fee_rate_bps: String,
    #[serde(rename = "signatureType")]
    pub signature_type: u8,
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maker() -> Address {
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
    }

    fn sample_order() -> OrderData {
        OrderData {
            salt: 999,
            maker: maker(),
            signer: maker(),
            taker: Address::ZERO,
            token_id: U256::from(123u64),
            maker_amount: U256::from(50_000_000u64),
            taker_amount: U256::from(100_000_000u64),
            expiration: U256::ZERO,
            nonce: U256::ZERO,
            fee_rate_bps: U256::ZERO,
            side: OrderSide::Buy,
            signature_type: SignatureType::Eoa,
        }
    }

    #[test]
    fn test_order_type_string() {
        assert_eq!(
            ORDER_TYPE.encode_type(),
            "Order(uint256 salt,address maker,address signer,address taker,uint256 tokenId,uint256 makerAmount,uint256 takerAmount,uint256 expiration,uint256 nonce,uint256 feeRateBps,uint8 side,uint8 signatureType)"
        );
    }

    #[test]
    fn test_struct_hash_is_stable() {
        let order = sample_order();
        assert_eq!(order.struct_hash().unwrap(), order.clone().struct_hash().unwrap());
        assert_ne!(order.struct_hash().unwrap(), B256::ZERO);
    }

    #[test]
    fn test_every_field_changes_hash() {
        let base = sample_order().struct_hash().unwrap();
        let mutations: Vec<Box<dyn Fn(&mut OrderData)>> = vec![
            Box::new(|o| o.salt += 1),
            Box::new(|o| o.maker = Address::repeat_byte(1)),
            Box::new(|o| o.signer = Address::repeat_byte(2)),
            Box::new(|o| o.taker = Address::repeat_byte(3)),
            Box::new(|o| o.token_id += U256::from(1u64)),
            Box::new(|o| o.maker_amount += U256::from(1u64)),
            Box::new(|o| o.taker_amount += U256::from(1u64)),
            Box::new(|o| o.expiration = U256::from(1u64)),
            Box::new(|o| o.nonce = U256::from(1u64)),
            Box::new(|o| o.fee_rate_bps = U256::from(1u64)),
            Box::new(|o| o.side = OrderSide::Sell),
            Box::new(|o| o.signature_type = SignatureType::PolyGnosisSafe),
        ];
        for mutate in mutations {
            let mut order = sample_order();
            mutate(&mut order);
            assert_ne!(order.struct_hash().unwrap(), base);
        }
    }

    #[test]
    fn test_wire_order_serialization() {
        let signed = SignedOrder::new(sample_order(), "0xsignature".to_string());
        let json = serde_json::to_value(signed.to_wire()).unwrap();

        assert_eq!(json["salt"], 999);
        assert_eq!(json["maker"], "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
        assert_eq!(json["taker"], "0x0000000000000000000000000000000000000000");
        assert_eq!(json["tokenId"], "123");
        assert_eq!(json["makerAmount"], "50000000");
        assert_eq!(json["takerAmount"], "100000000");
        assert_eq!(json["side"], "BUY");
        assert_eq!(json["expiration"], "0");
        assert_eq!(json["signatureType"], 0);
        assert_eq!(json["signature"], "0xsignature");
    }
}
