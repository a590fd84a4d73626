//! ECDSA signing of EIP-712 digests.
//!
//! Every signature leaves as `0x` + r (32 bytes) + s (32 bytes) + v (1 byte),
//! with v in {27, 28}.

use std::str::FromStr;

use alloy_primitives::{Address, B256};
use alloy_signer::{Signature, SignerSync};
use alloy_signer_local::PrivateKeySigner;
use tracing::debug;

use super::order_types::{OrderData, SignedOrder, ORDER_TYPE};
use crate::eip712::{signing_hash, typed_data_hash, Eip712Domain, StructType, Value};
use crate::{Error, Result};

/// Signs orders and authentication messages with one private key.
#[derive(Clone)]
pub struct OrderSigner {
    signer: PrivateKeySigner,
}

impl OrderSigner {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    /// Load from a hex private key, with or without `0x`.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        if key.is_empty() {
            return Err(Error::AuthenticationUnavailable {
                message: "private key is empty".to_string(),
            });
        }
        let signer = PrivateKeySigner::from_str(key).map_err(|e| Error::Signing {
            message: format!("invalid private key: {}", e),
        })?;
        Ok(Self::new(signer))
    }

    /// Get the signer's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a 32-byte digest.
    pub fn sign_hash(&self, digest: B256) -> Result<String> {
        let signature = self
            .signer
            .sign_hash_sync(&digest)
            .map_err(|e| Error::Signing {
                message: e.to_string(),
            })?;
        Ok(signature_to_hex(&signature))
    }

    /// Hash `values` as `schema` under `domain` and sign the result.
    pub fn sign_typed_data(
        &self,
        domain: &Eip712Domain,
        schema: &StructType,
        values: &[(&str, Value)],
    ) -> Result<String> {
        self.sign_hash(typed_data_hash(domain, schema, values)?)
    }

    /// Sign an order against an exchange domain.
    pub fn sign_order(&self, order: &OrderData, domain: &Eip712Domain) -> Result<SignedOrder> {
        let digest = signing_hash(domain.separator()?, order.struct_hash()?);
        debug!(
            schema = ORDER_TYPE.name,
            chain_id = domain.chain_id,
            salt = order.salt,
            "Signing order"
        );
        let signature = self.sign_hash(digest)?;
        Ok(SignedOrder::new(order.clone(), signature))
    }
}

/// `0x` ‖ r ‖ s ‖ v, v = 27 + y-parity.
fn signature_to_hex(signature: &Signature) -> String {
    let mut bytes = [0u8; 65];
    bytes[..32].copy_from_slice(&signature.r().to_be_bytes::<32>());
    bytes[32..64].copy_from_slice(&signature.s().to_be_bytes::<32>());
    bytes[64] = 27 + u8::from(signature.v());
    format!("0x{}", hex::encode(bytes))
}

impl std::fmt::Debug for OrderSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderSigner")
            .field("address", &format!("{:?}", self.address()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    use crate::config::{ContractConfig, POLYGON_CHAIN_ID};
    use crate::signing::domain::{exchange_domain, OrderSide, SignatureType};

    // Test private key (DO NOT USE IN PRODUCTION)
    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn test_signer() -> OrderSigner {
        OrderSigner::from_private_key(TEST_PRIVATE_KEY).unwrap()
    }

    fn test_order(signer: &OrderSigner) -> OrderData {
        OrderData {
            salt: 999,
            maker: signer.address(),
            signer: signer.address(),
            taker: Address::ZERO,
            token_id: U256::from(123u64),
            maker_amount: U256::from(100u64),
            taker_amount: U256::from(200u64),
            expiration: U256::ZERO,
            nonce: U256::ZERO,
            fee_rate_bps: U256::ZERO,
            side: OrderSide::Buy,
            signature_type: SignatureType::Eoa,
        }
    }

    fn polygon_domain() -> Eip712Domain {
        let contracts = ContractConfig::for_chain(POLYGON_CHAIN_ID).unwrap();
        exchange_domain(POLYGON_CHAIN_ID, contracts.exchange)
    }

    #[test]
    fn test_order_signer_creation() {
        let signer = test_signer();
        assert_eq!(signer.address(), TEST_ADDRESS.parse::<Address>().unwrap());

        let prefixed = OrderSigner::from_private_key(&format!("0x{}", TEST_PRIVATE_KEY)).unwrap();
        assert_eq!(prefixed.address(), signer.address());
    }

    #[test]
    fn test_rejects_bad_keys() {
        assert!(matches!(
            OrderSigner::from_private_key(""),
            Err(Error::AuthenticationUnavailable { .. })
        ));
        assert!(matches!(
            OrderSigner::from_private_key("0xnothex"),
            Err(Error::Signing { .. })
        ));
    }

    #[test]
    fn test_sign_order_format() {
        let signer = test_signer();
        let signed = signer
            .sign_order(&test_order(&signer), &polygon_domain())
            .unwrap();

        // 0x + 130 hex chars (65 bytes)
        assert!(signed.signature.starts_with("0x"));
        assert_eq!(signed.signature.len(), 132);
        let v = &signed.signature[130..];
        assert!(v == "1b" || v == "1c", "unexpected v byte {}", v);
    }

    #[test]
    fn test_signatures_are_deterministic() {
        let signer = test_signer();
        let order = test_order(&signer);

        let first = signer.sign_order(&order, &polygon_domain()).unwrap();
        let second = signer.sign_order(&order.clone(), &polygon_domain()).unwrap();
        assert_eq!(first.signature, second.signature);
    }

    #[test]
    fn test_signature_recovers_signer() {
        let signer = test_signer();
        let order = test_order(&signer);
        let domain = polygon_domain();
        let signed = signer.sign_order(&order, &domain).unwrap();

        let raw = hex::decode(&signed.signature[2..]).unwrap();
        let signature = Signature::try_from(raw.as_slice()).unwrap();
        let digest = signing_hash(domain.separator().unwrap(), order.struct_hash().unwrap());
        assert_eq!(
            signature.recover_address_from_prehash(&digest).unwrap(),
            signer.address()
        );
    }

    #[test]
    fn test_domain_changes_signature() {
        let signer = test_signer();
        let order = test_order(&signer);
        let contracts = ContractConfig::for_chain(POLYGON_CHAIN_ID).unwrap();

        let standard = signer.sign_order(&order, &polygon_domain()).unwrap();
        let neg_risk = signer
            .sign_order(
                &order,
                &exchange_domain(POLYGON_CHAIN_ID, contracts.neg_risk_exchange),
            )
            .unwrap();
        assert_ne!(standard.signature, neg_risk.signature);
    }

    alloy_sol_types::sol! {
        struct Order {
            uint256 salt;
            address maker;
            address signer;
            address taker;
            uint256 tokenId;
            uint256 makerAmount;
            uint256 takerAmount;
            uint256 expiration;
            uint256 nonce;
            uint256 feeRateBps;
            uint8 side;
            uint8 signatureType;
        }
    }

    #[test]
    fn test_order_digest_matches_reference_encoder() {
        use alloy_sol_types::SolStruct;

        let signer = test_signer();
        let order = OrderData {
            salt: 12345,
            maker: Address::repeat_byte(0x77),
            signer: signer.address(),
            taker: Address::ZERO,
            token_id: U256::from(1234u64),
            maker_amount: U256::from(10_000_000u64),
            taker_amount: U256::from(5_000_000u64),
            expiration: U256::from(1_900_000_000u64),
            nonce: U256::from(7u64),
            fee_rate_bps: U256::from(100u64),
            side: OrderSide::Sell,
            signature_type: SignatureType::PolyGnosisSafe,
        };
        let reference = Order {
            salt: U256::from(order.salt),
            maker: order.maker,
            signer: order.signer,
            taker: order.taker,
            tokenId: order.token_id,
            makerAmount: order.maker_amount,
            takerAmount: order.taker_amount,
            expiration: order.expiration,
            nonce: order.nonce,
            feeRateBps: order.fee_rate_bps,
            side: order.side.as_u8(),
            signatureType: order.signature_type.as_u8(),
        };

        let contracts = ContractConfig::for_chain(POLYGON_CHAIN_ID).unwrap();
        for exchange in [contracts.exchange, contracts.neg_risk_exchange] {
            let expected = reference.eip712_signing_hash(&alloy_sol_types::eip712_domain! {
                name: "Polymarket CTF Exchange",
                version: "1",
                chain_id: POLYGON_CHAIN_ID,
                verifying_contract: exchange,
            });
            let domain = exchange_domain(POLYGON_CHAIN_ID, exchange);
            let digest = signing_hash(domain.separator().unwrap(), order.struct_hash().unwrap());
            assert_eq!(digest, expected);

            let signed = signer.sign_order(&order, &domain).unwrap();
            let raw = hex::decode(&signed.signature[2..]).unwrap();
            let signature = Signature::try_from(raw.as_slice()).unwrap();
            assert_eq!(
                signature.recover_address_from_prehash(&expected).unwrap(),
                signer.address()
            );
        }
    }

    #[test]
    fn test_debug_does_not_expose_key() {
        let signer = test_signer();
        let debug_str = format!("{:?}", signer);

        assert!(debug_str.contains("OrderSigner"));
        assert!(debug_str.contains("address"));
        assert!(!debug_str.contains(TEST_PRIVATE_KEY));
    }
}
