//! L1 authentication: an EIP-712 `ClobAuth` signature proving control of
//! the wallet.

use tracing::debug;

use clob_core::address::to_lower_hex;
use clob_core::clock::Clock;
use clob_core::eip712::{Field, FieldType, StructType, Value};
use clob_core::signing::{clob_auth_domain, OrderSigner};
use clob_core::{Error, Result};

use crate::headers::L1Headers;

/// Fixed attestation text signed in every ClobAuth message.
pub const CLOB_AUTH_MESSAGE: &str = "This message attests that I control the given wallet";

const CLOB_AUTH_FIELDS: &[Field] = &[
    Field::new("address", FieldType::Address),
    Field::new("timestamp", FieldType::String),
    Field::new("nonce", FieldType::Uint(256)),
    Field::new("message", FieldType::String),
];

/// `ClobAuth(address address,string timestamp,uint256 nonce,string message)`
pub const CLOB_AUTH_TYPE: StructType = StructType {
    name: "ClobAuth",
    fields: CLOB_AUTH_FIELDS,
};

/// Sign a ClobAuth message for `chain_id`.
///
/// The timestamp is hashed as its decimal string, not as an integer.
pub fn build_clob_auth_signature(
    signer: &OrderSigner,
    chain_id: u64,
    timestamp: u64,
    nonce: u64,
) -> Result<String> {
    let values = [
        ("address", Value::from(signer.address())),
        ("timestamp", Value::from(timestamp.to_string())),
        ("nonce", Value::from(nonce)),
        ("message", Value::from(CLOB_AUTH_MESSAGE)),
    ];
    signer.sign_typed_data(&clob_auth_domain(chain_id), &CLOB_AUTH_TYPE, &values)
}

/// Build L1 headers. Nonce defaults to 0 and the timestamp to `clock`.
pub fn create_l1_headers(
    signer: Option<&OrderSigner>,
    chain_id: u64,
    nonce: Option<u64>,
    timestamp: Option<u64>,
    clock: &dyn Clock,
) -> Result<L1Headers> {
    let signer = signer.ok_or_else(|| Error::AuthenticationUnavailable {
        message: "L1 authentication not available: private key required".to_string(),
    })?;
    let timestamp = timestamp.unwrap_or_else(|| clock.now_secs());
    let nonce = nonce.unwrap_or(0);

    let signature = build_clob_auth_signature(signer, chain_id, timestamp, nonce)?;
    debug!(chain_id, timestamp, nonce, "Created L1 headers");

    Ok(L1Headers {
        address: to_lower_hex(&signer.address()),
        signature,
        timestamp: timestamp.to_string(),
        nonce: nonce.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{keccak256, Address};
    use alloy_signer::Signature;
    use clob_core::clock::FixedClock;
    use clob_core::config::{POLYGON_AMOY_CHAIN_ID, POLYGON_CHAIN_ID};
    use clob_core::eip712::typed_data_hash;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn signer() -> OrderSigner {
        OrderSigner::from_private_key(TEST_PRIVATE_KEY).unwrap()
    }

    fn recover(signature: &str, chain_id: u64, timestamp: u64, nonce: u64, address: Address) -> Address {
        let raw = hex::decode(&signature[2..]).unwrap();
        let signature = Signature::try_from(raw.as_slice()).unwrap();
        let digest = typed_data_hash(
            &clob_auth_domain(chain_id),
            &CLOB_AUTH_TYPE,
            &[
                ("address", Value::from(address)),
                ("timestamp", Value::from(timestamp.to_string())),
                ("nonce", Value::from(nonce)),
                ("message", Value::from(CLOB_AUTH_MESSAGE)),
            ],
        )
        .unwrap();
        signature.recover_address_from_prehash(&digest).unwrap()
    }

    #[test]
    fn test_clob_auth_type_hash() {
        assert_eq!(
            CLOB_AUTH_TYPE.type_hash(),
            keccak256(b"ClobAuth(address address,string timestamp,uint256 nonce,string message)")
        );
    }

    #[test]
    fn test_signature_recovers_wallet() {
        let signer = signer();
        let signature =
            build_clob_auth_signature(&signer, POLYGON_AMOY_CHAIN_ID, 10_000_000, 23).unwrap();
        assert_eq!(signature.len(), 132);
        assert_eq!(
            recover(&signature, POLYGON_AMOY_CHAIN_ID, 10_000_000, 23, signer.address()),
            signer.address()
        );
    }

    alloy_sol_types::sol! {
        struct ClobAuth {
            address address;
            string timestamp;
            uint256 nonce;
            string message;
        }
    }

    #[test]
    fn test_digest_matches_reference_encoder() {
        use alloy_primitives::U256;
        use alloy_sol_types::SolStruct;

        let signer = signer();
        let reference = ClobAuth {
            address: signer.address(),
            timestamp: "10000000".to_string(),
            nonce: U256::from(23u64),
            message: CLOB_AUTH_MESSAGE.to_string(),
        }
        .eip712_signing_hash(&alloy_sol_types::eip712_domain! {
            name: "ClobAuthDomain",
            version: "1",
            chain_id: POLYGON_AMOY_CHAIN_ID,
        });

        let ours = typed_data_hash(
            &clob_auth_domain(POLYGON_AMOY_CHAIN_ID),
            &CLOB_AUTH_TYPE,
            &[
                ("address", Value::from(signer.address())),
                ("timestamp", Value::from("10000000".to_string())),
                ("nonce", Value::from(23u64)),
                ("message", Value::from(CLOB_AUTH_MESSAGE)),
            ],
        )
        .unwrap();
        assert_eq!(ours, reference);

        let signature =
            build_clob_auth_signature(&signer, POLYGON_AMOY_CHAIN_ID, 10_000_000, 23).unwrap();
        let raw = hex::decode(&signature[2..]).unwrap();
        let signature = Signature::try_from(raw.as_slice()).unwrap();
        assert_eq!(
            signature.recover_address_from_prehash(&reference).unwrap(),
            signer.address()
        );
    }

    #[test]
    fn test_signature_depends_on_inputs() {
        let signer = signer();
        let base = build_clob_auth_signature(&signer, POLYGON_CHAIN_ID, 1_700_000_000, 0).unwrap();
        assert_eq!(
            base,
            build_clob_auth_signature(&signer, POLYGON_CHAIN_ID, 1_700_000_000, 0).unwrap()
        );
        assert_ne!(
            base,
            build_clob_auth_signature(&signer, POLYGON_CHAIN_ID, 1_700_000_001, 0).unwrap()
        );
        assert_ne!(
            base,
            build_clob_auth_signature(&signer, POLYGON_CHAIN_ID, 1_700_000_000, 1).unwrap()
        );
        assert_ne!(
            base,
            build_clob_auth_signature(&signer, POLYGON_AMOY_CHAIN_ID, 1_700_000_000, 0).unwrap()
        );
    }

    #[test]
    fn test_l1_headers_defaults() {
        let signer = signer();
        let headers =
            create_l1_headers(Some(&signer), POLYGON_CHAIN_ID, None, None, &FixedClock(1_700_000_000))
                .unwrap();

        assert_eq!(headers.address, "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
        assert_eq!(headers.timestamp, "1700000000");
        assert_eq!(headers.nonce, "0");
        assert_eq!(
            headers.signature,
            build_clob_auth_signature(&signer, POLYGON_CHAIN_ID, 1_700_000_000, 0).unwrap()
        );
        let names: Vec<&str> = headers.to_pairs().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["POLY_ADDRESS", "POLY_SIGNATURE", "POLY_TIMESTAMP", "POLY_NONCE"]);
    }

    #[test]
    fn test_l1_headers_explicit_values() {
        let headers = create_l1_headers(
            Some(&signer()),
            POLYGON_CHAIN_ID,
            Some(5),
            Some(1_600_000_000),
            &FixedClock(1_700_000_000),
        )
        .unwrap();
        assert_eq!(headers.timestamp, "1600000000");
        assert_eq!(headers.nonce, "5");
    }

    #[test]
    fn test_l1_headers_require_wallet() {
        assert!(matches!(
            create_l1_headers(None, POLYGON_CHAIN_ID, None, None, &FixedClock(0)),
            Err(Error::AuthenticationUnavailable { .. })
        ));
    }
}
