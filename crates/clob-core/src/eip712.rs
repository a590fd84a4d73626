//! Schema-driven EIP-712 typed structured data hashing.
//!
//! A [`StructType`] declares the field order once; [`StructType::hash_struct`]
//! always encodes fields in that declared order no matter how the caller
//! supplies the values. Reordering a schema changes every hash computed from
//! it and invalidates signatures the exchange already holds.

use std::fmt;

use alloy_primitives::{keccak256, Address, B256, U256};

use crate::{Error, Result};

/// Solidity type of a struct member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Address,
    /// Unsigned integer of the given bit width (8..=256).
    Uint(u16),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Address => write!(f, "address"),
            FieldType::Uint(bits) => write!(f, "uint{}", bits),
        }
    }
}

/// A named struct member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldType,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldType) -> Self {
        Self { name, kind }
    }
}

/// A value to be encoded into a 32-byte EIP-712 word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Address(Address),
    Uint(U256),
}

impl Value {
    /// Parse a base-10 integer string into a uint value.
    pub fn uint_from_decimal(value: &str) -> Result<Self> {
        U256::from_str_radix(value, 10)
            .map(Value::Uint)
            .map_err(|e| Error::malformed(value, e.to_string()))
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Uint(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Uint(U256::from(value))
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Value::Address(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// A primary struct type with its ordered field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructType {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl StructType {
    /// `Name(type1 name1,type2 name2,...)` in declared order.
    pub fn encode_type(&self) -> String {
        let params: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{} {}", field.kind, field.name))
            .collect();
        format!("{}({})", self.name, params.join(","))
    }

    pub fn type_hash(&self) -> B256 {
        keccak256(self.encode_type().as_bytes())
    }

    /// `keccak256(typeHash ‖ encodeData)`.
    ///
    /// Values are matched to fields by name. Every declared field must be
    /// present and no undeclared name may appear.
    pub fn hash_struct(&self, values: &[(&str, Value)]) -> Result<B256> {
        if let Some((unknown, _)) = values
            .iter()
            .find(|(name, _)| !self.fields.iter().any(|f| f.name == *name))
        {
            return Err(Error::Signing {
                message: format!("{} has no field named '{}'", self.name, unknown),
            });
        }

        let mut encoded = Vec::with_capacity(32 * (self.fields.len() + 1));
        encoded.extend_from_slice(self.type_hash().as_slice());

        for field in self.fields {
            let (_, value) = values
                .iter()
                .find(|(name, _)| *name == field.name)
                .ok_or_else(|| Error::Signing {
                    message: format!("missing value for {}.{}", self.name, field.name),
                })?;
            let word = encode_value(field.kind, value).map_err(|e| match e {
                Error::Signing { message } => Error::Signing {
                    message: format!("{}.{}: {}", self.name, field.name, message),
                },
                other => other,
            })?;
            encoded.extend_from_slice(word.as_slice());
        }

        Ok(keccak256(&encoded))
    }
}

/// Encode one value as a 32-byte word.
///
/// - `string`: keccak256 of its UTF-8 bytes
/// - `address`: left-padded with zeros to 32 bytes
/// - `uintN`: big-endian, left-padded to 32 bytes
pub fn encode_value(kind: FieldType, value: &Value) -> Result<B256> {
    match (kind, value) {
        (FieldType::String, Value::String(s)) => Ok(keccak256(s.as_bytes())),
        (FieldType::Address, Value::Address(address)) => {
            Ok(B256::left_padding_from(address.as_slice()))
        }
        (FieldType::Uint(bits), Value::Uint(n)) => {
            if n.bit_len() > bits as usize {
                return Err(Error::Signing {
                    message: format!("{} does not fit in uint{}", n, bits),
                });
            }
            Ok(B256::from(n.to_be_bytes::<32>()))
        }
        (kind, value) => Err(Error::Signing {
            message: format!("cannot encode {:?} as {}", value, kind),
        }),
    }
}

const DOMAIN_FIELDS: &[Field] = &[
    Field::new("name", FieldType::String),
    Field::new("version", FieldType::String),
    Field::new("chainId", FieldType::Uint(256)),
];

const DOMAIN_FIELDS_WITH_CONTRACT: &[Field] = &[
    Field::new("name", FieldType::String),
    Field::new("version", FieldType::String),
    Field::new("chainId", FieldType::Uint(256)),
    Field::new("verifyingContract", FieldType::Address),
];

/// `EIP712Domain(string name,string version,uint256 chainId)`
pub const DOMAIN_TYPE: StructType = StructType {
    name: "EIP712Domain",
    fields: DOMAIN_FIELDS,
};

/// `EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)`
pub const DOMAIN_TYPE_WITH_CONTRACT: StructType = StructType {
    name: "EIP712Domain",
    fields: DOMAIN_FIELDS_WITH_CONTRACT,
};

/// EIP-712 domain. The verifying contract is optional: ClobAuth omits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Option<Address>,
}

impl Eip712Domain {
    pub fn new(name: impl Into<String>, version: impl Into<String>, chain_id: u64) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract: None,
        }
    }

    pub fn with_verifying_contract(mut self, contract: Address) -> Self {
        self.verifying_contract = Some(contract);
        self
    }

    /// Compute the EIP-712 domain separator hash.
    pub fn separator(&self) -> Result<B256> {
        let mut values = vec![
            ("name", Value::from(self.name.as_str())),
            ("version", Value::from(self.version.as_str())),
            ("chainId", Value::from(self.chain_id)),
        ];
        match self.verifying_contract {
            Some(contract) => {
                values.push(("verifyingContract", Value::Address(contract)));
                DOMAIN_TYPE_WITH_CONTRACT.hash_struct(&values)
            }
            None => DOMAIN_TYPE.hash_struct(&values),
        }
    }
}

/// `keccak256(0x19 0x01 ‖ domainSeparator ‖ structHash)`
pub fn signing_hash(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut data = Vec::with_capacity(66);
    data.extend_from_slice(&[0x19, 0x01]);
    data.extend_from_slice(domain_separator.as_slice());
    data.extend_from_slice(struct_hash.as_slice());
    keccak256(&data)
}

/// Hash `values` as `schema` under `domain`, ready for ECDSA signing.
pub fn typed_data_hash(
    domain: &Eip712Domain,
    schema: &StructType,
    values: &[(&str, Value)],
) -> Result<B256> {
    Ok(signing_hash(domain.separator()?, schema.hash_struct(values)?))
}
