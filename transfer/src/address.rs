//! # Account Addresses
//!
//! Accounts on the host chain are identified by a 20-byte identifier. Users
//! and applications see it Bech32-encoded under the chain prefix:
//!
//! ```text
//! bytes (20)  -> Bech32("nova", bytes) -> nova1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5...
//! ```
//!
//! Module accounts have no key pair. Their address is derived from the
//! module name alone, `SHA-256(name)[..20]`, so every node computes the same
//! address for `"mint"` or `"distribution"` without any lookup.

use std::fmt;

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::ADDRESS_LENGTH;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while decoding or encoding an account address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The address string was empty.
    #[error("empty address string is not allowed")]
    Empty,

    /// The string is not valid Bech32 (bad charset, checksum, or layout).
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The address could not be Bech32-encoded.
    #[error("bech32 encode error: {0}")]
    Bech32Encode(String),

    /// The configured prefix is not a valid human-readable part.
    #[error("invalid bech32 prefix '{0}'")]
    InvalidHrp(String),

    /// The address carries a different human-readable prefix.
    #[error("invalid bech32 prefix: expected '{expected}', got '{got}'")]
    InvalidPrefix {
        /// The prefix this chain uses.
        expected: String,
        /// The prefix found in the string.
        got: String,
    },

    /// The decoded payload is not an account identifier.
    #[error("invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// AccountAddress
// ---------------------------------------------------------------------------

/// A decoded 20-byte account identifier.
///
/// Equality, hashing and ordering are over the raw bytes; the prefix is a
/// property of the encoding, not of the account.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress([u8; ADDRESS_LENGTH]);

impl AccountAddress {
    /// Wraps raw identifier bytes.
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Builds an address from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let arr: [u8; ADDRESS_LENGTH] =
            bytes.try_into().map_err(|_| AddressError::InvalidLength {
                expected: ADDRESS_LENGTH,
                got: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Derives the address of a module account from its name.
    pub fn module(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest[..ADDRESS_LENGTH]);
        Self(bytes)
    }

    /// Decodes a Bech32 address string, requiring the given prefix.
    ///
    /// Rejects empty input, bad checksums, a foreign prefix, and payloads
    /// that are not exactly [`ADDRESS_LENGTH`] bytes.
    pub fn from_bech32(s: &str, prefix: &str) -> Result<Self, AddressError> {
        let hrp = Hrp::parse(prefix).map_err(|_| AddressError::InvalidHrp(prefix.to_string()))?;
        decode_with_hrp(s, hrp)
    }

    /// Encodes this address under the given prefix.
    pub fn to_bech32(&self, prefix: &str) -> Result<String, AddressError> {
        let hrp = Hrp::parse(prefix).map_err(|_| AddressError::InvalidHrp(prefix.to_string()))?;
        encode_with_hrp(self, hrp)
    }

    /// Returns the raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Returns the hex-encoded identifier.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

fn decode_with_hrp(s: &str, expected: Hrp) -> Result<AccountAddress, AddressError> {
    if s.trim().is_empty() {
        return Err(AddressError::Empty);
    }

    // Plain bech32 only; a bech32m checksum is a different encoding.
    let checked = CheckedHrpstring::new::<Bech32>(s)
        .map_err(|e| AddressError::Bech32Decode(e.to_string()))?;

    let hrp = checked.hrp();
    if hrp != expected {
        return Err(AddressError::InvalidPrefix {
            expected: expected.to_string(),
            got: hrp.to_string(),
        });
    }

    let data: Vec<u8> = checked.byte_iter().collect();
    AccountAddress::from_slice(&data)
}

fn encode_with_hrp(address: &AccountAddress, hrp: Hrp) -> Result<String, AddressError> {
    bech32::encode::<Bech32>(hrp, address.as_bytes())
        .map_err(|e| AddressError::Bech32Encode(e.to_string()))
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_hex())
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            hex::decode(&s).map_err(serde::de::Error::custom)?
        } else {
            <Vec<u8>>::deserialize(deserializer)?
        };
        AccountAddress::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// AddressCodec
// ---------------------------------------------------------------------------

/// Bech32 codec bound to one chain prefix.
///
/// The prefix is parsed once at construction, so decoding never fails on a
/// bad configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressCodec {
    hrp: Hrp,
}

impl AddressCodec {
    /// Creates a codec for the given prefix.
    pub fn new(prefix: &str) -> Result<Self, AddressError> {
        let hrp = Hrp::parse(prefix).map_err(|_| AddressError::InvalidHrp(prefix.to_string()))?;
        Ok(Self { hrp })
    }

    /// Decodes an address string under this codec's prefix.
    pub fn decode(&self, s: &str) -> Result<AccountAddress, AddressError> {
        decode_with_hrp(s, self.hrp)
    }

    /// Encodes an address under this codec's prefix.
    pub fn encode(&self, address: &AccountAddress) -> Result<String, AddressError> {
        encode_with_hrp(address, self.hrp)
    }

    /// The prefix this codec enforces.
    pub fn prefix(&self) -> &str {
        self.hrp.as_str()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
