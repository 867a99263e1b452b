//! # Transfer Configuration & Constants
//!
//! The denomination every helper mints its coins in, the bech32 prefix
//! addresses must carry, and the names of the module accounts the host
//! ships with. Keep literals out of the transfer code; they belong here.

use bech32::Hrp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::LoggingConfig;

// ---------------------------------------------------------------------------
// Denomination
// ---------------------------------------------------------------------------

/// Base denomination of the native token. One NOVA is 10^6 unova.
pub const DEFAULT_DENOM: &str = "unova";

/// Minimum denomination length accepted by the host bank module.
pub const MIN_DENOM_LENGTH: usize = 3;

/// Maximum denomination length accepted by the host bank module.
pub const MAX_DENOM_LENGTH: usize = 128;

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Bech32 human-readable prefix for account addresses.
pub const DEFAULT_BECH32_PREFIX: &str = "nova";

/// Length in bytes of a decoded account address.
pub const ADDRESS_LENGTH: usize = 20;

// ---------------------------------------------------------------------------
// Module Accounts
// ---------------------------------------------------------------------------

/// Module that issues new supply.
pub const MINT_MODULE: &str = "mint";

/// Module that collects transaction fees before distribution.
pub const FEE_COLLECTOR_MODULE: &str = "fee_collector";

/// Module that holds the community pool (the treasury).
pub const DISTRIBUTION_MODULE: &str = "distribution";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating a [`TransferConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The denomination does not satisfy the host's denom rules.
    #[error("invalid denomination '{denom}': {reason}")]
    InvalidDenom {
        /// The rejected denomination.
        denom: String,
        /// What rule it broke.
        reason: String,
    },

    /// The bech32 prefix is not a valid human-readable part.
    #[error("invalid bech32 prefix '{prefix}': {reason}")]
    InvalidPrefix {
        /// The rejected prefix.
        prefix: String,
        /// Parser message.
        reason: String,
    },

    /// The logging section names an unusable filter directive.
    #[error("invalid log level '{level}': {reason}")]
    InvalidLogLevel {
        /// The rejected directive.
        level: String,
        /// Parser message.
        reason: String,
    },

    /// The configuration document could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// TransferConfig
// ---------------------------------------------------------------------------

/// Runtime configuration for [`TransferHelper`](crate::transfer::TransferHelper).
///
/// Missing fields fall back to the defaults above, so `{}` is a valid
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Denomination used for every coin the helpers construct.
    pub denom: String,

    /// Prefix that account address strings must carry.
    pub bech32_prefix: String,

    /// Subscriber settings for tools that install their own.
    pub logging: LoggingConfig,
}

impl TransferConfig {
    /// Builds a configuration with an explicit denomination and prefix.
    pub fn new(denom: impl Into<String>, bech32_prefix: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            bech32_prefix: bech32_prefix.into(),
            logging: LoggingConfig::default(),
        }
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the denomination, prefix and log filter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_denom(&self.denom)?;
        Hrp::parse(&self.bech32_prefix).map_err(|e| ConfigError::InvalidPrefix {
            prefix: self.bech32_prefix.clone(),
            reason: e.to_string(),
        })?;
        self.logging
            .filter()
            .map_err(|e| ConfigError::InvalidLogLevel {
                level: self.logging.level.clone(),
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DENOM, DEFAULT_BECH32_PREFIX)
    }
}

/// Validates a denomination: an ASCII letter followed by 2 to 127 characters
/// drawn from `[A-Za-z0-9/:._-]`.
pub fn validate_denom(denom: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidDenom {
        denom: denom.to_string(),
        reason: reason.to_string(),
    };

    if denom.len() < MIN_DENOM_LENGTH || denom.len() > MAX_DENOM_LENGTH {
        return Err(invalid(&format!(
            "length must be between {} and {}",
            MIN_DENOM_LENGTH, MAX_DENOM_LENGTH
        )));
    }

    let mut chars = denom.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(invalid("must start with an ASCII letter"));
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-')) {
        return Err(invalid("contains a character outside [A-Za-z0-9/:._-]"));
    }

    Ok(())
}
