//! # Transfer Helpers
//!
//! Six routes for moving the native denomination around the host ledger:
//!
//! ```text
//! address -> address    BankKeeper::send_coins
//! module  -> address    BankKeeper::send_coins_from_module_to_account
//! address -> module     BankKeeper::send_coins_from_account_to_module
//! module  -> module     BankKeeper::send_coins_from_module_to_module
//! address -> treasury   DistributionKeeper::fund_community_pool
//! module  -> treasury   AccountKeeper::get_module_address + fund_community_pool
//! ```
//!
//! Every route decodes the address strings it is given, wraps the amount in
//! the configured denomination, and makes exactly one keeper call. A string
//! that fails to decode stops the route before any keeper is touched. Keeper
//! errors come back to the caller exactly as the keeper produced them.
//!
//! Module names are trusted host keys and are never decoded, which is why
//! module -> treasury has no address failure mode while address -> treasury
//! does.

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::address::{AccountAddress, AddressCodec, AddressError};
use crate::coin::Coins;
use crate::config::{ConfigError, TransferConfig};
use crate::context::Context;
use crate::keeper::{AccountKeeper, BankKeeper, DistributionKeeper, KeeperError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Which side of a transfer an address belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressRole {
    /// The account funds are taken from.
    Sender,
    /// The account funds are sent to.
    Recipient,
}

impl fmt::Display for AddressRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressRole::Sender => write!(f, "sender"),
            AddressRole::Recipient => write!(f, "recipient"),
        }
    }
}

/// Errors returned by the transfer helpers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// An address string did not decode. No keeper was called.
    #[error("invalid {role} address '{address}': {source}")]
    InvalidAddress {
        /// Which side failed to decode.
        role: AddressRole,
        /// The string as given by the caller.
        address: String,
        /// Why it was rejected.
        source: AddressError,
    },

    /// The keeper rejected the transfer.
    #[error(transparent)]
    Keeper(#[from] KeeperError),
}

impl TransferError {
    /// Returns the keeper error, if the keeper is what failed.
    pub fn keeper_error(&self) -> Option<&KeeperError> {
        match self {
            TransferError::Keeper(e) => Some(e),
            TransferError::InvalidAddress { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TransferHelper
// ---------------------------------------------------------------------------

/// Stateless transfer helper bound to one denomination and address prefix.
///
/// Keepers are passed per call, so a single helper can serve any number of
/// hosts. Each method is generic over the capability it needs and accepts
/// trait objects as well as concrete keepers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferHelper {
    denom: String,
    codec: AddressCodec,
}

impl TransferHelper {
    /// Builds a helper from a validated configuration.
    pub fn new(config: TransferConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let codec =
            AddressCodec::new(&config.bech32_prefix).map_err(|e| ConfigError::InvalidPrefix {
                prefix: config.bech32_prefix.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            denom: config.denom,
            codec,
        })
    }

    /// The denomination every transfer is made in.
    pub fn denom(&self) -> &str {
        &self.denom
    }

    /// The address codec used to decode sender and recipient strings.
    pub fn codec(&self) -> &AddressCodec {
        &self.codec
    }

    /// Wraps `amount` as a single-denomination coin set.
    pub fn coins(&self, amount: u64) -> Coins {
        Coins::single(self.denom.as_str(), amount)
    }

    fn decode(&self, role: AddressRole, address: &str) -> Result<AccountAddress, TransferError> {
        self.codec.decode(address).map_err(|source| {
            warn!(%role, address, error = %source, "rejecting transfer with undecodable address");
            TransferError::InvalidAddress {
                role,
                address: address.to_string(),
                source,
            }
        })
    }

    /// Sends `amount` from one account to another.
    ///
    /// # Errors
    ///
    /// [`TransferError::InvalidAddress`] if either string fails to decode
    /// (sender checked first), otherwise whatever the bank keeper returns.
    pub fn transfer_from_address_to_address<B: BankKeeper + ?Sized>(
        &self,
        bank: &B,
        ctx: &Context,
        from: &str,
        to: &str,
        amount: u64,
    ) -> Result<(), TransferError> {
        let sender = self.decode(AddressRole::Sender, from)?;
        let recipient = self.decode(AddressRole::Recipient, to)?;

        debug!(height = ctx.block_height, from, to, amount, denom = %self.denom, "address -> address");
        bank.send_coins(ctx, &sender, &recipient, &self.coins(amount))?;
        Ok(())
    }

    /// Sends `amount` from a module pool to an account.
    pub fn transfer_from_module_to_address<B: BankKeeper + ?Sized>(
        &self,
        bank: &B,
        ctx: &Context,
        module: &str,
        to: &str,
        amount: u64,
    ) -> Result<(), TransferError> {
        let recipient = self.decode(AddressRole::Recipient, to)?;

        debug!(height = ctx.block_height, module, to, amount, denom = %self.denom, "module -> address");
        bank.send_coins_from_module_to_account(ctx, module, &recipient, &self.coins(amount))?;
        Ok(())
    }

    /// Sends `amount` from an account into a module pool.
    pub fn transfer_from_address_to_module<B: BankKeeper + ?Sized>(
        &self,
        bank: &B,
        ctx: &Context,
        from: &str,
        module: &str,
        amount: u64,
    ) -> Result<(), TransferError> {
        let sender = self.decode(AddressRole::Sender, from)?;

        debug!(height = ctx.block_height, from, module, amount, denom = %self.denom, "address -> module");
        bank.send_coins_from_account_to_module(ctx, &sender, module, &self.coins(amount))?;
        Ok(())
    }

    /// Sends `amount` between two module pools. Never fails on input.
    pub fn transfer_from_module_to_module<B: BankKeeper + ?Sized>(
        &self,
        bank: &B,
        ctx: &Context,
        from_module: &str,
        to_module: &str,
        amount: u64,
    ) -> Result<(), TransferError> {
        debug!(height = ctx.block_height, from_module, to_module, amount, denom = %self.denom, "module -> module");
        bank.send_coins_from_module_to_module(ctx, from_module, to_module, &self.coins(amount))?;
        Ok(())
    }

    /// Deposits `amount` from an account into the community pool.
    pub fn transfer_from_address_to_treasury<D: DistributionKeeper + ?Sized>(
        &self,
        distribution: &D,
        ctx: &Context,
        from: &str,
        amount: u64,
    ) -> Result<(), TransferError> {
        let sender = self.decode(AddressRole::Sender, from)?;

        debug!(height = ctx.block_height, from, amount, denom = %self.denom, "address -> treasury");
        distribution.fund_community_pool(ctx, &self.coins(amount), &sender)?;
        Ok(())
    }

    /// Deposits `amount` from a module pool into the community pool.
    ///
    /// The module's address comes from the account keeper; the name itself
    /// is not validated.
    pub fn transfer_from_module_to_treasury<A, D>(
        &self,
        account: &A,
        distribution: &D,
        ctx: &Context,
        module: &str,
        amount: u64,
    ) -> Result<(), TransferError>
    where
        A: AccountKeeper + ?Sized,
        D: DistributionKeeper + ?Sized,
    {
        let sender = account.get_module_address(module);

        debug!(height = ctx.block_height, module, sender = %sender, amount, denom = %self.denom, "module -> treasury");
        distribution.fund_community_pool(ctx, &self.coins(amount), &sender)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
