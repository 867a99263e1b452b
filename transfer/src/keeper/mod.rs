//! # Keeper Capabilities
//!
//! The host ledger exposes its bank, distribution and account modules
//! through keepers. The transfer helpers only ever talk to the three traits
//! below, so any host that implements them (a full node, a simulator, a test
//! double) can sit behind the helpers.
//!
//! ```text
//! mod.rs     — BankKeeper, DistributionKeeper, AccountKeeper, KeeperError
//! memory.rs  — MemoryLedger: an in-memory host implementing all three
//! ```
//!
//! Keepers take `&self`. Hosts that mutate state keep it behind their own
//! lock or store handle; atomicity of a single call is the host's contract.

pub mod memory;

use thiserror::Error;

use crate::address::AccountAddress;
use crate::coin::Coins;
use crate::context::Context;

pub use memory::{LedgerEvent, MemoryLedger};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures reported by a keeper. The helpers pass these through unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeeperError {
    /// The source account or module does not hold enough of a denomination.
    #[error("insufficient funds: {holder} has {available}{denom}, requested {requested}{denom}")]
    InsufficientFunds {
        /// Hex address of the account being debited.
        holder: String,
        /// Denomination that ran short.
        denom: String,
        /// Balance at the time of the call.
        available: u64,
        /// Amount the call tried to move.
        requested: u64,
    },

    /// No module account is registered under this name.
    #[error("module account {0} does not exist")]
    UnknownModule(String),

    /// The recipient is not allowed to receive funds through this route.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Crediting would exceed `u64::MAX`.
    #[error("balance overflow crediting {amount}{denom}")]
    Overflow {
        /// Denomination being credited.
        denom: String,
        /// Amount that overflowed.
        amount: u64,
    },

    /// Any other host failure.
    #[error("{0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Bank module: moves coins between accounts and module pools.
pub trait BankKeeper {
    /// Moves coins from one account to another.
    fn send_coins(
        &self,
        ctx: &Context,
        from: &AccountAddress,
        to: &AccountAddress,
        amount: &Coins,
    ) -> Result<(), KeeperError>;

    /// Moves coins out of a module pool into an account.
    fn send_coins_from_module_to_account(
        &self,
        ctx: &Context,
        sender_module: &str,
        recipient: &AccountAddress,
        amount: &Coins,
    ) -> Result<(), KeeperError>;

    /// Moves coins between two module pools.
    fn send_coins_from_module_to_module(
        &self,
        ctx: &Context,
        sender_module: &str,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError>;

    /// Moves coins from an account into a module pool.
    fn send_coins_from_account_to_module(
        &self,
        ctx: &Context,
        sender: &AccountAddress,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError>;
}

/// Distribution module: owns the community pool.
pub trait DistributionKeeper {
    /// Moves coins from `depositor` into the community pool.
    fn fund_community_pool(
        &self,
        ctx: &Context,
        amount: &Coins,
        depositor: &AccountAddress,
    ) -> Result<(), KeeperError>;
}

/// Account module: resolves module names to their account addresses.
pub trait AccountKeeper {
    /// Returns the address of the named module account.
    fn get_module_address(&self, module_name: &str) -> AccountAddress;
}
