//! # In-Memory Ledger
//!
//! A [`MemoryLedger`] is a complete, single-process host for the keeper
//! traits: per-account multi-denomination balances, named module accounts,
//! a community pool, and an event log. Tests, benches and simulators use it
//! wherever a real chain would sit.
//!
//! Every balance-changing call runs under one write lock and checks every
//! debit and credit before applying any of them, so a multi-coin send either
//! lands in full or not at all.

use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AccountKeeper, BankKeeper, DistributionKeeper, KeeperError};
use crate::address::AccountAddress;
use crate::coin::{Coin, Coins};
use crate::config::DISTRIBUTION_MODULE;
use crate::context::Context;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A balance change recorded by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Coins moved between two addresses (accounts or module accounts).
    Transfer {
        height: u64,
        from: AccountAddress,
        to: AccountAddress,
        amount: Coins,
    },

    /// Coins were deposited into the community pool.
    CommunityPoolFunded {
        height: u64,
        depositor: AccountAddress,
        amount: Coins,
    },

    /// New supply was created outside of a block (genesis funding).
    Minted { to: AccountAddress, amount: Coin },
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct LedgerState {
    /// `address -> (denom -> amount)`.
    balances: HashMap<AccountAddress, HashMap<String, u64>>,
    /// Registered module accounts by name.
    modules: HashMap<String, AccountAddress>,
    /// Addresses that may not receive funds from a module.
    blocked: HashSet<AccountAddress>,
    /// Community pool totals by denom.
    community_pool: BTreeMap<String, u64>,
    events: Vec<LedgerEvent>,
}

impl LedgerState {
    fn balance(&self, address: &AccountAddress, denom: &str) -> u64 {
        self.balances
            .get(address)
            .and_then(|b| b.get(denom))
            .copied()
            .unwrap_or(0)
    }

    fn module_address(&self, name: &str) -> Result<AccountAddress, KeeperError> {
        self.modules
            .get(name)
            .copied()
            .ok_or_else(|| KeeperError::UnknownModule(name.to_string()))
    }

    fn credit(
        &mut self,
        address: AccountAddress,
        denom: &str,
        amount: u64,
    ) -> Result<u64, KeeperError> {
        let entry = self
            .balances
            .entry(address)
            .or_default()
            .entry(denom.to_string())
            .or_insert(0);

        *entry = entry.checked_add(amount).ok_or(KeeperError::Overflow {
            denom: denom.to_string(),
            amount,
        })?;
        Ok(*entry)
    }

    /// Moves `amount` from `from` to `to` after validating every coin.
    fn transfer(
        &mut self,
        ctx: &Context,
        from: AccountAddress,
        to: AccountAddress,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        for coin in amount {
            let available = self.balance(&from, &coin.denom);
            if available < coin.amount {
                return Err(KeeperError::InsufficientFunds {
                    holder: from.to_hex(),
                    denom: coin.denom.clone(),
                    available,
                    requested: coin.amount,
                });
            }

            let receiving = if from == to {
                available - coin.amount
            } else {
                self.balance(&to, &coin.denom)
            };
            if receiving.checked_add(coin.amount).is_none() {
                return Err(KeeperError::Overflow {
                    denom: coin.denom.clone(),
                    amount: coin.amount,
                });
            }
        }

        for coin in amount {
            if let Some(balance) = self
                .balances
                .get_mut(&from)
                .and_then(|b| b.get_mut(&coin.denom))
            {
                *balance -= coin.amount;
            }
            self.credit(to, &coin.denom, coin.amount)?;
        }

        debug!(
            height = ctx.block_height,
            from = %from,
            to = %to,
            amount = %amount,
            "ledger transfer applied"
        );
        self.events.push(LedgerEvent::Transfer {
            height: ctx.block_height,
            from,
            to,
            amount: amount.clone(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryLedger
// ---------------------------------------------------------------------------

/// An in-memory host ledger implementing every keeper capability.
///
/// The distribution module account is registered at construction; other
/// module accounts must be registered before funds can move through them.
#[derive(Debug)]
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
}

impl MemoryLedger {
    /// Creates an empty ledger with the distribution module registered.
    pub fn new() -> Self {
        let ledger = Self {
            state: RwLock::new(LedgerState::default()),
        };
        ledger.register_module(DISTRIBUTION_MODULE);
        ledger
    }

    /// Registers a module account and returns its address. Idempotent.
    pub fn register_module(&self, name: &str) -> AccountAddress {
        let address = AccountAddress::module(name);
        self.state.write().modules.insert(name.to_string(), address);
        address
    }

    /// Forbids module-to-account sends to `address`.
    pub fn block_address(&self, address: AccountAddress) {
        self.state.write().blocked.insert(address);
    }

    /// Credits new supply directly to an account. Returns the new balance.
    pub fn deposit(
        &self,
        address: AccountAddress,
        denom: &str,
        amount: u64,
    ) -> Result<u64, KeeperError> {
        let mut state = self.state.write();
        let balance = state.credit(address, denom, amount)?;
        state.events.push(LedgerEvent::Minted {
            to: address,
            amount: Coin::new(denom, amount),
        });
        Ok(balance)
    }

    /// Credits new supply to a registered module account.
    pub fn mint_to_module(&self, module: &str, denom: &str, amount: u64) -> Result<u64, KeeperError> {
        let address = self.state.read().module_address(module)?;
        self.deposit(address, denom, amount)
    }

    /// Returns the balance of `address` in `denom`, or zero.
    pub fn balance(&self, address: &AccountAddress, denom: &str) -> u64 {
        self.state.read().balance(address, denom)
    }

    /// Returns a module account's balance, or zero if it is not registered.
    pub fn module_balance(&self, module: &str, denom: &str) -> u64 {
        let state = self.state.read();
        state
            .module_address(module)
            .map(|address| state.balance(&address, denom))
            .unwrap_or(0)
    }

    /// Returns the community pool totals.
    pub fn community_pool(&self) -> Coins {
        Coins::from(self.state.read().community_pool.clone())
    }

    /// Returns a snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.state.read().events.clone()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BankKeeper for MemoryLedger {
    fn send_coins(
        &self,
        ctx: &Context,
        from: &AccountAddress,
        to: &AccountAddress,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        self.state.write().transfer(ctx, *from, *to, amount)
    }

    fn send_coins_from_module_to_account(
        &self,
        ctx: &Context,
        sender_module: &str,
        recipient: &AccountAddress,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        let mut state = self.state.write();
        let from = state.module_address(sender_module)?;
        if state.blocked.contains(recipient) {
            return Err(KeeperError::Unauthorized(format!(
                "{} is not allowed to receive funds",
                recipient
            )));
        }
        state.transfer(ctx, from, *recipient, amount)
    }

    fn send_coins_from_module_to_module(
        &self,
        ctx: &Context,
        sender_module: &str,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        let mut state = self.state.write();
        let from = state.module_address(sender_module)?;
        let to = state.module_address(recipient_module)?;
        state.transfer(ctx, from, to, amount)
    }

    fn send_coins_from_account_to_module(
        &self,
        ctx: &Context,
        sender: &AccountAddress,
        recipient_module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        let mut state = self.state.write();
        let to = state.module_address(recipient_module)?;
        state.transfer(ctx, *sender, to, amount)
    }
}

impl DistributionKeeper for MemoryLedger {
    fn fund_community_pool(
        &self,
        ctx: &Context,
        amount: &Coins,
        depositor: &AccountAddress,
    ) -> Result<(), KeeperError> {
        let mut state = self.state.write();
        let pool = state.module_address(DISTRIBUTION_MODULE)?;

        for coin in amount {
            let current = state.community_pool.get(&coin.denom).copied().unwrap_or(0);
            if current.checked_add(coin.amount).is_none() {
                return Err(KeeperError::Overflow {
                    denom: coin.denom.clone(),
                    amount: coin.amount,
                });
            }
        }

        state.transfer(ctx, *depositor, pool, amount)?;
        for coin in amount {
            *state
                .community_pool
                .entry(coin.denom.clone())
                .or_insert(0) += coin.amount;
        }

        state.events.push(LedgerEvent::CommunityPoolFunded {
            height: ctx.block_height,
            depositor: *depositor,
            amount: amount.clone(),
        });
        Ok(())
    }
}

impl AccountKeeper for MemoryLedger {
    fn get_module_address(&self, module_name: &str) -> AccountAddress {
        AccountAddress::module(module_name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
