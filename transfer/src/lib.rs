// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NOVA Transfer Helpers
//!
//! Thin glue between application code and the host ledger. Every helper in
//! this crate takes human-facing inputs (bech32 address strings, module
//! names, `u64` amounts), turns them into typed values, and hands the actual
//! movement of funds to a keeper supplied by the host.
//!
//! The crate owns no balances. Accounts, module pools and the community
//! treasury all live behind the capability traits in [`keeper`].
//!
//! ## Modules
//!
//! - **transfer** — The six transfer routes and their error type.
//! - **keeper** — Bank, distribution and account capability traits, plus an
//!   in-memory reference ledger.
//! - **address** — Bech32 account addresses and module address derivation.
//! - **coin** — Denominated amounts.
//! - **context** — The execution context threaded through keeper calls.
//! - **config** — Denomination, address prefix, and well-known module names.
//! - **logging** — `tracing` subscriber setup driven by the config's
//!   `logging` section.
//!
//! ## Example
//!
//! ```
//! use nova_transfer::address::AccountAddress;
//! use nova_transfer::config::{TransferConfig, MINT_MODULE};
//! use nova_transfer::context::Context;
//! use nova_transfer::keeper::MemoryLedger;
//! use nova_transfer::transfer::TransferHelper;
//!
//! let helper = TransferHelper::new(TransferConfig::default()).unwrap();
//! let ledger = MemoryLedger::new();
//! ledger.register_module(MINT_MODULE);
//! ledger.mint_to_module(MINT_MODULE, "unova", 1_000).unwrap();
//!
//! let alice = AccountAddress::from_bytes([1u8; 20]).to_bech32("nova").unwrap();
//! let ctx = Context::new("nova-devnet", 1);
//! helper
//!     .transfer_from_module_to_address(&ledger, &ctx, MINT_MODULE, &alice, 250)
//!     .unwrap();
//!
//! let alice = AccountAddress::from_bech32(&alice, "nova").unwrap();
//! assert_eq!(ledger.balance(&alice, "unova"), 250);
//! ```

pub mod address;
pub mod coin;
pub mod config;
pub mod context;
pub mod keeper;
pub mod logging;
pub mod transfer;

pub use address::{AccountAddress, AddressError};
pub use coin::{Coin, CoinError, Coins};
pub use config::TransferConfig;
pub use context::Context;
pub use keeper::{AccountKeeper, BankKeeper, DistributionKeeper, KeeperError};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use transfer::{AddressRole, TransferError, TransferHelper};
