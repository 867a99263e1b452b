//! # Coins
//!
//! A [`Coin`] is an amount in one denomination. [`Coins`] is the set form the
//! bank capability moves around: sorted by denomination, one entry per
//! denomination, and never holding a zero entry. That normalization matches
//! what the host bank module expects, so a set built here can be handed
//! straight to a keeper.
//!
//! Every way into [`Coins`] normalizes, deserialization included.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a coin set.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoinError {
    /// Merging duplicate entries would exceed `u64::MAX`.
    #[error("coin amount overflow merging duplicate denom {denom}")]
    Overflow {
        /// Denomination whose total overflowed.
        denom: String,
    },
}

/// An amount of a single denomination, in smallest units.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination, e.g. `unova`.
    pub denom: String,
    /// Amount in smallest units.
    pub amount: u64,
}

impl Coin {
    /// Creates a coin of `amount` in `denom`.
    pub fn new(denom: impl Into<String>, amount: u64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Returns `true` if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A normalized set of coins.
///
/// Serialized as a plain list; deserialized through [`Coins::from_coins`],
/// so duplicates, zero entries and ordering are fixed up on the way in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Creates an empty set.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Builds the single-denomination set every transfer helper sends.
    ///
    /// A zero `amount` yields the empty set.
    pub fn single(denom: impl Into<String>, amount: u64) -> Self {
        if amount == 0 {
            return Self::empty();
        }
        Self(vec![Coin::new(denom, amount)])
    }

    /// Normalizes an arbitrary list: drops zero entries, merges duplicate
    /// denominations, and sorts by denomination.
    ///
    /// # Errors
    ///
    /// Returns [`CoinError::Overflow`] if a merged total exceeds `u64::MAX`.
    pub fn from_coins(coins: Vec<Coin>) -> Result<Self, CoinError> {
        let mut merged: BTreeMap<String, u64> = BTreeMap::new();
        for Coin { denom, amount } in coins.into_iter().filter(|c| !c.is_zero()) {
            let total = merged.entry(denom.clone()).or_insert(0);
            *total = total
                .checked_add(amount)
                .ok_or(CoinError::Overflow { denom })?;
        }
        Ok(Self::from(merged))
    }

    /// Returns the amount held in `denom`, or zero.
    pub fn amount_of(&self, denom: &str) -> u64 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or(0)
    }

    /// Iterates the coins in denomination order.
    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// Number of distinct denominations held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no denomination has a non-zero amount.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        Self::single(coin.denom, coin.amount)
    }
}

/// Per-denomination totals are already unique and ordered; only zero
/// entries need dropping.
impl From<BTreeMap<String, u64>> for Coins {
    fn from(totals: BTreeMap<String, u64>) -> Self {
        Self(
            totals
                .into_iter()
                .filter(|(_, amount)| *amount > 0)
                .map(|(denom, amount)| Coin::new(denom, amount))
                .collect(),
        )
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = CoinError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        Self::from_coins(coins)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(Coin::to_string).collect();
        write!(f, "{}", rendered.join(","))
    }
}
