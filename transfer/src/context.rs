//! Execution context handed to every keeper call.
//!
//! The helpers never read it; they pass it through untouched so the host can
//! resolve its store, gas meter, and block header from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Block-level information for the call in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Chain the call executes on.
    pub chain_id: String,
    /// Height of the block being executed.
    pub block_height: u64,
    /// Header time of the block being executed.
    pub block_time: DateTime<Utc>,
}

impl Context {
    /// Creates a context stamped with the current time.
    pub fn new(chain_id: impl Into<String>, block_height: u64) -> Self {
        Self::at(chain_id, block_height, Utc::now())
    }

    /// Creates a context with an explicit block time.
    pub fn at(chain_id: impl Into<String>, block_height: u64, block_time: DateTime<Utc>) -> Self {
        Self {
            chain_id: chain_id.into(),
            block_height,
            block_time,
        }
    }

    /// Returns a copy of this context advanced to `block_height`.
    pub fn with_height(&self, block_height: u64) -> Self {
        Self {
            block_height,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn with_height_keeps_chain_and_time() {
        let time = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let ctx = Context::at("nova-devnet", 10, time);
        let next = ctx.with_height(11);
        assert_eq!(next.chain_id, "nova-devnet");
        assert_eq!(next.block_time, time);
        assert_eq!(next.block_height, 11);
    }
}
