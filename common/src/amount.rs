//! Native-asset amount type.
//!
//! Amounts enter the system as decimal strings supplied by the user. All
//! threshold comparisons are numeric; `"2.1"` is greater than `"2.01"` even
//! though it sorts lower lexicographically.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BatchError, Result};

/// An amount of the ledger's native asset (XLM).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Parse an amount from a decimal string.
    pub fn parse(s: &str) -> Result<Self> {
        let value = Decimal::from_str_exact(s.trim())
            .map_err(|e| BatchError::InvalidAmount(format!("{s:?}: {e}")))?;
        if value.is_sign_negative() {
            return Err(BatchError::InvalidAmount(format!("{s:?}: negative amount")));
        }
        Ok(Self { value })
    }

    /// Smallest amount that can create a new on-ledger account.
    pub fn min_create_account() -> Self {
        Self {
            value: Decimal::ONE,
        }
    }

    /// Smallest amount that can fund a relay escrow (account reserve plus
    /// the escrow's claim fee).
    pub fn min_relay() -> Self {
        Self {
            value: Decimal::new(201, 2),
        }
    }

    /// Get the underlying decimal value.
    pub fn lumens(&self) -> Decimal {
        self.value
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
