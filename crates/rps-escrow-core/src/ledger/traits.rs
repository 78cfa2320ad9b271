//! Ledger trait definition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors from ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Insufficient funds in {account}: needed {needed}, available {available}")]
    InsufficientFunds {
        account: AccountId,
        needed: u64,
        available: u64,
    },

    #[error("Balance overflow for {0}")]
    BalanceOverflow(AccountId),
}

/// Account identity on the ledger
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Create a new random account ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ledger hosting the escrow
///
/// The escrow only needs three things from its host:
/// - a monotonic clock in seconds
/// - account balances
/// - an all-or-nothing value transfer
///
/// Implementations can be:
/// - InMemoryLedger for tests and the demo service
/// - an adapter over a real settlement backend
pub trait Ledger: Send {
    /// Current ledger time in seconds
    fn now(&self) -> u64;

    /// Balance held by an account
    fn balance(&self, account: &AccountId) -> u64;

    /// Move `amount` from one account to another; on error nothing moves
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u64)
        -> Result<(), LedgerError>;
}
