//! Hosting ledger abstraction.

mod memory;
mod traits;

pub use memory::InMemoryLedger;
pub use traits::{AccountId, Ledger, LedgerError};
