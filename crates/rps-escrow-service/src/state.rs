//! Application state management.

use rps_escrow_core::{AccountId, Escrow, EscrowConfig, EscrowError, InMemoryLedger, Ledger};
use std::sync::{Arc, Mutex};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    escrow: Arc<Mutex<Escrow<InMemoryLedger>>>,
    /// Balance granted to accounts opened without an explicit amount
    faucet_balance: u64,
}

impl AppState {
    /// Create a fresh escrow whose simulated clock starts at `genesis`
    pub fn new(config: EscrowConfig, genesis: u64, faucet_balance: u64) -> Self {
        Self {
            escrow: Arc::new(Mutex::new(Escrow::new(InMemoryLedger::new(genesis), config))),
            faucet_balance,
        }
    }

    /// Run one escrow transition under the lock. Every request maps to
    /// exactly one call, so transitions are serialised.
    pub fn with_escrow<T>(&self, f: impl FnOnce(&mut Escrow<InMemoryLedger>) -> T) -> T {
        let mut escrow = self.escrow.lock().unwrap();
        f(&mut escrow)
    }

    pub fn faucet_balance(&self) -> u64 {
        self.faucet_balance
    }

    /// Open a demo account funded by the faucet
    pub fn open_account(&self, balance: Option<u64>) -> AccountId {
        let balance = balance.unwrap_or(self.faucet_balance);
        self.with_escrow(|escrow| escrow.ledger_mut().open_account(balance))
    }

    /// Top up a player account. The escrow's own account only receives
    /// value through escrow operations.
    pub fn fund_account(&self, account: &AccountId, amount: u64) -> Result<u64, EscrowError> {
        self.with_escrow(|escrow| {
            if *account == escrow.account() {
                tracing::warn!("Rejected faucet deposit of {} into the escrow account", amount);
                return Err(EscrowError::DirectValueTransferForbidden);
            }
            let ledger = escrow.ledger_mut();
            ledger.mint(account, amount)?;
            Ok(ledger.balance(account))
        })
    }

    pub fn balance(&self, account: &AccountId) -> u64 {
        self.with_escrow(|escrow| escrow.ledger().balance(account))
    }

    /// Advance simulated time by seconds
    pub fn advance_time(&self, seconds: u64) -> u64 {
        self.with_escrow(|escrow| {
            escrow.ledger_mut().advance_time(seconds);
            escrow.ledger().now()
        })
    }
}
