//! In-memory ledger for tests and the demo service.

use super::traits::{AccountId, Ledger, LedgerError};
use std::collections::HashMap;
use tracing::debug;

/// In-memory ledger with a manually driven clock
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedger {
    /// Map of account -> balance
    balances: HashMap<AccountId, u64>,
    /// Simulated current time
    now: u64,
}

impl InMemoryLedger {
    /// Create an empty ledger whose clock starts at `genesis`
    pub fn new(genesis: u64) -> Self {
        Self {
            balances: HashMap::new(),
            now: genesis,
        }
    }

    /// Open a new account holding `balance`
    pub fn open_account(&mut self, balance: u64) -> AccountId {
        let account = AccountId::new();
        self.balances.insert(account, balance);
        account
    }

    /// Credit an account out of thin air (faucet)
    pub fn mint(&mut self, account: &AccountId, amount: u64) -> Result<(), LedgerError> {
        let balance = self.balances.entry(*account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(*account))?;
        Ok(())
    }

    /// Advance the clock by `seconds`
    pub fn advance_time(&mut self, seconds: u64) {
        self.now = self.now.saturating_add(seconds);
    }

    /// Total value held across all accounts
    pub fn total_supply(&self) -> u128 {
        self.balances.values().map(|b| *b as u128).sum()
    }
}

impl Ledger for InMemoryLedger {
    fn now(&self) -> u64 {
        self.now
    }

    fn balance(&self, account: &AccountId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let available = self.balance(from);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                account: *from,
                needed: amount,
                available,
            });
        }
        if from == to || amount == 0 {
            return Ok(());
        }

        let credited = self
            .balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(*to))?;

        self.balances.insert(*from, available - amount);
        self.balances.insert(*to, credited);

        debug!("Transferred {} from {} to {}", amount, from, to);
        Ok(())
    }
}
