//! The account store (spec §3, §4.5): a fixed-size mapping from
//! [`AccountId`] to balance, pure in-memory data with no concurrency of
//! its own. Only the replica engine ever touches it (spec §5), so it
//! carries no internal locking.

use redbank_types::{AccountId, INITIAL_BALANCE, N_ACCOUNTS};

/// A single account: its id and current balance.
///
/// Balances may go negative: a blue op is never guarded (spec §3), and
/// even a correctly-guarded red withdraw can end up pushing the balance
/// negative once concurrent blue ops from other replicas are folded in.
/// That is accepted protocol behavior, not a bug to paper over here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Account {
    pub aid: AccountId,
    pub balance: f64,
}

impl Account {
    #[must_use]
    pub fn new(aid: AccountId, balance: f64) -> Self {
        Self { aid, balance }
    }

    #[must_use]
    pub fn compute_interest(&self, rate: f64) -> f64 {
        self.balance * rate
    }
}

/// A fixed-size vector of `N_ACCOUNTS` accounts, every one initialized to
/// [`INITIAL_BALANCE`].
#[derive(Debug, Clone)]
pub struct AccountStore {
    accounts: Vec<Account>,
}

impl AccountStore {
    #[must_use]
    pub fn new() -> Self {
        let accounts = (0..N_ACCOUNTS).map(|aid| Account::new(aid, INITIAL_BALANCE)).collect();
        Self { accounts }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Reads the current balance of `aid`.
    ///
    /// # Panics
    /// Panics if `aid` is out of range. Callers must validate the raw
    /// client-supplied id (see `redbank_types::validate_account_id`)
    /// before reaching the store.
    #[must_use]
    pub fn balance(&self, aid: AccountId) -> f64 {
        self.accounts[aid as usize].balance
    }

    /// Applies a signed delta to `aid`'s balance (spec §4.2 `ShadowOp::apply`).
    pub fn apply_delta(&mut self, aid: AccountId, amount: f64) {
        self.accounts[aid as usize].balance += amount;
    }

    #[must_use]
    pub fn account(&self, aid: AccountId) -> &Account {
        &self.accounts[aid as usize]
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_account_starts_at_initial_balance() {
        let store = AccountStore::new();
        assert_eq!(store.len(), N_ACCOUNTS as usize);
        assert_eq!(store.balance(0), INITIAL_BALANCE);
        assert_eq!(store.balance(N_ACCOUNTS - 1), INITIAL_BALANCE);
    }

    #[test]
    fn apply_delta_accumulates() {
        let mut store = AccountStore::new();
        store.apply_delta(20, 1000.0);
        store.apply_delta(20, 1100.0);
        assert_eq!(store.balance(20), INITIAL_BALANCE + 2100.0);
    }

    #[test]
    fn apply_delta_can_go_negative() {
        let mut store = AccountStore::new();
        store.apply_delta(5, -5000.0);
        assert!(store.balance(5) < 0.0);
    }
}
