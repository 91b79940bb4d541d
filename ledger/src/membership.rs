//! Registry of every account that has ever held a stamp.

use attest_types::Account;
use std::collections::HashSet;

/// Insertion-ordered, append-only set of accounts.
#[derive(Clone, Debug, Default)]
pub struct MembershipRegistry {
    order: Vec<Account>,
    index: HashSet<Account>,
}

impl MembershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `account` unless already present. Returns `true` when added.
    pub fn record_if_absent(&mut self, account: Account) -> bool {
        if !self.index.insert(account) {
            return false;
        }
        self.order.push(account);
        tracing::debug!(account = %account, members = self.order.len(), "new member recorded");
        true
    }

    pub fn contains(&self, account: &Account) -> bool {
        self.index.contains(account)
    }

    /// All members in first-seen order.
    pub fn all(&self) -> &[Account] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
