//! Per-account stamps and the identity-hash binding index.

use crate::error::LedgerError;
use crate::history::{History, HistoryEntry};
use attest_types::{Account, IdentityHash, ProviderId, Stamp, Timestamp, WindowPolicy};
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug)]
struct StampRecord {
    identity_hash: IdentityHash,
    history: History,
}

impl StampRecord {
    fn to_stamp(&self, provider: &ProviderId) -> Stamp {
        Stamp {
            provider_id: provider.clone(),
            identity_hash: self.identity_hash,
            history: self.history.timestamps(),
        }
    }
}

/// Stamps keyed by account then provider, plus the global binding index.
///
/// Invariants upheld by every method:
/// - each `(provider, identity hash)` is held by at most one account;
/// - the binding index and the stamps always agree;
/// - histories are strictly increasing.
#[derive(Clone, Debug, Default)]
pub struct StampLedger {
    stamps: HashMap<Account, BTreeMap<ProviderId, StampRecord>>,
    bindings: HashMap<(ProviderId, IdentityHash), Account>,
}

impl StampLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The account currently holding `identity_hash` for `provider`.
    pub fn holder_of(
        &self,
        provider: &ProviderId,
        identity_hash: &IdentityHash,
    ) -> Option<Account> {
        self.bindings
            .get(&(provider.clone(), *identity_hash))
            .copied()
    }

    fn record(&self, account: &Account, provider: &ProviderId) -> Option<&StampRecord> {
        self.stamps.get(account)?.get(provider)
    }

    /// Latest history entry of the stamp for `(account, provider)`.
    pub fn latest_entry(&self, account: &Account, provider: &ProviderId) -> Option<HistoryEntry> {
        self.record(account, provider)?.history.latest().copied()
    }

    pub fn stamp(&self, account: &Account, provider: &ProviderId) -> Option<Stamp> {
        self.record(account, provider)
            .map(|record| record.to_stamp(provider))
    }

    /// Create, extend, or rebind the stamp for `(account, provider)`.
    ///
    /// - No stamp yet: a new one with a single history entry.
    /// - Same identity hash: `timestamp` is appended (must be strictly later).
    /// - Different identity hash: the old hash is released and the stamp is
    ///   replaced by a fresh one under the new hash.
    ///
    /// Fails without changing anything if `identity_hash` is bound to another
    /// account.
    pub fn bind(
        &mut self,
        account: Account,
        provider: &ProviderId,
        identity_hash: IdentityHash,
        timestamp: Timestamp,
        verify_window_days: u32,
    ) -> Result<Stamp, LedgerError> {
        if let Some(holder) = self.holder_of(provider, &identity_hash) {
            if holder != account {
                return Err(LedgerError::IdentityAlreadyBound { holder });
            }
        }

        let entry = HistoryEntry {
            at: timestamp,
            verify_window_days,
        };
        let account_stamps = self.stamps.entry(account).or_default();

        match account_stamps.get_mut(provider) {
            Some(record) if record.identity_hash == identity_hash => {
                record.history.append(entry)?;
                tracing::debug!(
                    account = %account,
                    provider = %provider,
                    at = timestamp.as_secs(),
                    "stamp history extended"
                );
            }
            Some(record) => {
                let released = record.identity_hash;
                *record = StampRecord {
                    identity_hash,
                    history: History::starting_at(entry),
                };
                self.bindings.remove(&(provider.clone(), released));
                self.bindings.insert((provider.clone(), identity_hash), account);
                tracing::debug!(
                    account = %account,
                    provider = %provider,
                    released = %released,
                    "stamp rebound to a new identity hash"
                );
            }
            None => {
                account_stamps.insert(
                    provider.clone(),
                    StampRecord {
                        identity_hash,
                        history: History::starting_at(entry),
                    },
                );
                self.bindings.insert((provider.clone(), identity_hash), account);
                tracing::debug!(account = %account, provider = %provider, "stamp created");
            }
        }

        self.stamp(&account, provider)
            .ok_or_else(|| LedgerError::NoSuchStamp {
                account,
                provider: provider.clone(),
            })
    }

    /// Delete the stamp for `(account, provider)` and release its identity
    /// hash. Returns the removed stamp.
    pub fn remove(
        &mut self,
        account: &Account,
        provider: &ProviderId,
    ) -> Result<Stamp, LedgerError> {
        let no_such_stamp = || LedgerError::NoSuchStamp {
            account: *account,
            provider: provider.clone(),
        };
        let account_stamps = self.stamps.get_mut(account).ok_or_else(no_such_stamp)?;
        let record = account_stamps.remove(provider).ok_or_else(no_such_stamp)?;
        if account_stamps.is_empty() {
            self.stamps.remove(account);
        }
        self.bindings
            .remove(&(provider.clone(), record.identity_hash));

        tracing::debug!(account = %account, provider = %provider, "stamp removed");
        Ok(record.to_stamp(provider))
    }

    /// All current stamps of `account` with full history, ordered by provider.
    pub fn get(&self, account: &Account) -> Vec<Stamp> {
        self.stamps
            .get(account)
            .map(|stamps| {
                stamps
                    .iter()
                    .map(|(provider, record)| record.to_stamp(provider))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Stamps of `account` that were valid at `query`.
    ///
    /// For each stamp the latest history entry at or before `query` is found
    /// by binary search. The stamp is returned, with history truncated to
    /// entries `<= query`, if `query - entry <= window`. The window is the
    /// current threshold or the one recorded with the entry, per `policy`.
    pub fn get_as_of(
        &self,
        account: &Account,
        query: Timestamp,
        current_window_days: u32,
        policy: WindowPolicy,
    ) -> Vec<Stamp> {
        let Some(stamps) = self.stamps.get(account) else {
            return Vec::new();
        };
        stamps
            .iter()
            .filter_map(|(provider, record)| {
                let history = record
                    .history
                    .valid_prefix_at(query, current_window_days, policy)?;
                Some(Stamp {
                    provider_id: provider.clone(),
                    identity_hash: record.identity_hash,
                    history,
                })
            })
            .collect()
    }

    /// Number of stamps across all accounts.
    pub fn stamp_count(&self) -> usize {
        self.stamps.values().map(BTreeMap::len).sum()
    }

    /// Number of bound identity hashes. Always equals [`Self::stamp_count`].
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }
}
