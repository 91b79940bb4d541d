//! The attestation service: verifies issuer-signed proofs and maintains the
//! stamp ledger and membership registry behind one write lock.

use crate::config::{ConfigError, ServiceConfig};
use crate::error::AttestationError;
use attest_crypto::SignatureVerifier;
use attest_ledger::{MembershipRegistry, StampLedger};
use attest_policy::PolicyStore;
use attest_types::{
    Account, Clock, IdentityHash, PolicyParams, Proof, ProviderId, Signature, Stamp, Timestamp,
    WindowPolicy,
};
use attest_utils::format_duration;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Everything a verification mutates. Kept under one lock so the cooldown
/// check and the write see the same snapshot.
#[derive(Debug, Default)]
struct LedgerState {
    stamps: StampLedger,
    members: MembershipRegistry,
}

/// Verifies proofs and answers stamp queries.
///
/// `Send + Sync`; share it with `Arc`. Reads run concurrently, writes are
/// serialised. Locks are always taken ledger first, then policy.
pub struct AttestationService {
    ledger: RwLock<LedgerState>,
    policy: RwLock<PolicyStore>,
    verifier: SignatureVerifier,
    providers: BTreeSet<ProviderId>,
    proof_max_age_secs: u64,
    window_policy: WindowPolicy,
    clock: Arc<dyn Clock>,
}

impl AttestationService {
    /// A service with default policy, the default providers and a one hour
    /// proof freshness window.
    pub fn new(
        owner: Account,
        issuer: Account,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AttestationError> {
        let mut config = ServiceConfig::new(owner);
        config.issuer = Some(issuer);
        Self::build(&config, clock)
    }

    /// Build from a validated configuration.
    pub fn from_config(
        config: &ServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = PolicyStore::new(config.owner, config.params())?;
        Ok(Self::assemble(config, policy, clock))
    }

    fn build(config: &ServiceConfig, clock: Arc<dyn Clock>) -> Result<Self, AttestationError> {
        let policy = PolicyStore::new(config.owner, config.params())?;
        Ok(Self::assemble(config, policy, clock))
    }

    fn assemble(config: &ServiceConfig, policy: PolicyStore, clock: Arc<dyn Clock>) -> Self {
        tracing::info!(
            owner = %config.owner,
            issuer = %config.issuer(),
            verify_days = config.verify_day_threshold,
            reverify_days = config.reverify_day_threshold,
            providers = config.providers.len(),
            "attestation service initialised"
        );
        Self {
            ledger: RwLock::new(LedgerState::default()),
            policy: RwLock::new(policy),
            verifier: SignatureVerifier::new(config.issuer()),
            providers: config.providers.iter().cloned().collect(),
            proof_max_age_secs: config.proof_max_age_secs,
            window_policy: config.window_policy,
            clock,
        }
    }

    // ── Locking ────────────────────────────────────────────────────────

    fn read_ledger(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.ledger.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_ledger(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.ledger.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_policy(&self) -> RwLockReadGuard<'_, PolicyStore> {
        self.policy.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_policy(&self) -> RwLockWriteGuard<'_, PolicyStore> {
        self.policy.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Writes ─────────────────────────────────────────────────────────

    /// Verify an issuer-signed proof and bind `identity_hash` to `account`
    /// for `provider`, returning the updated stamp.
    ///
    /// Checks run in a fixed order and the first failure wins: provider
    /// registered, account non-zero, identity not held elsewhere, proof
    /// fresh, cooldown elapsed, signature from the issuer. Nothing changes
    /// unless all pass.
    pub fn verify_address(
        &self,
        account: Account,
        identity_hash: IdentityHash,
        timestamp: Timestamp,
        provider: &ProviderId,
        signature: &Signature,
    ) -> Result<Stamp, AttestationError> {
        let result = self.try_verify(account, identity_hash, timestamp, provider, signature);
        if let Err(err) = &result {
            tracing::debug!(
                account = %account,
                provider = %provider,
                timestamp = timestamp.as_secs(),
                error = %err,
                "verification rejected"
            );
        }
        result
    }

    /// [`Self::verify_address`] for a bundled proof.
    pub fn verify_proof(&self, proof: &Proof) -> Result<Stamp, AttestationError> {
        self.verify_address(
            proof.account,
            proof.identity_hash,
            proof.timestamp,
            &proof.provider_id,
            &proof.signature,
        )
    }

    fn try_verify(
        &self,
        account: Account,
        identity_hash: IdentityHash,
        timestamp: Timestamp,
        provider: &ProviderId,
        signature: &Signature,
    ) -> Result<Stamp, AttestationError> {
        if !self.providers.contains(provider) {
            return Err(AttestationError::UnknownProvider(provider.clone()));
        }
        if account.is_zero() {
            return Err(AttestationError::InvalidAccount);
        }

        let mut state = self.write_ledger();

        if let Some(holder) = state.stamps.holder_of(provider, &identity_hash) {
            if holder != account {
                return Err(AttestationError::IdentityConflict { holder });
            }
        }

        let now = self.clock.now();
        if now.abs_diff(timestamp) > self.proof_max_age_secs {
            return Err(AttestationError::ProofExpired {
                timestamp,
                now,
                max_age_secs: self.proof_max_age_secs,
            });
        }

        let (verify_days, reverify_days) = {
            let policy = self.read_policy();
            (policy.verify_window_days(), policy.reverify_window_days())
        };
        if let Some(last) = state.stamps.latest_entry(&account, provider) {
            let next_allowed = last.at.plus_days(reverify_days);
            if timestamp < next_allowed {
                tracing::debug!(
                    account = %account,
                    provider = %provider,
                    wait = %format_duration(next_allowed.as_secs() - timestamp.as_secs()),
                    "reverification cooldown still running"
                );
                return Err(AttestationError::ReverificationTooSoon {
                    last: last.at,
                    next_allowed,
                });
            }
        }

        self.verifier
            .check(&account, &identity_hash, timestamp, provider, signature)?;

        let stamp = state
            .stamps
            .bind(account, provider, identity_hash, timestamp, verify_days)?;
        let new_member = state.members.record_if_absent(account);

        tracing::info!(
            account = %account,
            provider = %provider,
            at = timestamp.as_secs(),
            history_len = stamp.history.len(),
            new_member,
            "address verified"
        );
        Ok(stamp)
    }

    /// Remove the caller's stamp for `provider`. Membership is unaffected.
    pub fn unverify(
        &self,
        provider: &ProviderId,
        caller: &Account,
    ) -> Result<Stamp, AttestationError> {
        let removed = self.write_ledger().stamps.remove(caller, provider);
        match removed {
            Ok(stamp) => {
                tracing::info!(account = %caller, provider = %provider, "stamp removed");
                Ok(stamp)
            }
            Err(err) => {
                tracing::debug!(
                    account = %caller,
                    provider = %provider,
                    error = %err,
                    "unverify rejected"
                );
                Err(err.into())
            }
        }
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// Current stamps of `account` with full histories, ordered by provider.
    pub fn get_stamps(&self, account: &Account) -> Vec<Stamp> {
        self.read_ledger().stamps.get(account)
    }

    /// Stamps of `account` that were valid at `timestamp`, each with history
    /// truncated to entries at or before it.
    pub fn get_stamps_at(&self, account: &Account, timestamp: Timestamp) -> Vec<Stamp> {
        let state = self.read_ledger();
        let verify_days = self.read_policy().verify_window_days();
        state
            .stamps
            .get_as_of(account, timestamp, verify_days, self.window_policy)
    }

    /// Whether `account` has ever held a stamp.
    pub fn is_or_was_member(&self, account: &Account) -> bool {
        self.read_ledger().members.contains(account)
    }

    /// Every account that has ever held a stamp, in first-seen order.
    pub fn get_all_members(&self) -> Vec<Account> {
        self.read_ledger().members.all().to_vec()
    }

    // ── Policy ─────────────────────────────────────────────────────────

    pub fn set_verify_day_threshold(
        &self,
        days: u32,
        caller: &Account,
    ) -> Result<(), AttestationError> {
        self.write_policy().set_verify_window_days(days, caller)?;
        Ok(())
    }

    pub fn set_reverify_threshold(
        &self,
        days: u32,
        caller: &Account,
    ) -> Result<(), AttestationError> {
        self.write_policy().set_reverify_window_days(days, caller)?;
        Ok(())
    }

    /// Snapshot of the current policy values.
    pub fn policy(&self) -> PolicyParams {
        self.read_policy().params()
    }

    pub fn owner(&self) -> Account {
        self.read_policy().owner()
    }

    pub fn issuer(&self) -> Account {
        self.verifier.issuer()
    }

    pub fn window_policy(&self) -> WindowPolicy {
        self.window_policy
    }

    /// Providers accepted by [`Self::verify_address`], sorted.
    pub fn providers(&self) -> impl Iterator<Item = &ProviderId> {
        self.providers.iter()
    }

    /// The service's notion of now.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_nullables::{fixed_issuer, fixed_owner, NullClock};
    use attest_types::SECS_PER_DAY;

    const NOW: u64 = 1_700_000_000;

    fn service() -> (AttestationService, Arc<NullClock>) {
        let clock = Arc::new(NullClock::new(NOW));
        let issuer = fixed_issuer().account();
        let service = AttestationService::new(fixed_owner(), issuer, clock.clone()).unwrap();
        (service, clock)
    }

    fn proof(account: Account, hash: u8, at: u64) -> Proof {
        fixed_issuer()
            .issue(
                account,
                IdentityHash::new([hash; 32]),
                Timestamp::new(at),
                ProviderId::github(),
            )
            .unwrap()
    }

    #[test]
    fn service_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AttestationService>();
    }

    #[test]
    fn verify_then_query() {
        let (service, _) = service();
        let alice = Account::new([0xA1; 20]);
        let stamp = service.verify_proof(&proof(alice, 1, NOW)).unwrap();
        assert_eq!(stamp.history, vec![Timestamp::new(NOW)]);
        assert_eq!(service.get_stamps(&alice), vec![stamp]);
        assert!(service.is_or_was_member(&alice));
    }

    #[test]
    fn cooldown_check_precedes_signature_check() {
        let (service, clock) = service();
        let alice = Account::new([0xA1; 20]);
        service.verify_proof(&proof(alice, 1, NOW)).unwrap();
        clock.advance_days(1);
        let mut forged = proof(alice, 1, NOW + SECS_PER_DAY);
        forged.signature = Signature::new([0u8; 65]);
        assert!(matches!(
            service.verify_proof(&forged),
            Err(AttestationError::ReverificationTooSoon { .. })
        ));
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let mut config = ServiceConfig::new(fixed_owner());
        config.providers.clear();
        let clock = Arc::new(NullClock::new(NOW));
        assert!(matches!(
            AttestationService::from_config(&config, clock),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn issuer_defaults_to_owner() {
        let config = ServiceConfig::new(fixed_owner());
        let clock = Arc::new(NullClock::new(NOW));
        let service = AttestationService::from_config(&config, clock).unwrap();
        assert_eq!(service.issuer(), service.owner());
    }
}
