use proptest::prelude::*;

use attest_ledger::{LedgerError, StampLedger};
use attest_types::{Account, IdentityHash, ProviderId, Timestamp, WindowPolicy, SECS_PER_DAY};

const T0: u64 = 1_600_000_000;

#[derive(Clone, Debug)]
enum Op {
    Bind { account: u8, provider: u8, hash: u8, step: u64 },
    Remove { account: u8, provider: u8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..4, 0u8..2, 0u8..4, 0u64..(90 * SECS_PER_DAY))
            .prop_map(|(account, provider, hash, step)| Op::Bind {
                account,
                provider,
                hash,
                step,
            }),
        1 => (0u8..4, 0u8..2).prop_map(|(account, provider)| Op::Remove { account, provider }),
    ]
}

fn account(n: u8) -> Account {
    Account::new([n + 1; 20])
}

fn provider(n: u8) -> ProviderId {
    if n == 0 {
        ProviderId::github()
    } else {
        ProviderId::proof_of_humanity()
    }
}

fn identity(n: u8) -> IdentityHash {
    IdentityHash::new([n; 32])
}

/// Apply ops with a monotone clock. Binds that fail are simply skipped.
fn run(ops: &[Op]) -> StampLedger {
    let mut ledger = StampLedger::new();
    let mut now = T0;
    for op in ops {
        match op {
            Op::Bind { account: a, provider: p, hash: h, step } => {
                now += step;
                let at = Timestamp::new(now);
                let _ = ledger.bind(account(*a), &provider(*p), identity(*h), at, 60);
            }
            Op::Remove { account: a, provider: p } => {
                let _ = ledger.remove(&account(*a), &provider(*p));
            }
        }
    }
    ledger
}

/// Brute-force validity check: scan the whole history for the last entry
/// not after `query`.
fn oracle_valid(
    history: &[Timestamp],
    query: Timestamp,
    window_days: u32,
) -> Option<Vec<Timestamp>> {
    let prefix: Vec<Timestamp> = history.iter().copied().filter(|t| *t <= query).collect();
    let latest = prefix.last()?;
    let window = u64::from(window_days) * SECS_PER_DAY;
    if query.as_secs() - latest.as_secs() <= window {
        Some(prefix)
    } else {
        None
    }
}

proptest! {
    /// Every history stays strictly increasing whatever the op sequence.
    #[test]
    fn histories_strictly_increase(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let ledger = run(&ops);
        for a in 0..4 {
            for stamp in ledger.get(&account(a)) {
                prop_assert!(!stamp.history.is_empty());
                prop_assert!(stamp.history.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    /// No identity hash is held by two accounts, and the binding index
    /// agrees with the stamps.
    #[test]
    fn identity_hashes_are_unique(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let ledger = run(&ops);
        let mut seen = std::collections::HashSet::new();
        for a in 0..4 {
            for stamp in ledger.get(&account(a)) {
                prop_assert!(seen.insert((stamp.provider_id.clone(), stamp.identity_hash)));
                prop_assert_eq!(
                    ledger.holder_of(&stamp.provider_id, &stamp.identity_hash),
                    Some(account(a))
                );
            }
        }
        prop_assert_eq!(ledger.binding_count(), ledger.stamp_count());
    }

    /// Binding a hash held elsewhere fails and leaves the ledger untouched.
    #[test]
    fn foreign_bind_changes_nothing(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut ledger = run(&ops);
        let holder = (0..4).map(account).find(|a| !ledger.get(a).is_empty());
        if let Some(holder) = holder {
            let stamp = ledger.get(&holder)[0].clone();
            let intruder = Account::new([0xEE; 20]);
            let before = ledger.get(&holder);
            let result = ledger.bind(
                intruder,
                &stamp.provider_id,
                stamp.identity_hash,
                Timestamp::new(u64::MAX / 2),
                60,
            );
            prop_assert_eq!(result, Err(LedgerError::IdentityAlreadyBound { holder }));
            prop_assert!(ledger.get(&intruder).is_empty());
            prop_assert_eq!(ledger.get(&holder), before);
        }
    }

    /// get_as_of agrees with a linear scan of each full history.
    #[test]
    fn as_of_matches_linear_scan(
        ops in prop::collection::vec(op_strategy(), 0..40),
        offset in 0u64..(400 * SECS_PER_DAY),
        window_days in 1u32..120,
    ) {
        let ledger = run(&ops);
        let query = Timestamp::new(T0 - SECS_PER_DAY + offset);
        for a in 0..4 {
            let expected: Vec<_> = ledger
                .get(&account(a))
                .into_iter()
                .filter_map(|stamp| {
                    let history = oracle_valid(&stamp.history, query, window_days)?;
                    Some((stamp.provider_id, history))
                })
                .collect();
            let actual: Vec<_> = ledger
                .get_as_of(&account(a), query, window_days, WindowPolicy::QueryTime)
                .into_iter()
                .map(|stamp| (stamp.provider_id, stamp.history))
                .collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
