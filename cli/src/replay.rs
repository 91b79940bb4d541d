//! Replays a JSON-lines script of service operations against an in-memory
//! service driven by a manual clock.
//!
//! Each input line is one operation, tagged by `op`:
//!
//! ```text
//! {"op":"verify","account":"0x..","identity_hash":"..","timestamp":1700000000,"provider":"github","signature":"0x.."}
//! {"op":"advance_clock","secs":2592000}
//! {"op":"stamps_at","account":"0x..","timestamp":1700000000}
//! ```
//!
//! Each output line reports the result of the matching input line. Blank
//! lines and lines starting with `#` are skipped.

use attest_crypto::{CryptoError, IssuerKey};
use attest_nullables::NullClock;
use attest_service::{AttestationError, AttestationService, ConfigError, ServiceConfig};
use attest_types::{Account, IdentityHash, ProviderId, Signature, Timestamp};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Submit a proof. Without a signature, the replay's issuer key signs it.
    Verify {
        account: Account,
        identity_hash: IdentityHash,
        /// Defaults to the clock's current time.
        timestamp: Option<Timestamp>,
        provider: ProviderId,
        signature: Option<Signature>,
    },
    Unverify {
        provider: ProviderId,
        caller: Account,
    },
    Stamps {
        account: Account,
    },
    StampsAt {
        account: Account,
        timestamp: Timestamp,
    },
    Members,
    IsMember {
        account: Account,
    },
    SetVerifyDays {
        days: u32,
        caller: Account,
    },
    SetReverifyDays {
        days: u32,
        caller: Account,
    },
    AdvanceClock {
        secs: u64,
    },
    SetClock {
        secs: u64,
    },
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Attestation(#[from] AttestationError),

    #[error("signing failed: {0}")]
    Signing(#[from] CryptoError),

    #[error("verify has no signature and no issuer key was given")]
    MissingSignature,

    #[error("malformed operation: {0}")]
    Malformed(String),
}

/// Counts reported at the end of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub failed: usize,
}

pub struct Replay {
    service: AttestationService,
    clock: Arc<NullClock>,
    signer: Option<IssuerKey>,
}

impl Replay {
    pub fn new(
        config: &ServiceConfig,
        start: Timestamp,
        signer: Option<IssuerKey>,
    ) -> Result<Self, ConfigError> {
        let clock = Arc::new(NullClock::new(start.as_secs()));
        let service = AttestationService::from_config(config, clock.clone())?;
        Ok(Self {
            service,
            clock,
            signer,
        })
    }

    pub fn service(&self) -> &AttestationService {
        &self.service
    }

    /// Apply one operation and describe its result as JSON.
    pub fn apply(&self, op: Op) -> Result<Value, ReplayError> {
        let value = match op {
            Op::Verify {
                account,
                identity_hash,
                timestamp,
                provider,
                signature,
            } => {
                let timestamp = timestamp.unwrap_or_else(|| self.service.now());
                let signature = match (signature, &self.signer) {
                    (Some(signature), _) => signature,
                    (None, Some(signer)) => {
                        signer.sign_proof(&account, &identity_hash, timestamp, &provider)?
                    }
                    (None, None) => return Err(ReplayError::MissingSignature),
                };
                let stamp = self.service.verify_address(
                    account,
                    identity_hash,
                    timestamp,
                    &provider,
                    &signature,
                )?;
                json!({ "stamp": stamp })
            }
            Op::Unverify { provider, caller } => {
                let removed = self.service.unverify(&provider, &caller)?;
                json!({ "removed": removed })
            }
            Op::Stamps { account } => json!({ "stamps": self.service.get_stamps(&account) }),
            Op::StampsAt { account, timestamp } => {
                json!({ "stamps": self.service.get_stamps_at(&account, timestamp) })
            }
            Op::Members => json!({ "members": self.service.get_all_members() }),
            Op::IsMember { account } => {
                json!({ "member": self.service.is_or_was_member(&account) })
            }
            Op::SetVerifyDays { days, caller } => {
                self.service.set_verify_day_threshold(days, &caller)?;
                json!({ "policy": self.service.policy() })
            }
            Op::SetReverifyDays { days, caller } => {
                self.service.set_reverify_threshold(days, &caller)?;
                json!({ "policy": self.service.policy() })
            }
            Op::AdvanceClock { secs } => {
                self.clock.advance(secs);
                json!({ "now": self.service.now() })
            }
            Op::SetClock { secs } => {
                self.clock.set(secs);
                json!({ "now": self.service.now() })
            }
        };
        Ok(value)
    }

    /// Run every line of `input`, writing one JSON result per operation.
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> std::io::Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();
        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let line_no = index + 1;
            let result = serde_json::from_str::<Op>(trimmed)
                .map_err(|e| ReplayError::Malformed(e.to_string()))
                .and_then(|op| self.apply(op));

            let record = match result {
                Ok(value) => {
                    summary.applied += 1;
                    json!({ "line": line_no, "ok": true, "result": value })
                }
                Err(err) => {
                    summary.failed += 1;
                    tracing::debug!(line = line_no, error = %err, "replay operation failed");
                    json!({ "line": line_no, "ok": false, "error": err.to_string() })
                }
            };
            writeln!(output, "{record}")?;
        }
        Ok(summary)
    }
}
