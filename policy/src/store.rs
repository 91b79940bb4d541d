//! The policy store: current parameters plus the owner allowed to change them.

use crate::error::PolicyError;
use crate::param::PolicyParam;
use attest_types::{Account, PolicyParams};

/// Holds the live policy values. No history is kept.
#[derive(Clone, Debug)]
pub struct PolicyStore {
    owner: Account,
    params: PolicyParams,
}

impl PolicyStore {
    /// Create a store, rejecting non-positive initial values.
    pub fn new(owner: Account, params: PolicyParams) -> Result<Self, PolicyError> {
        for param in PolicyParam::ALL {
            check_positive(param, param.get(&params))?;
        }
        Ok(Self { owner, params })
    }

    pub fn owner(&self) -> Account {
        self.owner
    }

    pub fn params(&self) -> PolicyParams {
        self.params
    }

    pub fn verify_window_days(&self) -> u32 {
        self.params.verify_day_threshold
    }

    pub fn reverify_window_days(&self) -> u32 {
        self.params.reverify_day_threshold
    }

    pub fn set_verify_window_days(
        &mut self,
        days: u32,
        caller: &Account,
    ) -> Result<(), PolicyError> {
        self.set(PolicyParam::VerifyDayThreshold, days, caller)
    }

    pub fn set_reverify_window_days(
        &mut self,
        days: u32,
        caller: &Account,
    ) -> Result<(), PolicyError> {
        self.set(PolicyParam::ReverifyDayThreshold, days, caller)
    }

    /// Change one parameter. The owner check runs before value validation.
    pub fn set(
        &mut self,
        param: PolicyParam,
        days: u32,
        caller: &Account,
    ) -> Result<(), PolicyError> {
        if *caller != self.owner {
            tracing::warn!(
                caller = %caller,
                param = param.name(),
                "unauthorized policy change attempt"
            );
            return Err(PolicyError::Unauthorized { caller: *caller });
        }
        check_positive(param, days)?;

        let old = param.get(&self.params);
        param.set(&mut self.params, days);
        tracing::info!(param = param.name(), old, new = days, "policy parameter changed");
        Ok(())
    }
}

fn check_positive(param: PolicyParam, value: u32) -> Result<(), PolicyError> {
    if value == 0 {
        return Err(PolicyError::InvalidParameter {
            param: param.name(),
            value,
        });
    }
    Ok(())
}
