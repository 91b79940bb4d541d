//! The tunable policy parameters.

use attest_types::PolicyParams;

/// Every parameter the owner can change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolicyParam {
    VerifyDayThreshold,
    ReverifyDayThreshold,
}

impl PolicyParam {
    pub const ALL: [PolicyParam; 2] = [Self::VerifyDayThreshold, Self::ReverifyDayThreshold];

    /// Name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::VerifyDayThreshold => "verify_day_threshold",
            Self::ReverifyDayThreshold => "reverify_day_threshold",
        }
    }

    pub fn get(&self, params: &PolicyParams) -> u32 {
        match self {
            Self::VerifyDayThreshold => params.verify_day_threshold,
            Self::ReverifyDayThreshold => params.reverify_day_threshold,
        }
    }

    pub(crate) fn set(&self, params: &mut PolicyParams, value: u32) {
        match self {
            Self::VerifyDayThreshold => params.verify_day_threshold = value,
            Self::ReverifyDayThreshold => params.reverify_day_threshold = value,
        }
    }
}
