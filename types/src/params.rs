//! Policy parameters: the verification validity window and the reverification
//! cooldown, both in whole days.

use serde::{Deserialize, Serialize};

/// Owner-tunable policy values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyParams {
    /// Days a verification stays valid for point-in-time queries.
    pub verify_day_threshold: u32,

    /// Minimum days between two verifications for the same provider.
    pub reverify_day_threshold: u32,
}

impl PolicyParams {
    pub const DEFAULT_VERIFY_DAYS: u32 = 60;
    pub const DEFAULT_REVERIFY_DAYS: u32 = 30;

    pub fn new(verify_day_threshold: u32, reverify_day_threshold: u32) -> Self {
        Self {
            verify_day_threshold,
            reverify_day_threshold,
        }
    }

    /// Both thresholds must be positive.
    pub fn is_valid(&self) -> bool {
        self.verify_day_threshold > 0 && self.reverify_day_threshold > 0
    }
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VERIFY_DAYS, Self::DEFAULT_REVERIFY_DAYS)
    }
}

/// Which verify threshold a point-in-time query applies to a history entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// The threshold in force when the query runs, for every entry.
    #[default]
    QueryTime,
    /// The threshold that was in force when the entry was appended.
    VerificationTime,
}
