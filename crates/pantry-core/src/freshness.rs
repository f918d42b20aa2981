//! Display-time freshness derived from a stored expiry date
//!
//! The reference date is supplied by the caller (normally today's wall-clock
//! date), so a stored prediction stays fixed while its "days left" moves.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Items with at most this many days left count as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessStatus {
    Good,
    Expiring,
    Expired,
}

impl FreshnessStatus {
    pub fn from_days_left(days_left: i64) -> Self {
        if days_left < 0 {
            Self::Expired
        } else if days_left <= EXPIRING_SOON_DAYS {
            Self::Expiring
        } else {
            Self::Good
        }
    }
}

/// Whole calendar days from `today` until `expiry`; negative once past.
pub fn days_left(expiry: NaiveDate, today: NaiveDate) -> i64 {
    expiry.signed_duration_since(today).num_days()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Freshness {
    pub expiry: NaiveDate,
    pub days_left: i64,
    pub status: FreshnessStatus,
}

impl Freshness {
    pub fn assess(expiry: NaiveDate, today: NaiveDate) -> Self {
        let days_left = days_left(expiry, today);
        Self {
            expiry,
            days_left,
            status: FreshnessStatus::from_days_left(days_left),
        }
    }

    pub fn expiring_soon(&self) -> bool {
        self.status == FreshnessStatus::Expiring
    }
}
