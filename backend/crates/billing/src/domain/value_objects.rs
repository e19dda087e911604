//! Domain Value Objects
//!
//! Immutable value types for the billing domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a transaction pays for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum TransactionKind {
    Odds = 0,
    Booking = 1,
    LiveSession = 2,
    Premium = 3,
}

impl TransactionKind {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            TransactionKind::Odds => "odds",
            TransactionKind::Booking => "booking",
            TransactionKind::LiveSession => "live_session",
            TransactionKind::Premium => "premium",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "odds" => Some(TransactionKind::Odds),
            "booking" => Some(TransactionKind::Booking),
            "live_session" => Some(TransactionKind::LiveSession),
            "premium" => Some(TransactionKind::Premium),
            _ => None,
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => TransactionKind::Odds,
            1 => TransactionKind::Booking,
            2 => TransactionKind::LiveSession,
            3 => TransactionKind::Premium,
            _ => {
                tracing::error!("Invalid TransactionKind id: {}", id);
                unreachable!("Invalid TransactionKind id: {}", id)
            }
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Review lifecycle state
///
/// Pending is the only non-terminal state; Approved and Rejected are
/// both terminal and a transaction makes that transition exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum ReviewStatus {
    #[default]
    Pending = 0,
    Approved = 1,
    Rejected = 2,
}

impl ReviewStatus {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(ReviewStatus::Pending),
            "approved" => Some(ReviewStatus::Approved),
            "rejected" => Some(ReviewStatus::Rejected),
            _ => None,
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => ReviewStatus::Pending,
            1 => ReviewStatus::Approved,
            2 => ReviewStatus::Rejected,
            _ => {
                tracing::error!("Invalid ReviewStatus id: {}", id);
                unreachable!("Invalid ReviewStatus id: {}", id)
            }
        }
    }

    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Odds tip category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i16)]
pub enum TipCategory {
    Crash = 0,
    Gems = 1,
    Mines = 2,
    Aviator = 3,
}

impl TipCategory {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            TipCategory::Crash => "crash",
            TipCategory::Gems => "gems",
            TipCategory::Mines => "mines",
            TipCategory::Aviator => "aviator",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "crash" => Some(TipCategory::Crash),
            "gems" => Some(TipCategory::Gems),
            "mines" => Some(TipCategory::Mines),
            "aviator" => Some(TipCategory::Aviator),
            _ => None,
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => TipCategory::Crash,
            1 => TipCategory::Gems,
            2 => TipCategory::Mines,
            3 => TipCategory::Aviator,
            _ => {
                tracing::error!("Invalid TipCategory id: {}", id);
                unreachable!("Invalid TipCategory id: {}", id)
            }
        }
    }
}

impl fmt::Display for TipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
