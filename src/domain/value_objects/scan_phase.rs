//! # Scan Phase
//!
//! History scan lifecycle state machine.
//!
//! # State Machine
//!
//! ```text
//! Idle → Scanning ─┬→ Completed
//!                  ├→ CallBudgetExhausted
//!                  ├→ TradeBudgetReached
//!                  ├→ KnownHashReached
//!                  ├→ TimeCutoffReached
//!                  └→ Failed
//! ```
//!
//! Every terminal phase except [`Failed`](ScanPhase::Failed) is a successful
//! completion with a recorded [`StopReason`].
//!
//! # Examples
//!
//! ```
//! use ledger_scan::domain::value_objects::scan_phase::ScanPhase;
//!
//! let phase = ScanPhase::Idle;
//! assert!(phase.can_transition_to(ScanPhase::Scanning));
//! assert!(!phase.can_transition_to(ScanPhase::Completed));
//! ```

use crate::domain::value_objects::enums::StopReason;
use serde::{Deserialize, Serialize};
use std::fmt;

/// History scan lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ScanPhase {
    /// Scan state initialised, no remote call made yet.
    #[default]
    Idle = 0,

    /// Pulling and resolving notifications.
    Scanning = 1,

    /// Feed exhausted (terminal).
    Completed = 2,

    /// Resolution call budget used up (terminal).
    CallBudgetExhausted = 3,

    /// Trade budget reached (terminal).
    TradeBudgetReached = 4,

    /// Stop hash or repeated hash reached (terminal).
    KnownHashReached = 5,

    /// Notification older than the cutoff reached (terminal).
    TimeCutoffReached = 6,

    /// Scan aborted by a fatal error or cancellation (terminal).
    Failed = 7,
}

impl ScanPhase {
    /// Returns true if this is a terminal phase.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Idle | Self::Scanning)
    }

    /// Returns true if this phase is a successful completion.
    #[inline]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.is_terminal() && !matches!(self, Self::Failed)
    }

    /// Returns true if this phase can transition to the target phase.
    ///
    /// - Idle → Scanning, Failed
    /// - Scanning → any terminal phase
    /// - Terminal phases → (none)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        match self {
            Self::Idle => matches!(target, Self::Scanning | Self::Failed),
            Self::Scanning => target.is_terminal(),
            _ => false,
        }
    }

    /// Returns the terminal phase recorded for a stop reason.
    #[must_use]
    pub const fn from_stop_reason(reason: StopReason) -> Self {
        match reason {
            StopReason::Completed => Self::Completed,
            StopReason::CallBudgetExhausted => Self::CallBudgetExhausted,
            StopReason::TradeBudgetReached => Self::TradeBudgetReached,
            StopReason::KnownHashReached => Self::KnownHashReached,
            StopReason::TimeCutoffReached => Self::TimeCutoffReached,
        }
    }

    /// Returns the stop reason of a successful terminal phase.
    #[must_use]
    pub const fn stop_reason(&self) -> Option<StopReason> {
        match self {
            Self::Completed => Some(StopReason::Completed),
            Self::CallBudgetExhausted => Some(StopReason::CallBudgetExhausted),
            Self::TradeBudgetReached => Some(StopReason::TradeBudgetReached),
            Self::KnownHashReached => Some(StopReason::KnownHashReached),
            Self::TimeCutoffReached => Some(StopReason::TimeCutoffReached),
            Self::Idle | Self::Scanning | Self::Failed => None,
        }
    }
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Scanning => write!(f, "SCANNING"),
            Self::Failed => write!(f, "FAILED"),
            other => match other.stop_reason() {
                Some(reason) => write!(f, "{reason}"),
                None => Ok(()),
            },
        }
    }
}
