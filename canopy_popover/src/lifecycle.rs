// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The popover lifecycle state machine.
//!
//! A popover is always in exactly one [`Phase`]. [`Lifecycle`] owns the
//! phase and the queueing rule for re-entrant requests; it performs no
//! effects itself. The facade asks it to transition and carries out the
//! matching callbacks, animations, and monitor changes, so legality lives in
//! one place and is testable without a host.
//!
//! Transition rules:
//!
//! - `Closed` —show→ `Showing` —animation done→ `Shown`
//! - `Shown` —close→ `Closing` —animation done→ `Closed`
//! - `Shown` —detach→ `Detached`
//! - A show arriving during `Showing`/`Closing` is queued and applied after
//!   the in-flight animation completes; at most one animation runs at a time.
//! - A close arriving during `Showing` cancels the show in place and heads
//!   directly toward `Closing` (no double animation).
//! - A forced close reaches `Closed` from any phase, once.

/// Lifecycle phase of a popover instance.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Not visible; the initial and final phase.
    #[default]
    Closed,
    /// Show animation in flight.
    Showing,
    /// Visible and interactive; the event monitor is live.
    Shown,
    /// Close animation in flight.
    Closing,
    /// Content surface handed off to an independent window.
    Detached,
}

/// What the facade must do with a show request.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ShowDecision {
    /// Transitioned `Closed → Showing`: run the show effects.
    Begin,
    /// An animation is in flight; the request was queued.
    Queued,
    /// Already shown: treat the request as a reposition with new inputs.
    Reposition,
    /// Detached surfaces cannot be re-shown; nothing happened.
    Rejected,
}

/// What the facade must do with a close request.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CloseDecision {
    /// Transitioned `Shown → Closing`: run the close effects.
    Begin,
    /// Transitioned `Showing → Closing`: cancel the show animation in place,
    /// then run the close effects.
    CancelShow,
    /// Already closing, closed, or detached; nothing happened.
    Ignored,
}

/// Phase owner for one popover instance.
#[derive(Debug, Default)]
pub struct Lifecycle {
    phase: Phase,
    queued_show: bool,
}

impl Lifecycle {
    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True while interactive (monitors are live exactly then).
    pub fn is_shown(&self) -> bool {
        self.phase == Phase::Shown
    }

    /// Record a show request.
    pub fn request_show(&mut self) -> ShowDecision {
        match self.phase {
            Phase::Closed => {
                self.phase = Phase::Showing;
                ShowDecision::Begin
            }
            Phase::Showing | Phase::Closing => {
                self.queued_show = true;
                ShowDecision::Queued
            }
            Phase::Shown => ShowDecision::Reposition,
            Phase::Detached => ShowDecision::Rejected,
        }
    }

    /// The show animation completed.
    pub fn show_finished(&mut self) {
        debug_assert_eq!(self.phase, Phase::Showing, "show completion outside Showing");
        self.phase = Phase::Shown;
    }

    /// Record a close request. The close veto is the facade's business and
    /// must be consulted before calling this.
    pub fn request_close(&mut self) -> CloseDecision {
        match self.phase {
            Phase::Shown => {
                self.phase = Phase::Closing;
                CloseDecision::Begin
            }
            Phase::Showing => {
                self.phase = Phase::Closing;
                CloseDecision::CancelShow
            }
            Phase::Closing | Phase::Closed | Phase::Detached => CloseDecision::Ignored,
        }
    }

    /// The close animation completed. Returns true when a queued show must
    /// now be applied.
    pub fn close_finished(&mut self) -> bool {
        debug_assert_eq!(self.phase, Phase::Closing, "close completion outside Closing");
        self.phase = Phase::Closed;
        core::mem::take(&mut self.queued_show)
    }

    /// Take a show that was queued while the show animation itself ran; the
    /// facade applies it as a reposition once shown.
    pub fn take_queued_show(&mut self) -> bool {
        core::mem::take(&mut self.queued_show)
    }

    /// Record a detach request; only legal while shown.
    pub fn detach(&mut self) -> bool {
        if self.phase == Phase::Shown {
            self.phase = Phase::Detached;
            true
        } else {
            false
        }
    }

    /// Owner teardown: reach `Closed` immediately from any phase, dropping
    /// any queued request. Returns true when the did-close notification is
    /// still owed (exactly once per show/close cycle).
    pub fn force_close(&mut self) -> bool {
        self.queued_show = false;
        if self.phase == Phase::Closed {
            false
        } else {
            self.phase = Phase::Closed;
            true
        }
    }
}
