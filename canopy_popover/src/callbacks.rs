// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owner-supplied lifecycle callbacks.
//!
//! Each slot holds at most one closure and is invoked synchronously at its
//! transition point, at most once per transition, always in will → effect →
//! did order. Slots are replaced through the facade's setters; because the
//! facade is mutably borrowed while a callback runs, re-registering a slot
//! from inside its own invocation is a borrow error rather than a runtime
//! rule.

/// A single optional callback slot.
type Slot = Option<Box<dyn FnMut()>>;

/// The full callback set for one popover instance.
#[derive(Default)]
pub struct Callbacks {
    /// Before the show animation starts.
    pub will_show: Slot,
    /// After the show animation completes.
    pub did_show: Slot,
    /// Consulted before a user- or event-triggered close; returning false
    /// vetoes the close. Never consulted on forced teardown.
    pub should_close: Option<Box<dyn FnMut() -> bool>>,
    /// Before the close animation starts.
    pub will_close: Slot,
    /// After the close completes (exactly once per show/close cycle, forced
    /// teardown included).
    pub did_close: Slot,
    /// Before a reposition takes visual effect.
    pub will_move: Slot,
    /// After a reposition settles.
    pub did_move: Slot,
    /// Before the content surface leaves the popover window.
    pub will_detach: Slot,
    /// After the content surface ownership transferred.
    pub did_detach: Slot,
}

impl Callbacks {
    pub(crate) fn will_show(&mut self) {
        fire(&mut self.will_show);
    }

    pub(crate) fn did_show(&mut self) {
        fire(&mut self.did_show);
    }

    /// True unless a veto callback is present and returns false.
    pub(crate) fn should_close(&mut self) -> bool {
        self.should_close.as_mut().is_none_or(|f| f())
    }

    pub(crate) fn will_close(&mut self) {
        fire(&mut self.will_close);
    }

    pub(crate) fn did_close(&mut self) {
        fire(&mut self.did_close);
    }

    pub(crate) fn will_move(&mut self) {
        fire(&mut self.will_move);
    }

    pub(crate) fn did_move(&mut self) {
        fire(&mut self.did_move);
    }

    pub(crate) fn will_detach(&mut self) {
        fire(&mut self.will_detach);
    }

    pub(crate) fn did_detach(&mut self) {
        fire(&mut self.did_detach);
    }
}

fn fire(slot: &mut Slot) {
    if let Some(f) = slot.as_mut() {
        f();
    }
}

impl core::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Callbacks")
            .field("will_show", &self.will_show.is_some())
            .field("did_show", &self.did_show.is_some())
            .field("should_close", &self.should_close.is_some())
            .field("will_close", &self.will_close.is_some())
            .field("did_close", &self.did_close.is_some())
            .field("will_move", &self.will_move.is_some())
            .field("did_move", &self.did_move.is_some())
            .field("will_detach", &self.will_detach.is_some())
            .field("did_detach", &self.did_detach.is_some())
            .finish()
    }
}
