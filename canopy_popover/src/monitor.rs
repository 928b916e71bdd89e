// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outside-interaction monitoring.
//!
//! While a popover is shown it observes mouse, key, and application-state
//! events plus anchor/container frame changes, and translates each into a
//! [`Reaction`]: dismiss, reposition, or ignore. Classification is a pure
//! function of the event, the current frame, the container bounds, and the
//! active [`DismissPolicy`], so it is testable without any real event hooks.
//!
//! Subscription bookkeeping lives in [`Monitor`]: registration happens on
//! entering the shown phase and deregistration on leaving it, and the pair
//! is idempotent so no observation can leak past a close, detach, or forced
//! teardown.

use kurbo::{Point, Rect};

use canopy_placement::containment::contains;

/// Token returned by [`EventSource::subscribe`], required to unsubscribe.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubscriptionToken(pub u64);

/// Abstract source of global/local UI events.
///
/// Production hosts bridge platform event monitors; tests inject
/// [`UiEvent`]s synchronously into the popover and only count the
/// subscribe/unsubscribe pairing here.
pub trait EventSource {
    /// Start delivering popover-relevant events.
    fn subscribe(&mut self) -> SubscriptionToken;
    /// Stop delivering events for `token`.
    fn unsubscribe(&mut self, token: SubscriptionToken);
}

/// An observed event, already normalized to screen space by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// Mouse-down anywhere (global or local monitor).
    MouseDown {
        /// Screen-space pointer position.
        position: Point,
    },
    /// A key event reached the application while the popover was shown.
    KeyDown,
    /// The popover surface stopped being the key window.
    PopoverResignedKey,
    /// The application resigned active status.
    AppResignedActive,
    /// The host application's window was resized.
    AppResized,
    /// The anchor view's frame changed (scroll, layout, window move).
    AnchorFrameChanged,
    /// The container's frame changed.
    ContainerFrameChanged,
}

bitflags::bitflags! {
    /// Which observations dismiss the popover rather than reposition it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DismissPolicy: u8 {
        /// Close when the popover surface resigns key.
        const ON_RESIGN_KEY      = 0b0000_0001;
        /// Close when the application becomes inactive.
        const ON_APP_INACTIVE    = 0b0000_0010;
        /// Close when the application window resizes.
        const ON_APP_RESIZE      = 0b0000_0100;
        /// Close when the popover frame no longer lies inside the container.
        const OUTSIDE_CONTAINER  = 0b0000_1000;
        /// Close on any mouse/key interaction outside the popover frame.
        const ON_EVENT           = 0b0001_0000;
    }
}

impl Default for DismissPolicy {
    fn default() -> Self {
        Self::ON_EVENT
    }
}

/// What the lifecycle should do with an observed event.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Reaction {
    /// Request the closing transition (still subject to the close veto).
    Dismiss,
    /// Recompute placement and move the surface.
    Reposition,
    /// Nothing to do.
    Ignore,
}

/// Translate one event into a [`Reaction`] under `policy`.
///
/// `frame` is the popover's current frame and `container` the container
/// bounds, both in screen space.
pub fn classify(event: UiEvent, frame: Rect, container: Rect, policy: DismissPolicy) -> Reaction {
    match event {
        UiEvent::MouseDown { position } => {
            if frame.contains(position) {
                Reaction::Ignore
            } else if policy.contains(DismissPolicy::ON_EVENT) {
                Reaction::Dismiss
            } else {
                Reaction::Ignore
            }
        }
        UiEvent::KeyDown => {
            if policy.contains(DismissPolicy::ON_EVENT) {
                Reaction::Dismiss
            } else {
                Reaction::Ignore
            }
        }
        UiEvent::PopoverResignedKey => {
            if policy.contains(DismissPolicy::ON_RESIGN_KEY) {
                Reaction::Dismiss
            } else {
                Reaction::Ignore
            }
        }
        UiEvent::AppResignedActive => {
            if policy.contains(DismissPolicy::ON_APP_INACTIVE) {
                Reaction::Dismiss
            } else {
                Reaction::Ignore
            }
        }
        UiEvent::AppResized => {
            if policy.contains(DismissPolicy::ON_APP_RESIZE) {
                Reaction::Dismiss
            } else {
                Reaction::Reposition
            }
        }
        UiEvent::AnchorFrameChanged | UiEvent::ContainerFrameChanged => {
            if policy.contains(DismissPolicy::OUTSIDE_CONTAINER) && !contains(container, frame) {
                Reaction::Dismiss
            } else {
                Reaction::Reposition
            }
        }
    }
}

/// Subscription bookkeeping for one popover instance.
///
/// Holds at most one live token. `register`/`unregister` are idempotent, so
/// the shown-phase invariant (count is 1 while shown, 0 otherwise) holds for
/// any sequence of show/close/detach/teardown calls.
#[derive(Debug, Default)]
pub struct Monitor {
    token: Option<SubscriptionToken>,
}

impl Monitor {
    /// Subscribe if not already subscribed.
    pub fn register(&mut self, source: &mut impl EventSource) {
        if self.token.is_none() {
            self.token = Some(source.subscribe());
            tracing::debug!("event monitor registered");
        }
    }

    /// Unsubscribe if subscribed.
    pub fn unregister(&mut self, source: &mut impl EventSource) {
        if let Some(token) = self.token.take() {
            source.unsubscribe(token);
            tracing::debug!("event monitor unregistered");
        }
    }

    /// Whether a subscription is currently live.
    pub fn is_registered(&self) -> bool {
        self.token.is_some()
    }
}
