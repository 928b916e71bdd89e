// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The windowing collaborator seam.
//!
//! The engine owns no views and no windows. Everything platform-shaped is
//! reached through [`Host`]: screen/container/application bounds, resolving
//! a [`ViewId`] to its current screen-space frame, and taking the content
//! surface back on detach. A `ViewId` is a non-owning handle — the engine
//! never extends a view's lifetime, and a handle the host can no longer
//! resolve is exactly the "unresolvable anchor" error path.

use kurbo::Rect;

use crate::animation::AnimationRunner;
use crate::monitor::EventSource;

/// Non-owning handle to a host view (anchor, sender, or content surface).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ViewId(pub u64);

/// Platform capabilities a popover needs from its surroundings.
///
/// Implementations also provide event subscription ([`EventSource`]) and
/// animation scheduling ([`AnimationRunner`]); an in-memory fake implementing
/// all three is sufficient to drive the whole engine in tests.
pub trait Host: EventSource + AnimationRunner {
    /// Current screen-space frame of `view`, or `None` when the handle is no
    /// longer valid (view removed from its window).
    fn view_frame(&self, view: ViewId) -> Option<Rect>;
    /// Bounds of the screen the popover lives on.
    fn screen_bounds(&self) -> Rect;
    /// Bounds of the container the popover is confined to.
    fn container_bounds(&self) -> Rect;
    /// Frame of the host application's window.
    fn app_frame(&self) -> Rect;
    /// Take the content surface out of the popover window, transferring
    /// ownership to an independent window. Called exactly once per detach.
    fn detach_content(&mut self, content: ViewId);
}
