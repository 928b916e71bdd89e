// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The popover facade.
//!
//! [`Popover`] composes placement, lifecycle, callbacks, and monitoring into
//! the one public surface. A show or update request flows through the
//! placement crate for a frame, through [`crate::lifecycle::Lifecycle`] for
//! legality, and out to the [`Host`] for animation; completion and observed
//! events flow back in through [`Popover::animation_finished`] and
//! [`Popover::handle_event`]. Everything runs on the main thread; nothing
//! here blocks.
//!
//! The window-backed variant is the same type with a different surface
//! parameter: window-only operations exist only on
//! [`WindowPopover`], so misuse is a compile error rather than a runtime
//! check.

use kurbo::{Rect, Size, Vec2};

use canopy_placement::arrow::{ArrowDescriptor, arrow_anchor};
use canopy_placement::containment::{clamp_into, contains, fit};
use canopy_placement::resolve::{manual_anchor, resolve_auto};
use canopy_placement::{Edge, Placement, PlacementFlags, RelativePosition};

use crate::animation::{AnimationBehaviour, AnimationId, AnimationMotion, AnimationSpec};
use crate::callbacks::Callbacks;
use crate::host::{Host, ViewId};
use crate::lifecycle::{CloseDecision, Lifecycle, Phase, ShowDecision};
use crate::monitor::{DismissPolicy, Monitor, Reaction, UiEvent, classify};

/// Marker for the backing surface of a popover.
///
/// Implemented by [`ViewSurface`] and [`WindowSurface`]; window-only
/// operations are only reachable through the latter.
pub trait SurfaceKind {}

/// A popover hosted as a child view of the parent window.
#[derive(Copy, Clone, Debug, Default)]
pub struct ViewSurface;

impl SurfaceKind for ViewSurface {}

/// A popover hosted in its own borderless window.
#[derive(Copy, Clone, Debug, Default)]
pub struct WindowSurface {
    /// Window level of the popover window.
    pub level: i32,
    /// Whether the popover window may become key.
    pub can_become_key: bool,
    /// Make the window key and order it front right after displaying.
    pub becomes_key_after_displaying: bool,
    /// Keep the popover floating when the application resigns active.
    pub floats_when_app_resigns_active: bool,
}

impl SurfaceKind for WindowSurface {}

/// Window-backed popover.
pub type WindowPopover<H> = Popover<H, WindowSurface>;

/// A show request that could not be honored.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShowError {
    /// The anchor view is no longer resolvable to a window; no transition
    /// happened and no callbacks fired.
    #[error("anchor view cannot be resolved to a window")]
    AnchorUnresolved,
}

/// Which transition the in-flight animation belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ActiveKind {
    Show,
    Close,
    Move,
}

/// How the reference rectangle is derived.
#[derive(Copy, Clone, Debug, PartialEq)]
enum AnchorMode {
    /// Sticking-rect mode: the anchor view's frame (optionally a sub-rect of
    /// it) is the reference.
    Sticking {
        /// Rect in the anchor view's local space, when narrower than the
        /// whole view.
        local_rect: Option<Rect>,
    },
    /// Given-rect mode: a caller-supplied screen-space rect is the
    /// reference, collapsed per the relative position.
    GivenRect {
        rect: Rect,
        position: RelativePosition,
    },
    /// Alert style: centered over a presenting window (window variant).
    CenteredOver(ViewId),
}

/// Transient overlay surface positioned relative to an anchor.
///
/// Owns its lifecycle, monitor, and callback set; reaches the platform only
/// through `H`. One instance, one anchor, one surface.
pub struct Popover<H: Host, S: SurfaceKind = ViewSurface> {
    host: H,
    surface: S,
    lifecycle: Lifecycle,
    monitor: Monitor,
    callbacks: Callbacks,

    // Positioning inputs.
    anchor_view: Option<ViewId>,
    sender: Option<ViewId>,
    mode: AnchorMode,
    positioning_override: Option<Rect>,
    edge: Edge,
    content_view: Option<ViewId>,
    content_size: Size,

    // Policy and appearance-adjacent configuration.
    /// Containment policy applied on every placement pass.
    pub flags: PlacementFlags,
    /// Which observed events dismiss rather than reposition.
    pub dismissal: DismissPolicy,
    /// Animate show/close/move transitions.
    pub animated: bool,
    /// Animation configuration used when `animated` is set.
    pub animation: AnimationSpec,
    /// Let the user drag the surface (consumed by the host's renderer).
    pub is_movable: bool,
    /// Allow detaching the content into an independent window.
    pub is_detachable: bool,
    /// Draw an anchor arrow on the body's touching edge.
    pub should_show_arrow: bool,
    /// Arrow breadth (along the edge) and protrusion depth.
    pub arrow_size: Size,
    /// Cap on the content height applied before placement.
    pub max_height: Option<f64>,
    /// Extra offset pushing `MinY` placements further from the anchor.
    pub bottom_offset: f64,
    /// Caller bookkeeping tag.
    pub tag: i64,

    // Derived, never persisted across show/close cycles.
    placement: Option<Placement>,
    active: Option<(AnimationId, ActiveKind)>,
}

impl<H: Host> Popover<H> {
    /// Create a view-backed popover for content of the given natural size.
    pub fn new(host: H, content_size: Size) -> Self {
        Self::with_surface(host, content_size, ViewSurface)
    }
}

impl<H: Host> WindowPopover<H> {
    /// Create a window-backed popover for content of the given natural size.
    pub fn new_window(host: H, content_size: Size) -> Self {
        Self::with_surface(host, content_size, WindowSurface::default())
    }

    /// Window level for the popover window.
    pub fn set_level(&mut self, level: i32) {
        self.surface.level = level;
    }

    /// Allow the popover window to become key.
    pub fn set_can_become_key(&mut self, value: bool) {
        self.surface.can_become_key = value;
    }

    /// Make the window key and order it front right after displaying.
    pub fn set_becomes_key_after_displaying(&mut self, value: bool) {
        self.surface.becomes_key_after_displaying = value;
    }

    /// Keep the popover floating when the application resigns active.
    pub fn set_floats_when_app_resigns_active(&mut self, value: bool) {
        self.surface.floats_when_app_resigns_active = value;
    }

    /// Window-only surface configuration.
    pub fn window_surface(&self) -> &WindowSurface {
        &self.surface
    }

    /// Present as an alert over `presenting`: centered in its frame, no
    /// arrow, repositioning tracks the presenting window.
    pub fn show_as_alert(&mut self, presenting: ViewId) -> Result<(), ShowError> {
        self.host
            .view_frame(presenting)
            .ok_or(ShowError::AnchorUnresolved)?;
        self.should_show_arrow = false;
        self.anchor_view = Some(presenting);
        self.sender = Some(presenting);
        self.mode = AnchorMode::CenteredOver(presenting);
        self.request_show()
    }
}

impl<H: Host, S: SurfaceKind> Popover<H, S> {
    fn with_surface(host: H, content_size: Size, surface: S) -> Self {
        Self {
            host,
            surface,
            lifecycle: Lifecycle::default(),
            monitor: Monitor::default(),
            callbacks: Callbacks::default(),
            anchor_view: None,
            sender: None,
            mode: AnchorMode::Sticking { local_rect: None },
            positioning_override: None,
            edge: Edge::MaxY,
            content_view: None,
            content_size,
            flags: PlacementFlags::default(),
            dismissal: DismissPolicy::default(),
            animated: true,
            animation: AnimationSpec::default(),
            is_movable: false,
            is_detachable: false,
            should_show_arrow: false,
            arrow_size: Size::new(16.0, 8.0),
            max_height: None,
            bottom_offset: 0.0,
            tag: 0,
            placement: None,
            active: None,
        }
    }

    // ---- Public show/close surface -------------------------------------

    /// Sticking-rect mode: show relative to `rect` (in `view`'s local
    /// space) against `edge` of the view.
    pub fn show_relative_to_rect(
        &mut self,
        rect: Rect,
        view: ViewId,
        edge: Edge,
    ) -> Result<(), ShowError> {
        self.anchor_view = Some(view);
        self.sender = Some(view);
        self.mode = AnchorMode::Sticking {
            local_rect: Some(rect),
        };
        self.edge = edge;
        self.request_show()
    }

    /// Given-rect mode: show at `rect` (already in screen space). `sender`
    /// identifies the triggering control and may differ from `view`; with
    /// [`RelativePosition::Automatic`] the edge is chosen by available
    /// space before falling back to `edge`.
    pub fn show_at(
        &mut self,
        view: ViewId,
        rect: Rect,
        sender: ViewId,
        position: RelativePosition,
        edge: Edge,
    ) -> Result<(), ShowError> {
        self.anchor_view = Some(view);
        self.sender = Some(sender);
        self.mode = AnchorMode::GivenRect { rect, position };
        self.edge = edge;
        self.request_show()
    }

    /// Request the closing transition, subject to the close veto.
    pub fn close(&mut self) {
        match self.lifecycle.phase() {
            Phase::Shown => {
                if !self.callbacks.should_close() {
                    tracing::debug!("close vetoed; staying shown");
                    return;
                }
                let decision = self.lifecycle.request_close();
                debug_assert_eq!(decision, CloseDecision::Begin, "close from Shown must begin");
                self.begin_close_effects();
            }
            Phase::Showing => {
                // Cancel the show in place; no double animation.
                if let Some((id, ActiveKind::Show)) = self.active.take() {
                    self.host.cancel(id);
                }
                let decision = self.lifecycle.request_close();
                debug_assert_eq!(decision, CloseDecision::CancelShow, "close from Showing cancels");
                self.begin_close_effects();
            }
            Phase::Closing | Phase::Closed | Phase::Detached => {}
        }
    }

    /// Owner teardown: reach `Closed` immediately, cancel any in-flight
    /// animation, and drop the monitor. Fires did-close exactly once per
    /// cycle; the veto is never consulted.
    pub fn force_close(&mut self) {
        if let Some((id, _)) = self.active.take() {
            self.host.cancel(id);
        }
        self.monitor.unregister(&mut self.host);
        if self.lifecycle.force_close() {
            tracing::debug!("forced close");
            self.placement = None;
            self.callbacks.did_close();
        }
    }

    /// Detach the content surface into an independent window. No-op unless
    /// detachable and currently shown.
    pub fn detach(&mut self) {
        if !self.is_detachable || !self.lifecycle.is_shown() {
            return;
        }
        // A reposition may still be animating; settle it first.
        if let Some((id, ActiveKind::Move)) = self.active.take() {
            self.host.cancel(id);
            self.callbacks.did_move();
        }
        self.callbacks.will_detach();
        self.monitor.unregister(&mut self.host);
        let detached = self.lifecycle.detach();
        debug_assert!(detached, "detach precondition checked above");
        if let Some(content) = self.content_view {
            self.host.detach_content(content);
        }
        tracing::debug!("detached");
        self.callbacks.did_detach();
    }

    // ---- Inputs that trigger recomputation -----------------------------

    /// Swap the displayed content view; its current frame supplies the new
    /// natural size. Repositions while shown.
    pub fn set_content_view(&mut self, view: ViewId) {
        self.content_view = Some(view);
        if let Some(frame) = self.host.view_frame(view) {
            self.content_size = frame.size();
        }
        self.update_frame();
    }

    /// Re-arrange for a new content size.
    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
        self.update_frame();
    }

    /// Override the reference rectangle (screen space) without changing the
    /// anchor view.
    pub fn set_positioning_rect(&mut self, rect: Rect) {
        self.positioning_override = Some(rect);
        self.update_frame();
    }

    /// Re-anchor to `view` against `edge`, optionally to a sub-rect of the
    /// view's local space.
    pub fn set_positioning_view(&mut self, view: ViewId, edge: Edge, rect: Option<Rect>) {
        self.anchor_view = Some(view);
        self.sender = Some(view);
        self.mode = AnchorMode::Sticking { local_rect: rect };
        self.edge = edge;
        self.positioning_override = None;
        self.update_frame();
    }

    /// Configure the animation in one call.
    pub fn set_animation(
        &mut self,
        behaviour: AnimationBehaviour,
        motion: AnimationMotion,
        animated_in_app_frame: bool,
    ) {
        self.animation.behaviour = behaviour;
        self.animation.motion = motion;
        self.animation.animated_in_app_frame = animated_in_app_frame;
    }

    /// Recompute placement and move the surface if it changed. Only acts
    /// while shown; reposition callbacks never interleave a show/close
    /// transition. An anchor that can no longer be resolved dismisses the
    /// popover instead of leaving a stale frame on screen.
    pub fn update_frame(&mut self) {
        if !self.lifecycle.is_shown() {
            return;
        }
        let Ok(new_placement) = self.compute_placement() else {
            tracing::debug!("anchor unresolvable; dismissing");
            self.close();
            return;
        };
        if self.placement == Some(new_placement) {
            return;
        }
        // Settle a still-running move before starting the next one.
        if let Some((id, ActiveKind::Move)) = self.active.take() {
            self.host.cancel(id);
            self.callbacks.did_move();
        }
        let old = self.placement.map_or(new_placement.frame, |p| p.frame);
        tracing::trace!(?new_placement, "repositioning");
        self.callbacks.will_move();
        self.placement = Some(new_placement);
        if self.animated {
            let id = self.host.begin(&self.animation, old, new_placement.frame);
            self.active = Some((id, ActiveKind::Move));
        } else {
            self.callbacks.did_move();
        }
    }

    // ---- Host-driven inputs --------------------------------------------

    /// Report completion of the animation `id`. Stale or unknown ids are
    /// ignored.
    pub fn animation_finished(&mut self, id: AnimationId) {
        match self.active {
            Some((active, kind)) if active == id => {
                self.active = None;
                match kind {
                    ActiveKind::Show => self.finish_show(),
                    ActiveKind::Close => self.finish_close(),
                    ActiveKind::Move => self.callbacks.did_move(),
                }
            }
            _ => {}
        }
    }

    /// Feed one observed event through the dismissal policy. Only acts
    /// while shown (the monitor is only registered then).
    pub fn handle_event(&mut self, event: UiEvent) {
        if !self.lifecycle.is_shown() {
            return;
        }
        let Some(placement) = self.placement else {
            return;
        };
        let container = self.host.container_bounds();
        let reaction = classify(event, placement.frame, container, self.dismissal);
        tracing::trace!(?event, ?reaction, "monitor event");
        match reaction {
            Reaction::Dismiss => self.close(),
            Reaction::Reposition => self.update_frame(),
            Reaction::Ignore => {}
        }
    }

    // ---- Callback registration -----------------------------------------

    /// Called before the show animation starts.
    pub fn on_will_show(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.will_show = Some(Box::new(f));
    }

    /// Called once shown.
    pub fn on_did_show(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.did_show = Some(Box::new(f));
    }

    /// Consulted before a user/event close; return false to veto.
    pub fn on_should_close(&mut self, f: impl FnMut() -> bool + 'static) {
        self.callbacks.should_close = Some(Box::new(f));
    }

    /// Called before the close animation starts.
    pub fn on_will_close(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.will_close = Some(Box::new(f));
    }

    /// Called once closed (exactly once per show/close cycle).
    pub fn on_did_close(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.did_close = Some(Box::new(f));
    }

    /// Called before a reposition takes effect.
    pub fn on_will_move(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.will_move = Some(Box::new(f));
    }

    /// Called after a reposition settles.
    pub fn on_did_move(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.did_move = Some(Box::new(f));
    }

    /// Called before detaching the content surface.
    pub fn on_will_detach(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.will_detach = Some(Box::new(f));
    }

    /// Called after the content surface transferred.
    pub fn on_did_detach(&mut self, f: impl FnMut() + 'static) {
        self.callbacks.did_detach = Some(Box::new(f));
    }

    // ---- Accessors ------------------------------------------------------

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    /// True while interactive.
    pub fn is_shown(&self) -> bool {
        self.lifecycle.is_shown()
    }

    /// Current frame, while a placement exists.
    pub fn frame(&self) -> Option<Rect> {
        self.placement.map(|p| p.frame)
    }

    /// Resolved edge of the current placement.
    pub fn resolved_edge(&self) -> Option<Edge> {
        self.placement.map(|p| p.edge)
    }

    /// Arrow descriptor for the current placement, when arrows are enabled.
    pub fn arrow(&self) -> Option<ArrowDescriptor> {
        if !self.should_show_arrow {
            return None;
        }
        let placement = self.placement?;
        let reference = self.reference_rect()?;
        Some(arrow_anchor(placement, reference, self.arrow_size))
    }

    /// The control that triggered the show, when one was recorded.
    pub fn sender(&self) -> Option<ViewId> {
        self.sender
    }

    /// Whether the event monitor currently holds a live subscription.
    pub fn is_monitoring(&self) -> bool {
        self.monitor.is_registered()
    }

    /// The host collaborator.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host collaborator.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // ---- Internals ------------------------------------------------------

    fn request_show(&mut self) -> Result<(), ShowError> {
        // Validate the anchor before any transition: a rejected show fires
        // no callbacks and changes no state.
        let placement = self.compute_placement()?;
        match self.lifecycle.request_show() {
            ShowDecision::Begin => {
                tracing::debug!(frame = ?placement.frame, edge = ?placement.edge, "showing");
                self.placement = Some(placement);
                self.callbacks.will_show();
                if self.animated {
                    let from = self
                        .animation
                        .start_frame(placement.frame, self.motion_bounds());
                    let id = self.host.begin(&self.animation, from, placement.frame);
                    self.active = Some((id, ActiveKind::Show));
                } else {
                    self.finish_show();
                }
                Ok(())
            }
            ShowDecision::Queued => Ok(()),
            ShowDecision::Reposition => {
                self.update_frame();
                Ok(())
            }
            ShowDecision::Rejected => Ok(()),
        }
    }

    fn finish_show(&mut self) {
        self.lifecycle.show_finished();
        self.monitor.register(&mut self.host);
        tracing::debug!("shown");
        self.callbacks.did_show();
        // A show queued behind the animation carries new inputs.
        if self.lifecycle.take_queued_show() {
            self.update_frame();
        }
    }

    fn begin_close_effects(&mut self) {
        // A reposition may still be animating; settle it before closing so
        // at most one animation runs and every will-move has its did-move.
        if let Some((id, ActiveKind::Move)) = self.active.take() {
            self.host.cancel(id);
            self.callbacks.did_move();
        }
        self.callbacks.will_close();
        self.monitor.unregister(&mut self.host);
        let frame = self.placement.map_or(Rect::ZERO, |p| p.frame);
        if self.animated {
            // Close retraces the show motion.
            let to = self.animation.start_frame(frame, self.motion_bounds());
            let id = self.host.begin(&self.animation, frame, to);
            self.active = Some((id, ActiveKind::Close));
        } else {
            self.finish_close();
        }
    }

    fn finish_close(&mut self) {
        let queued = self.lifecycle.close_finished();
        self.placement = None;
        tracing::debug!("closed");
        self.callbacks.did_close();
        if queued && let Err(err) = self.request_show() {
            tracing::warn!(%err, "queued show dropped");
        }
    }

    fn motion_bounds(&self) -> Rect {
        if self.animation.animated_in_app_frame {
            self.host.app_frame()
        } else {
            self.host.screen_bounds()
        }
    }

    /// The reference rectangle in screen space, or `None` when the anchor
    /// is unresolvable.
    fn reference_rect(&self) -> Option<Rect> {
        if let Some(rect) = self.positioning_override {
            return Some(rect);
        }
        match self.mode {
            AnchorMode::Sticking { local_rect } => {
                let frame = self.host.view_frame(self.anchor_view?)?;
                Some(match local_rect {
                    Some(local) => local + frame.origin().to_vec2(),
                    None => frame,
                })
            }
            AnchorMode::GivenRect { rect, position } => {
                // The anchor view must still be alive even though the rect
                // stands in for its bounds.
                self.host.view_frame(self.anchor_view?)?;
                Some(manual_anchor(rect, position))
            }
            AnchorMode::CenteredOver(window) => self.host.view_frame(window),
        }
    }

    fn compute_placement(&self) -> Result<Placement, ShowError> {
        let reference = self.reference_rect().ok_or(ShowError::AnchorUnresolved)?;
        let content = self.effective_content_size();
        let container = self.host.container_bounds();
        let screen = self.host.screen_bounds();

        if let AnchorMode::CenteredOver(_) = self.mode {
            return Ok(Placement {
                frame: Rect::from_center_size(reference.center(), content),
                edge: Edge::MaxY,
            });
        }

        let edge = match self.mode {
            AnchorMode::GivenRect {
                position: RelativePosition::Automatic,
                ..
            } => {
                let bound = if self.flags.contains(PlacementFlags::STAYS_IN_CONTAINER) {
                    container
                } else {
                    screen
                };
                resolve_auto(reference, bound, content).edge
            }
            _ => self.edge,
        };

        let mut placement = fit(reference, edge, content, self.flags, container, screen);
        if placement.edge == Edge::MinY && self.bottom_offset != 0.0 {
            let shifted = placement.frame + Vec2::new(0.0, -self.bottom_offset);
            // The offset must not undo a containment the fit just achieved.
            placement.frame = match self.active_bound(container, screen) {
                Some(bound) if contains(bound, placement.frame) => clamp_into(shifted, bound),
                _ => shifted,
            };
        }
        Ok(placement)
    }

    /// The bound containment is enforced against, or `None` when neither
    /// stays-in flag is set.
    fn active_bound(&self, container: Rect, screen: Rect) -> Option<Rect> {
        if self.flags.contains(PlacementFlags::STAYS_IN_CONTAINER) {
            Some(container)
        } else if self.flags.contains(PlacementFlags::STAYS_IN_SCREEN) {
            Some(screen)
        } else {
            None
        }
    }

    fn effective_content_size(&self) -> Size {
        let height = match self.max_height {
            Some(max) => self.content_size.height.min(max),
            None => self.content_size.height,
        };
        Size::new(self.content_size.width, height)
    }
}

impl<H: Host, S: SurfaceKind + core::fmt::Debug> core::fmt::Debug for Popover<H, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Popover")
            .field("phase", &self.lifecycle.phase())
            .field("surface", &self.surface)
            .field("placement", &self.placement)
            .field("flags", &self.flags)
            .field("dismissal", &self.dismissal)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationRunner;
    use crate::monitor::{EventSource, SubscriptionToken};
    use kurbo::Point;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct HostState {
        views: BTreeMap<u64, Rect>,
        screen: Rect,
        container: Rect,
        app: Rect,
        live_subscriptions: u64,
        next_token: u64,
        next_animation: u64,
        last_animation: Option<AnimationId>,
        cancelled: Vec<AnimationId>,
        detached: Vec<ViewId>,
    }

    /// Shared-state fake: clones observe the popover-owned instance.
    #[derive(Clone, Debug, Default)]
    struct FakeHost(Rc<RefCell<HostState>>);

    impl FakeHost {
        fn new() -> Self {
            let screen = Rect::new(0.0, 0.0, 800.0, 600.0);
            Self(Rc::new(RefCell::new(HostState {
                screen,
                container: screen,
                app: screen,
                ..HostState::default()
            })))
        }

        fn add_view(&self, id: u64, frame: Rect) -> ViewId {
            self.0.borrow_mut().views.insert(id, frame);
            ViewId(id)
        }

        fn remove_view(&self, view: ViewId) {
            self.0.borrow_mut().views.remove(&view.0);
        }

        fn move_view(&self, view: ViewId, frame: Rect) {
            self.0.borrow_mut().views.insert(view.0, frame);
        }

        fn live_subscriptions(&self) -> u64 {
            self.0.borrow().live_subscriptions
        }

        fn last_animation(&self) -> AnimationId {
            self.0.borrow().last_animation.expect("an animation was begun")
        }

        fn cancelled(&self) -> Vec<AnimationId> {
            self.0.borrow().cancelled.clone()
        }

        fn detached(&self) -> Vec<ViewId> {
            self.0.borrow().detached.clone()
        }
    }

    impl EventSource for FakeHost {
        fn subscribe(&mut self) -> SubscriptionToken {
            let mut s = self.0.borrow_mut();
            s.live_subscriptions += 1;
            s.next_token += 1;
            SubscriptionToken(s.next_token)
        }

        fn unsubscribe(&mut self, _token: SubscriptionToken) {
            self.0.borrow_mut().live_subscriptions -= 1;
        }
    }

    impl AnimationRunner for FakeHost {
        fn begin(&mut self, _spec: &AnimationSpec, _from: Rect, _to: Rect) -> AnimationId {
            let mut s = self.0.borrow_mut();
            s.next_animation += 1;
            let id = AnimationId(s.next_animation);
            s.last_animation = Some(id);
            id
        }

        fn cancel(&mut self, id: AnimationId) {
            self.0.borrow_mut().cancelled.push(id);
        }
    }

    impl Host for FakeHost {
        fn view_frame(&self, view: ViewId) -> Option<Rect> {
            self.0.borrow().views.get(&view.0).copied()
        }

        fn screen_bounds(&self) -> Rect {
            self.0.borrow().screen
        }

        fn container_bounds(&self) -> Rect {
            self.0.borrow().container
        }

        fn app_frame(&self) -> Rect {
            self.0.borrow().app
        }

        fn detach_content(&mut self, content: ViewId) {
            self.0.borrow_mut().detached.push(content);
        }
    }

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn record(log: &Log, name: &'static str) -> impl FnMut() + 'static {
        let log = log.clone();
        move || log.borrow_mut().push(name)
    }

    fn wire_log(popover: &mut Popover<FakeHost>) -> Log {
        let log: Log = Rc::default();
        popover.on_will_show(record(&log, "will_show"));
        popover.on_did_show(record(&log, "did_show"));
        popover.on_will_close(record(&log, "will_close"));
        popover.on_did_close(record(&log, "did_close"));
        popover.on_will_move(record(&log, "will_move"));
        popover.on_did_move(record(&log, "did_move"));
        popover.on_will_detach(record(&log, "will_detach"));
        popover.on_did_detach(record(&log, "did_detach"));
        log
    }

    const ANCHOR_BOUNDS: Rect = Rect::new(0.0, 0.0, 50.0, 20.0);

    /// Host with an anchor at (100,100)+(50,20) and a 200x300 popover.
    fn fixture() -> (Popover<FakeHost>, FakeHost, ViewId) {
        let host = FakeHost::new();
        let anchor = host.add_view(1, Rect::new(100.0, 100.0, 150.0, 120.0));
        let mut popover = Popover::new(host.clone(), Size::new(200.0, 300.0));
        popover.flags = PlacementFlags::STAYS_IN_SCREEN;
        (popover, host, anchor)
    }

    fn count(log: &Log, name: &str) -> usize {
        log.borrow().iter().filter(|n| **n == name).count()
    }

    #[test]
    fn show_fires_will_then_did_around_the_animation() {
        let (mut p, host, anchor) = fixture();
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        assert_eq!(p.phase(), Phase::Showing);
        assert_eq!(*log.borrow(), vec!["will_show"]);
        assert_eq!(host.live_subscriptions(), 0, "monitor waits for Shown");
        p.animation_finished(host.last_animation());
        assert_eq!(*log.borrow(), vec!["will_show", "did_show"]);
        assert!(p.is_shown());
        assert_eq!(host.live_subscriptions(), 1);
    }

    #[test]
    fn unanimated_show_is_immediate() {
        let (mut p, host, anchor) = fixture();
        p.animated = false;
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        assert!(p.is_shown());
        assert_eq!(*log.borrow(), vec!["will_show", "did_show"]);
        assert_eq!(host.live_subscriptions(), 1);
    }

    #[test]
    fn resolver_example_scenario() {
        // Anchor (100,100)+(50,20) on an 800x600 screen, content 200x300,
        // edge MaxY: fits below, edge kept.
        let (mut p, _host, anchor) = fixture();
        p.animated = false;
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        assert_eq!(p.resolved_edge(), Some(Edge::MaxY));
        let frame = p.frame().unwrap();
        assert_eq!(frame.y0, 120.0);
        assert_eq!(frame.size(), Size::new(200.0, 300.0));
    }

    #[test]
    fn rejected_show_changes_nothing() {
        let (mut p, host, anchor) = fixture();
        host.remove_view(anchor);
        let log = wire_log(&mut p);
        let err = p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY);
        assert_eq!(err, Err(ShowError::AnchorUnresolved));
        assert_eq!(p.phase(), Phase::Closed);
        assert!(log.borrow().is_empty(), "no callbacks on a rejected show");
        assert_eq!(host.live_subscriptions(), 0);
    }

    #[test]
    fn veto_keeps_the_popover_shown() {
        let (mut p, host, anchor) = fixture();
        p.animated = false;
        let log = wire_log(&mut p);
        p.on_should_close(|| false);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        p.close();
        assert!(p.is_shown());
        assert_eq!(count(&log, "will_close"), 0);
        assert_eq!(count(&log, "did_close"), 0);
        assert_eq!(host.live_subscriptions(), 1, "monitor survives a veto");
    }

    #[test]
    fn close_unregisters_before_the_animation_ends() {
        let (mut p, host, anchor) = fixture();
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        p.animation_finished(host.last_animation());
        p.close();
        assert_eq!(p.phase(), Phase::Closing);
        assert_eq!(host.live_subscriptions(), 0, "monitor leaves with Shown");
        assert_eq!(count(&log, "did_close"), 0);
        p.animation_finished(host.last_animation());
        assert_eq!(p.phase(), Phase::Closed);
        assert_eq!(count(&log, "did_close"), 1);
        assert_eq!(p.frame(), None, "placement is not persisted across cycles");
    }

    #[test]
    fn close_during_showing_cancels_the_show_in_place() {
        let (mut p, host, anchor) = fixture();
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        let show_animation = host.last_animation();
        p.close();
        assert_eq!(p.phase(), Phase::Closing);
        assert!(host.cancelled().contains(&show_animation));
        assert_eq!(count(&log, "did_show"), 0, "the show never completed");
        p.animation_finished(host.last_animation());
        assert_eq!(p.phase(), Phase::Closed);
        assert_eq!(count(&log, "did_close"), 1);
    }

    #[test]
    fn show_during_closing_is_queued_not_interleaved() {
        let (mut p, host, anchor) = fixture();
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        p.animation_finished(host.last_animation());
        p.close();
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxX).unwrap();
        assert_eq!(p.phase(), Phase::Closing, "second show must wait");
        assert_eq!(count(&log, "will_show"), 1);
        p.animation_finished(host.last_animation());
        // The close completed, then the queued show began.
        assert_eq!(p.phase(), Phase::Showing);
        assert_eq!(count(&log, "did_close"), 1);
        assert_eq!(count(&log, "will_show"), 2);
        p.animation_finished(host.last_animation());
        assert!(p.is_shown());
        assert_eq!(count(&log, "did_show"), 2);
    }

    #[test]
    fn show_during_showing_drains_as_a_reposition() {
        let (mut p, host, anchor) = fixture();
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxX).unwrap();
        assert_eq!(p.phase(), Phase::Showing, "second show must wait");
        assert_eq!(count(&log, "will_show"), 1);
        p.animation_finished(host.last_animation());
        assert!(p.is_shown());
        assert_eq!(count(&log, "will_show"), 1, "queued inputs apply as a move, not a new show");
        assert_eq!(count(&log, "will_move"), 1);
        assert_eq!(p.resolved_edge(), Some(Edge::MaxX));
        p.animation_finished(host.last_animation());
        assert_eq!(count(&log, "did_move"), 1);
    }

    #[test]
    fn forced_teardown_always_reaches_closed() {
        let (mut p, host, anchor) = fixture();
        let log = wire_log(&mut p);
        p.on_should_close(|| false); // never consulted on teardown
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        let show_animation = host.last_animation();
        p.force_close();
        assert_eq!(p.phase(), Phase::Closed);
        assert!(host.cancelled().contains(&show_animation));
        assert_eq!(count(&log, "did_close"), 1);
        assert_eq!(host.live_subscriptions(), 0);
        p.force_close();
        assert_eq!(count(&log, "did_close"), 1, "did_close fires once per cycle");
    }

    #[test]
    fn monitor_count_is_one_shown_zero_otherwise() {
        let (mut p, host, anchor) = fixture();
        p.animated = false;
        for _ in 0..3 {
            assert_eq!(host.live_subscriptions(), 0);
            p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
            assert_eq!(host.live_subscriptions(), 1);
            p.close();
            assert_eq!(host.live_subscriptions(), 0);
        }
    }

    #[test]
    fn detach_transfers_content_and_stops_monitoring() {
        let (mut p, host, anchor) = fixture();
        p.animated = false;
        p.is_detachable = true;
        let content = host.add_view(7, Rect::new(0.0, 0.0, 200.0, 300.0));
        p.set_content_view(content);
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        p.detach();
        assert_eq!(p.phase(), Phase::Detached);
        assert_eq!(*log.borrow(), vec!["will_show", "did_show", "will_detach", "did_detach"]);
        assert_eq!(host.detached(), vec![content]);
        assert_eq!(host.live_subscriptions(), 0);
        // Detached surfaces ignore further lifecycle requests.
        p.close();
        assert_eq!(p.phase(), Phase::Detached);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        assert_eq!(p.phase(), Phase::Detached);
    }

    #[test]
    fn detach_requires_the_flag() {
        let (mut p, _host, anchor) = fixture();
        p.animated = false;
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        p.detach();
        assert!(p.is_shown(), "non-detachable popover stays put");
    }

    #[test]
    fn anchor_frame_change_repositions() {
        let (mut p, host, anchor) = fixture();
        p.animated = false;
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        host.move_view(anchor, Rect::new(300.0, 50.0, 350.0, 70.0));
        p.handle_event(UiEvent::AnchorFrameChanged);
        assert_eq!(*log.borrow(), vec!["will_show", "did_show", "will_move", "did_move"]);
        assert_eq!(p.frame().unwrap().y0, 70.0, "frame follows the anchor");
        assert!(p.is_shown());
    }

    #[test]
    fn losing_the_anchor_dismisses_on_the_next_frame_event() {
        let (mut p, host, anchor) = fixture();
        p.animated = false;
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        host.remove_view(anchor);
        p.handle_event(UiEvent::AnchorFrameChanged);
        assert_eq!(p.phase(), Phase::Closed, "a stale frame must not outlive its anchor");
        assert_eq!(count(&log, "did_close"), 1);
        assert_eq!(host.live_subscriptions(), 0);
    }

    #[test]
    fn outside_mouse_down_dismisses_inside_does_not() {
        let (mut p, _host, anchor) = fixture();
        p.animated = false;
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        let inside = p.frame().unwrap().center();
        p.handle_event(UiEvent::MouseDown { position: inside });
        assert!(p.is_shown());
        p.handle_event(UiEvent::MouseDown { position: Point::new(5.0, 5.0) });
        assert_eq!(p.phase(), Phase::Closed);
        assert_eq!(count(&log, "did_close"), 1);
    }

    #[test]
    fn stale_animation_ids_are_ignored() {
        let (mut p, host, anchor) = fixture();
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        p.animation_finished(host.last_animation());
        // Trigger an animated reposition, then complete a bogus id.
        p.set_content_size(Size::new(250.0, 300.0));
        assert_eq!(count(&log, "will_move"), 1);
        p.animation_finished(AnimationId(9999));
        assert_eq!(count(&log, "did_move"), 0);
        p.animation_finished(host.last_animation());
        assert_eq!(count(&log, "did_move"), 1);
    }

    #[test]
    fn reshow_while_shown_is_a_reposition() {
        let (mut p, _host, anchor) = fixture();
        p.animated = false;
        let log = wire_log(&mut p);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxX).unwrap();
        assert_eq!(count(&log, "will_show"), 1, "no second show transition");
        assert_eq!(count(&log, "will_move"), 1);
        assert_eq!(p.resolved_edge(), Some(Edge::MaxX));
    }

    #[test]
    fn max_height_caps_the_content_before_placement() {
        let (mut p, _host, anchor) = fixture();
        p.animated = false;
        p.max_height = Some(100.0);
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        assert_eq!(p.frame().unwrap().height(), 100.0);
    }

    #[test]
    fn bottom_offset_respects_containment() {
        // Anchor near the container's min-y edge: the MinY frame fits, but
        // the offset alone would push it past y = 0.
        let host = FakeHost::new();
        let anchor = host.add_view(1, Rect::new(100.0, 50.0, 150.0, 70.0));
        let mut p = Popover::new(host.clone(), Size::new(100.0, 40.0));
        p.animated = false;
        p.flags = PlacementFlags::STAYS_IN_CONTAINER | PlacementFlags::STOPS_AT_BOUNDS;
        p.bottom_offset = 20.0;
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MinY).unwrap();
        let frame = p.frame().unwrap();
        assert_eq!(frame.y0, 0.0, "offset frame is pulled back inside the container");
        assert_eq!(frame.size(), Size::new(100.0, 40.0));
    }

    #[test]
    fn bottom_offset_shifts_min_y_placements_when_unconfined() {
        let host = FakeHost::new();
        let anchor = host.add_view(1, Rect::new(100.0, 400.0, 150.0, 420.0));
        let mut p = Popover::new(host.clone(), Size::new(100.0, 40.0));
        p.animated = false;
        p.bottom_offset = 20.0;
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MinY).unwrap();
        // Unconfined: y0 = 400 - 40 - 20.
        assert_eq!(p.frame().unwrap().y0, 340.0);
    }

    #[test]
    fn arrow_points_back_at_the_anchor_when_enabled() {
        let (mut p, _host, anchor) = fixture();
        p.animated = false;
        p.show_relative_to_rect(ANCHOR_BOUNDS, anchor, Edge::MaxY).unwrap();
        assert_eq!(p.arrow(), None, "arrows are opt-in");
        p.should_show_arrow = true;
        let arrow = p.arrow().unwrap();
        assert_eq!(arrow.direction, Edge::MinY);
        assert_eq!(arrow.base.y, p.frame().unwrap().y0);
    }

    #[test]
    fn given_rect_mode_with_automatic_position_picks_an_edge_by_space() {
        let host = FakeHost::new();
        let anchor = host.add_view(1, Rect::new(0.0, 0.0, 800.0, 600.0));
        let sender = host.add_view(2, Rect::new(10.0, 10.0, 30.0, 30.0));
        let mut p = Popover::new(host.clone(), Size::new(100.0, 100.0));
        p.animated = false;
        p.flags = PlacementFlags::STAYS_IN_SCREEN;
        // Rect near the min-x/min-y corner: most space is on +x / +y.
        let rect = Rect::new(10.0, 10.0, 30.0, 30.0);
        p.show_at(anchor, rect, sender, RelativePosition::Automatic, Edge::MinX)
            .unwrap();
        assert!(p.is_shown());
        assert_eq!(p.sender(), Some(sender));
        let edge = p.resolved_edge().unwrap();
        assert!(edge == Edge::MaxX || edge == Edge::MaxY, "space wins over the request");
    }

    #[test]
    fn given_rect_manual_position_collapses_to_a_corner() {
        let host = FakeHost::new();
        let anchor = host.add_view(1, Rect::new(0.0, 0.0, 800.0, 600.0));
        let mut p = Popover::new(host.clone(), Size::new(50.0, 50.0));
        p.animated = false;
        let rect = Rect::new(200.0, 200.0, 400.0, 300.0);
        p.show_at(anchor, rect, anchor, RelativePosition::TopLeading, Edge::MaxY)
            .unwrap();
        // Anchored at the rect's (200,200) corner, content below it.
        let frame = p.frame().unwrap();
        assert_eq!(frame.y0, 200.0);
        assert_eq!(frame.x0, 200.0, "leading-aligned on the degenerate anchor");
    }

    #[test]
    fn window_popover_alert_is_centered_without_an_arrow() {
        let host = FakeHost::new();
        let parent = host.add_view(1, Rect::new(200.0, 150.0, 600.0, 450.0));
        let mut w = WindowPopover::new_window(host.clone(), Size::new(200.0, 100.0));
        w.animated = false;
        w.should_show_arrow = true;
        w.set_level(3);
        w.set_can_become_key(true);
        w.show_as_alert(parent).unwrap();
        assert!(w.is_shown());
        assert_eq!(w.frame(), Some(Rect::new(300.0, 250.0, 500.0, 350.0)));
        assert_eq!(w.arrow(), None, "alert style disables the arrow");
        assert_eq!(w.window_surface().level, 3);
        assert!(w.window_surface().can_become_key);
    }
}
