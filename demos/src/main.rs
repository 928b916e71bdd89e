// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walkthrough of the popover engine against an in-memory host.
//!
//! This demo stands in for a real windowing bridge: an [`InMemoryHost`]
//! resolves view frames, "runs" animations by completing them on demand,
//! and counts monitor subscriptions. It drives one popover through show,
//! outside-click dismissal, fallback placement near a screen edge, and a
//! detach.
//!
//! Run:
//! - `cargo run -p canopy_demos`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::{Point, Rect, Size};

use canopy_placement::{Edge, PlacementFlags};
use canopy_popover::animation::{AnimationId, AnimationRunner, AnimationSpec};
use canopy_popover::host::{Host, ViewId};
use canopy_popover::monitor::{EventSource, SubscriptionToken, UiEvent};
use canopy_popover::popover::Popover;

#[derive(Debug, Default)]
struct HostState {
    views: HashMap<u64, Rect>,
    subscriptions: u64,
    next_token: u64,
    next_animation: u64,
    pending_animation: Option<AnimationId>,
}

/// A windowing layer small enough to fit in a demo.
#[derive(Clone, Debug, Default)]
struct InMemoryHost(Rc<RefCell<HostState>>);

impl InMemoryHost {
    fn add_view(&self, id: u64, frame: Rect) -> ViewId {
        self.0.borrow_mut().views.insert(id, frame);
        ViewId(id)
    }

    /// Pretend the animation runner's clock fired.
    fn pending_animation(&self) -> Option<AnimationId> {
        self.0.borrow_mut().pending_animation.take()
    }
}

impl EventSource for InMemoryHost {
    fn subscribe(&mut self) -> SubscriptionToken {
        let mut s = self.0.borrow_mut();
        s.subscriptions += 1;
        s.next_token += 1;
        SubscriptionToken(s.next_token)
    }

    fn unsubscribe(&mut self, _token: SubscriptionToken) {
        self.0.borrow_mut().subscriptions -= 1;
    }
}

impl AnimationRunner for InMemoryHost {
    fn begin(&mut self, _spec: &AnimationSpec, from: Rect, to: Rect) -> AnimationId {
        let mut s = self.0.borrow_mut();
        s.next_animation += 1;
        let id = AnimationId(s.next_animation);
        s.pending_animation = Some(id);
        println!("  animation {id:?}: {from:?} -> {to:?}");
        id
    }

    fn cancel(&mut self, id: AnimationId) {
        self.0.borrow_mut().pending_animation = None;
        println!("  animation {id:?} cancelled");
    }
}

impl Host for InMemoryHost {
    fn view_frame(&self, view: ViewId) -> Option<Rect> {
        self.0.borrow().views.get(&view.0).copied()
    }

    fn screen_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    fn container_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    fn app_frame(&self) -> Rect {
        Rect::new(50.0, 50.0, 750.0, 550.0)
    }

    fn detach_content(&mut self, content: ViewId) {
        println!("  content {content:?} handed to its own window");
    }
}

fn main() {
    let host = InMemoryHost::default();
    let button = host.add_view(1, Rect::new(100.0, 100.0, 150.0, 120.0));
    let content = host.add_view(2, Rect::new(0.0, 0.0, 200.0, 300.0));

    let mut popover = Popover::new(host.clone(), Size::new(200.0, 300.0));
    popover.flags = PlacementFlags::STAYS_IN_SCREEN | PlacementFlags::CIRCULAR_FALLBACK;
    popover.is_detachable = true;
    popover.should_show_arrow = true;
    popover.set_content_view(content);
    popover.on_did_show(|| println!("  callback: shown"));
    popover.on_did_close(|| println!("  callback: closed"));

    println!("show below the button:");
    popover
        .show_relative_to_rect(Rect::new(0.0, 0.0, 50.0, 20.0), button, Edge::MaxY)
        .expect("button is in a window");
    if let Some(id) = host.pending_animation() {
        popover.animation_finished(id);
    }
    println!("  frame: {:?}", popover.frame().expect("shown"));
    println!("  arrow: {:?}", popover.arrow().expect("arrow enabled"));

    println!("click outside dismisses:");
    popover.handle_event(UiEvent::MouseDown {
        position: Point::new(700.0, 30.0),
    });
    if let Some(id) = host.pending_animation() {
        popover.animation_finished(id);
    }
    println!("  phase: {:?}", popover.phase());

    println!("anchor near the screen bottom falls back to another edge:");
    let low_button = host.add_view(3, Rect::new(400.0, 570.0, 450.0, 590.0));
    popover.set_content_size(Size::new(100.0, 25.0));
    popover
        .show_relative_to_rect(Rect::new(0.0, 0.0, 50.0, 20.0), low_button, Edge::MaxY)
        .expect("button is in a window");
    if let Some(id) = host.pending_animation() {
        popover.animation_finished(id);
    }
    println!("  resolved edge: {:?}", popover.resolved_edge().expect("shown"));

    println!("detach into a standalone window:");
    popover.detach();
    println!("  phase: {:?}", popover.phase());
}
