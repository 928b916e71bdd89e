// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_popover --heading-base-level=0

//! Canopy Popover: lifecycle engine for transient overlay surfaces.
//!
//! ## Overview
//!
//! This crate drives a popover from show to close: it computes the frame via
//! [`canopy_placement`], sequences the show/shown/closing/closed/detached
//! phases, fires the owner's lifecycle callbacks in will → effect → did
//! order, and watches outside interaction to decide when to auto-dismiss or
//! reposition. Everything platform-shaped is behind traits, so the whole
//! engine runs against in-memory fakes in tests.
//!
//! ## Lifecycle
//!
//! [`Popover`](popover::Popover) owns a [`Lifecycle`](lifecycle::Lifecycle)
//! phase machine. Re-entrant show requests during an in-flight animation are
//! queued, a close during the show animation cancels it in place, and a
//! forced teardown reaches `Closed` from any phase with the did-close
//! callback fired exactly once per cycle. At most one animation runs per
//! instance at a time.
//!
//! ## Monitoring
//!
//! While shown — and only then — the popover holds one subscription on the
//! host's [`EventSource`](monitor::EventSource). Observed events are
//! classified against the [`DismissPolicy`](monitor::DismissPolicy) into
//! dismiss, reposition, or ignore by a pure function you can test directly.
//!
//! ## Hosts and animation
//!
//! The [`Host`](host::Host) trait supplies screen/container bounds, view
//! frame resolution for non-owning [`ViewId`](host::ViewId) handles, and
//! content handoff on detach; [`AnimationRunner`](animation::AnimationRunner)
//! schedules animations whose completion the host reports back with
//! [`Popover::animation_finished`](popover::Popover::animation_finished).
//! Nothing in this crate blocks; all calls happen on the main thread.
//!
//! ## Surfaces
//!
//! A popover is backed either by a child view or by its own window. The
//! variant is a type parameter: window-only operations (window level, key
//! behavior, alert-style presentation) exist only on
//! [`WindowPopover`](popover::WindowPopover), so calling them on a view
//! popover is a compile error.
//!
//! ## Minimal example
//!
//! ```no_run
//! use canopy_placement::Edge;
//! use canopy_popover::host::ViewId;
//! use canopy_popover::popover::Popover;
//! use kurbo::{Rect, Size};
//!
//! # fn demo(host: impl canopy_popover::host::Host) {
//! let mut popover = Popover::new(host, Size::new(240.0, 320.0));
//! popover.on_did_show(|| println!("shown"));
//! let anchor = ViewId(1);
//! popover
//!     .show_relative_to_rect(Rect::new(0.0, 0.0, 80.0, 24.0), anchor, Edge::MaxY)
//!     .unwrap();
//! # }
//! ```

pub mod animation;
pub mod callbacks;
pub mod host;
pub mod lifecycle;
pub mod monitor;
pub mod popover;

pub use animation::{AnimationBehaviour, AnimationMotion, AnimationSpec};
pub use host::{Host, ViewId};
pub use lifecycle::Phase;
pub use monitor::{DismissPolicy, Reaction, UiEvent};
pub use popover::{Popover, ShowError, WindowPopover};
