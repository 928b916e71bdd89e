// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_placement --heading-base-level=0

//! Canopy Placement: deterministic, `no_std` popover placement.
//!
//! ## Overview
//!
//! This crate computes where a popover body and its arrow sit relative to an
//! anchor rectangle. It is pure geometry over [`kurbo`] types: no windowing,
//! no state, no side effects. Feed it an anchor rect, an edge preference, a
//! content size, and a containment policy; it answers with a [`Placement`]
//! and, on request, an [`ArrowDescriptor`].
//!
//! ## Resolution
//!
//! [`resolve`](resolve::resolve) places the content against one [`Edge`] of
//! the anchor, centered on the orthogonal axis (leading-edge aligned when the
//! content is longer than the anchor). [`resolve_auto`](resolve::resolve_auto)
//! instead scores the unobstructed area on all four sides and picks the best.
//!
//! ## Containment
//!
//! [`fit`](containment::fit) corrects a candidate against container or screen
//! bounds per [`PlacementFlags`]. When the preferred edge has no room it
//! walks a fixed fallback cycle — circular `MinX → MaxY → MaxX → MinY` or
//! cross `MinX → MaxX → MinY → MaxY` — starting at the requested edge. When
//! no edge fits it either clamps by translation (never by shrinking) or
//! returns the overflowing frame, per policy.
//!
//! ## Determinism
//!
//! Every function in this crate is a pure function of its arguments. For
//! fixed inputs the chosen edge and final frame are identical on every call,
//! which is what makes placement unit-testable without a windowing stack.
//!
//! ## Coordinate space
//!
//! All rectangles share one coordinate space (typically the screen). The
//! crate is agnostic of y orientation; edges are named in `Min`/`Max`
//! coordinate terms, not visual ones.
//!
//! This crate is `no_std`.

#![no_std]

pub mod arrow;
pub mod containment;
pub mod resolve;
pub mod types;

pub use arrow::ArrowDescriptor;
pub use types::{Edge, Placement, PlacementFlags, RelativePosition};
