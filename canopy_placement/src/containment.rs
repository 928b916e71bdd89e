// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Containment adjustment: edge fallback and clamping.
//!
//! [`fit`] post-processes a candidate placement against the active bound set.
//! A frame that already fits is returned unchanged. Otherwise the fallback
//! cycle selected by [`PlacementFlags::CIRCULAR_FALLBACK`] is walked,
//! starting from the requested edge, re-resolving against each successor
//! until a fitting edge is found or all four have been tried. When nothing
//! fits, the last candidate is either clamped by translation
//! ([`PlacementFlags::STOPS_AT_BOUNDS`]) or returned overflowing.
//!
//! The whole pass is deterministic: for fixed inputs the chosen edge and the
//! final frame are identical on every call.

use kurbo::{Rect, Size};

use crate::resolve::resolve;
use crate::types::{Edge, Placement, PlacementFlags};

/// Resolve `content` against `edge` of `anchor` and correct the result
/// against the active bound set.
///
/// The active bound is the container when
/// [`PlacementFlags::STAYS_IN_CONTAINER`] is set, else the screen when
/// [`PlacementFlags::STAYS_IN_SCREEN`] is set, else none (the raw resolution
/// is returned as-is).
pub fn fit(
    anchor: Rect,
    edge: Edge,
    content: Size,
    flags: PlacementFlags,
    container: Rect,
    screen: Rect,
) -> Placement {
    let candidate = resolve(anchor, edge, content);
    let bound = if flags.contains(PlacementFlags::STAYS_IN_CONTAINER) {
        container
    } else if flags.contains(PlacementFlags::STAYS_IN_SCREEN) {
        screen
    } else {
        return candidate;
    };

    if contains(bound, candidate.frame) {
        return candidate;
    }

    // Walk the remaining three edges of the selected cycle.
    let circular = flags.contains(PlacementFlags::CIRCULAR_FALLBACK);
    let mut last = candidate;
    let mut e = edge;
    for _ in 0..3 {
        e = if circular { e.circular_next() } else { e.cross_next() };
        last = resolve(anchor, e, content);
        if contains(bound, last.frame) {
            return last;
        }
    }

    if flags.contains(PlacementFlags::STOPS_AT_BOUNDS) {
        Placement {
            frame: clamp_into(last.frame, bound),
            edge: last.edge,
        }
    } else {
        last
    }
}

/// Translate `frame` so it lies inside `bound`. Never shrinks: a frame wider
/// or taller than the bound is aligned to the bound's min edge on that axis.
pub fn clamp_into(frame: Rect, bound: Rect) -> Rect {
    let x0 = if frame.width() <= bound.width() {
        frame.x0.clamp(bound.x0, bound.x1 - frame.width())
    } else {
        bound.x0
    };
    let y0 = if frame.height() <= bound.height() {
        frame.y0.clamp(bound.y0, bound.y1 - frame.height())
    } else {
        bound.y0
    };
    Rect::new(x0, y0, x0 + frame.width(), y0 + frame.height())
}

/// Whole-rect containment (closed bounds on all four sides).
pub fn contains(bound: Rect, frame: Rect) -> bool {
    frame.x0 >= bound.x0 && frame.x1 <= bound.x1 && frame.y0 >= bound.y0 && frame.y1 <= bound.y1
}
