// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure anchor-to-frame resolution.
//!
//! [`resolve`] maps an anchor rectangle, an edge preference, and a content
//! size to a candidate popover frame. It is a pure function: identical inputs
//! always yield the identical frame, and it never fails — a zero-size content
//! simply produces a degenerate frame on the anchor's edge.
//!
//! [`resolve_auto`] implements automatic edge selection: it scores the
//! unobstructed area on all four sides of the anchor within the given bounds
//! and resolves against the best one.

use kurbo::{Rect, Size};

use crate::types::{Edge, Placement, RelativePosition};

/// Resolve a candidate frame for `content` against `edge` of `anchor`.
///
/// The frame's near edge touches the anchor's far edge along `edge`. Along
/// the orthogonal axis the frame is center-aligned with the anchor; when the
/// content is longer than the anchor on that axis, it is aligned to the
/// anchor's leading (min) edge instead.
pub fn resolve(anchor: Rect, edge: Edge, content: Size) -> Placement {
    let (x0, y0) = match edge {
        Edge::MinX => (anchor.x0 - content.width, cross_align(anchor.y0, anchor.y1, content.height)),
        Edge::MaxX => (anchor.x1, cross_align(anchor.y0, anchor.y1, content.height)),
        Edge::MinY => (cross_align(anchor.x0, anchor.x1, content.width), anchor.y0 - content.height),
        Edge::MaxY => (cross_align(anchor.x0, anchor.x1, content.width), anchor.y1),
    };
    Placement {
        frame: Rect::new(x0, y0, x0 + content.width, y0 + content.height),
        edge,
    }
}

/// Pick the edge with the largest unobstructed area inside `bounds`, then
/// resolve against it.
///
/// Ties break deterministically in the order `MinX, MaxX, MinY, MaxY` (first
/// listed wins). Used when the caller requests automatic relative
/// positioning rather than an explicit edge.
pub fn resolve_auto(anchor: Rect, bounds: Rect, content: Size) -> Placement {
    let candidates = [Edge::MinX, Edge::MaxX, Edge::MinY, Edge::MaxY];
    let mut best = Edge::MinX;
    let mut best_area = f64::MIN;
    for edge in candidates {
        let area = available_area(anchor, bounds, edge);
        if area > best_area {
            best_area = area;
            best = edge;
        }
    }
    resolve(anchor, best, content)
}

/// Unobstructed area on `edge`'s side of `anchor` within `bounds`.
pub fn available_area(anchor: Rect, bounds: Rect, edge: Edge) -> f64 {
    let depth = match edge {
        Edge::MinX => anchor.x0 - bounds.x0,
        Edge::MaxX => bounds.x1 - anchor.x1,
        Edge::MinY => anchor.y0 - bounds.y0,
        Edge::MaxY => bounds.y1 - anchor.y1,
    };
    let breadth = if edge.is_horizontal() {
        bounds.height()
    } else {
        bounds.width()
    };
    depth.max(0.0) * breadth.max(0.0)
}

/// Derive the reference rectangle for a raw screen-space rect under the given
/// relative position.
///
/// Manual variants collapse `rect` to the named corner (a zero-size anchor),
/// which is how a corner constraint is expressed in this model.
/// [`RelativePosition::Automatic`] returns `rect` unchanged.
pub fn manual_anchor(rect: Rect, position: RelativePosition) -> Rect {
    let point = match position {
        RelativePosition::Automatic => return rect,
        RelativePosition::TopLeading => (rect.x0, rect.y0),
        RelativePosition::TopTrailing => (rect.x1, rect.y0),
        RelativePosition::BottomLeading => (rect.x0, rect.y1),
        RelativePosition::BottomTrailing => (rect.x1, rect.y1),
    };
    Rect::new(point.0, point.1, point.0, point.1)
}

/// Infer the relative position of `rect` with respect to `view` by quadrant.
///
/// Top/bottom by the y ordering of the centers, leading/trailing by x. This
/// backs automatic constraint derivation when a raw rect and an anchor view
/// are supplied together.
pub fn relative_position_of(rect: Rect, view: Rect) -> RelativePosition {
    let top = rect.center().y < view.center().y;
    let leading = rect.center().x < view.center().x;
    match (top, leading) {
        (true, true) => RelativePosition::TopLeading,
        (true, false) => RelativePosition::TopTrailing,
        (false, true) => RelativePosition::BottomLeading,
        (false, false) => RelativePosition::BottomTrailing,
    }
}

/// Center `extent` between `min` and `max`, falling back to leading-edge
/// alignment when the content is longer than the anchor span.
fn cross_align(min: f64, max: f64, extent: f64) -> f64 {
    if extent > max - min {
        min
    } else {
        min + ((max - min) - extent) / 2.0
    }
}
