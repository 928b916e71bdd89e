// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arrow anchoring.
//!
//! Derives where a popover's arrow sits on the body's touching edge and
//! which way it points. Purely derived data, recomputed whenever the frame
//! or the arrow size changes; the surface renderer consumes the descriptor.

use kurbo::{Point, Rect, Size};

use crate::types::{Edge, Placement};

/// Where and how a popover arrow should be drawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ArrowDescriptor {
    /// Midpoint of the arrow's base, on the popover body's touching edge.
    pub base: Point,
    /// Direction the arrow tip points: the opposite of the resolved edge,
    /// i.e. back toward the anchor.
    pub direction: Edge,
}

/// Compute the arrow descriptor for `placement` against `anchor`.
///
/// The base midpoint tracks the anchor's center along the touching edge but
/// is clamped so the arrow (of breadth `arrow.width` along that edge) never
/// overshoots the body's corners. `arrow.height` is the protrusion depth and
/// does not affect the base position.
pub fn arrow_anchor(placement: Placement, anchor: Rect, arrow: Size) -> ArrowDescriptor {
    let frame = placement.frame;
    let half = arrow.width / 2.0;
    let base = match placement.edge {
        Edge::MinX => Point::new(frame.x1, clamp_mid(anchor.center().y, frame.y0, frame.y1, half)),
        Edge::MaxX => Point::new(frame.x0, clamp_mid(anchor.center().y, frame.y0, frame.y1, half)),
        Edge::MinY => Point::new(clamp_mid(anchor.center().x, frame.x0, frame.x1, half), frame.y1),
        Edge::MaxY => Point::new(clamp_mid(anchor.center().x, frame.x0, frame.x1, half), frame.y0),
    };
    ArrowDescriptor {
        base,
        direction: placement.edge.opposite(),
    }
}

/// Clamp `mid` into `[min + half, max - half]`, collapsing to the center of
/// the span when the arrow is wider than the edge itself.
fn clamp_mid(mid: f64, min: f64, max: f64, half: f64) -> f64 {
    if max - min < 2.0 * half {
        (min + max) / 2.0
    } else {
        mid.clamp(min + half, max - half)
    }
}
