// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for placement: edges, relative positions, policy flags, and
//! the resolved placement itself.

use kurbo::Rect;

/// Side of the anchor rectangle the popover body sits against.
///
/// Named in coordinate terms rather than visual terms so the crate stays
/// agnostic of the host's y orientation: `MaxY` is the +y side of the anchor,
/// whatever "up" means on the target platform.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Edge {
    /// The -x side (before the anchor along x).
    MinX,
    /// The +x side (after the anchor along x).
    MaxX,
    /// The -y side.
    MinY,
    /// The +y side.
    MaxY,
}

impl Edge {
    /// The opposite side. An arrow attached to a placement points this way.
    pub const fn opposite(self) -> Self {
        match self {
            Self::MinX => Self::MaxX,
            Self::MaxX => Self::MinX,
            Self::MinY => Self::MaxY,
            Self::MaxY => Self::MinY,
        }
    }

    /// Successor in the circular fallback cycle:
    /// `MinX → MaxY → MaxX → MinY → MinX`.
    pub const fn circular_next(self) -> Self {
        match self {
            Self::MinX => Self::MaxY,
            Self::MaxY => Self::MaxX,
            Self::MaxX => Self::MinY,
            Self::MinY => Self::MinX,
        }
    }

    /// Successor in the cross fallback cycle:
    /// `MinX → MaxX → MinY → MaxY → MinX`.
    pub const fn cross_next(self) -> Self {
        match self {
            Self::MinX => Self::MaxX,
            Self::MaxX => Self::MinY,
            Self::MinY => Self::MaxY,
            Self::MaxY => Self::MinX,
        }
    }

    /// True when this edge lies along the x axis (`MinX`/`MaxX`).
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::MinX | Self::MaxX)
    }
}

/// How the anchor constraint is derived when the caller supplies a raw
/// screen-space rectangle instead of a view.
///
/// The manual variants collapse the supplied rectangle to one of its corners;
/// [`RelativePosition::Automatic`] keeps the rectangle as given and lets the
/// resolver infer the constraint from the rectangle itself.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum RelativePosition {
    /// Derive the constraint automatically from the supplied rectangle.
    #[default]
    Automatic,
    /// Anchor at the (min-x, min-y) corner.
    TopLeading,
    /// Anchor at the (max-x, min-y) corner.
    TopTrailing,
    /// Anchor at the (min-x, max-y) corner.
    BottomLeading,
    /// Anchor at the (max-x, max-y) corner.
    BottomTrailing,
}

bitflags::bitflags! {
    /// Containment policy controlling how a resolved frame is corrected
    /// against container and screen bounds.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PlacementFlags: u8 {
        /// The frame must end up fully inside the container bounds, switching
        /// edge if the preferred edge has no room.
        const STAYS_IN_CONTAINER = 0b0000_0001;
        /// The frame must end up fully inside the screen bounds. Ignored when
        /// `STAYS_IN_CONTAINER` is also set (the container is the tighter
        /// bound set).
        const STAYS_IN_SCREEN    = 0b0000_0010;
        /// Walk the circular fallback cycle instead of the cross cycle when
        /// the preferred edge has no room.
        const CIRCULAR_FALLBACK  = 0b0000_0100;
        /// When no edge fits, translate the frame until it lies inside the
        /// active bound instead of letting it overflow. Never shrinks.
        const STOPS_AT_BOUNDS    = 0b0000_1000;
    }
}

/// A resolved popover placement.
///
/// Derived data: recomputed on every show, update, or resize, and never
/// persisted across show/close cycles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Placement {
    /// The popover body frame in the anchor's coordinate space.
    pub frame: Rect,
    /// The edge of the anchor the frame ended up against.
    pub edge: Edge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_cycle_visits_all_edges() {
        let mut e = Edge::MinX;
        let mut seen = [false; 4];
        for _ in 0..4 {
            let i = match e {
                Edge::MinX => 0,
                Edge::MaxX => 1,
                Edge::MinY => 2,
                Edge::MaxY => 3,
            };
            seen[i] = true;
            e = e.circular_next();
        }
        assert_eq!(e, Edge::MinX, "cycle must return to its start");
        assert!(seen.iter().all(|s| *s), "cycle must visit every edge");
    }

    #[test]
    fn cross_cycle_order() {
        assert_eq!(Edge::MinX.cross_next(), Edge::MaxX);
        assert_eq!(Edge::MaxX.cross_next(), Edge::MinY);
        assert_eq!(Edge::MinY.cross_next(), Edge::MaxY);
        assert_eq!(Edge::MaxY.cross_next(), Edge::MinX);
    }

    #[test]
    fn circular_cycle_order() {
        assert_eq!(Edge::MinX.circular_next(), Edge::MaxY);
        assert_eq!(Edge::MaxY.circular_next(), Edge::MaxX);
        assert_eq!(Edge::MaxX.circular_next(), Edge::MinY);
        assert_eq!(Edge::MinY.circular_next(), Edge::MinX);
    }

    #[test]
    fn opposite_is_involutive() {
        for e in [Edge::MinX, Edge::MaxX, Edge::MinY, Edge::MaxY] {
            assert_eq!(e.opposite().opposite(), e, "opposite must round-trip");
        }
    }
}
