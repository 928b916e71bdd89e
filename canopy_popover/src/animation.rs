// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animation configuration and the runner seam.
//!
//! The engine never waits on an animation: it hands a start/target frame
//! pair to an [`AnimationRunner`] supplied by the host and is told about
//! completion through [`crate::popover::Popover::animation_finished`] on the
//! main thread. A fake runner that completes synchronously (or never) is all
//! tests need.

use std::time::Duration;

use kurbo::Rect;

use canopy_placement::containment::clamp_into;

/// How the popover surface is animated between frames.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AnimationBehaviour {
    /// Animate the surface frame itself from a start frame to the target.
    #[default]
    TransformFrame,
    /// Cross-fade in place; the frame snaps to the target.
    CrossFade,
}

/// Direction of a frame-transform animation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AnimationMotion {
    /// Slide in from the -x side toward +x.
    LeadingToTrailing,
    /// Slide in from the +x side toward -x.
    TrailingToLeading,
    /// Slide in from the +y side toward -y.
    BottomToTop,
    /// Slide in from the -y side toward +y.
    TopToBottom,
    /// No motion; opacity only.
    #[default]
    Fade,
}

/// Full animation configuration for a popover instance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationSpec {
    /// Frame-transform vs cross-fade.
    pub behaviour: AnimationBehaviour,
    /// Motion direction for frame transforms.
    pub motion: AnimationMotion,
    /// Scheduled duration; a delay, never a synchronous wait.
    pub duration: Duration,
    /// Restrict the start frame to the host application's frame instead of
    /// the full screen.
    pub animated_in_app_frame: bool,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            behaviour: AnimationBehaviour::default(),
            motion: AnimationMotion::default(),
            duration: Duration::from_millis(250),
            animated_in_app_frame: false,
        }
    }
}

impl AnimationSpec {
    /// The frame a show animation starts from, given the target frame and
    /// the bounds motion is allowed to originate in.
    ///
    /// Cross-fades (and [`AnimationMotion::Fade`]) start at the target; frame
    /// transforms start one frame-length away along the motion direction,
    /// pulled back inside `bounds`.
    pub fn start_frame(&self, target: Rect, bounds: Rect) -> Rect {
        if self.behaviour == AnimationBehaviour::CrossFade {
            return target;
        }
        let (dx, dy) = match self.motion {
            AnimationMotion::LeadingToTrailing => (-target.width(), 0.0),
            AnimationMotion::TrailingToLeading => (target.width(), 0.0),
            AnimationMotion::BottomToTop => (0.0, target.height()),
            AnimationMotion::TopToBottom => (0.0, -target.height()),
            AnimationMotion::Fade => return target,
        };
        clamp_into(target + kurbo::Vec2::new(dx, dy), bounds)
    }
}

/// Handle for an in-flight animation, issued by the runner.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AnimationId(pub u64);

/// Host-supplied animation scheduler.
///
/// `begin` must not block; the host later reports completion by calling
/// [`crate::popover::Popover::animation_finished`] with the returned id.
/// `cancel` drops an in-flight animation; its completion must then never be
/// reported.
pub trait AnimationRunner {
    /// Schedule an animation from `from` to `to` and return its handle.
    fn begin(&mut self, spec: &AnimationSpec, from: Rect, to: Rect) -> AnimationId;
    /// Cancel an in-flight animation.
    fn cancel(&mut self, id: AnimationId);
}
