//! Ground and wall detection.
//!
//! These structures turn the three probe-box overlap queries (ground, front
//! wall, back wall) into the grounded and wall grace timers.

use bevy::prelude::*;

use crate::config::ProbeConfig;
use crate::state::Facing;
use crate::timers::{TimerBank, TimerId};

/// Answers box overlap queries against the world's collision geometry.
///
/// Physics backends implement this on top of their spatial query API.
pub trait CollisionProbe {
    /// Whether an axis-aligned box overlaps any collider in `layer_mask`.
    fn overlaps(&self, center: Vec2, half_extents: Vec2, layer_mask: u32) -> bool;
}

/// Result of one frame's probe queries.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionResult {
    /// Whether the ground probe overlapped.
    pub grounded: bool,
    /// Whether a wall was found on the character's left.
    pub wall_left: bool,
    /// Whether a wall was found on the character's right.
    pub wall_right: bool,
}

impl CollisionResult {
    /// A result with no contacts.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Refreshes grounded and wall grace timers from probe overlaps.
#[derive(Debug, Clone, Copy)]
pub struct GroundWallDetector<'a> {
    probes: &'a ProbeConfig,
    grace_window: f32,
}

impl<'a> GroundWallDetector<'a> {
    /// Create a detector resetting timers to `grace_window` on contact.
    pub fn new(probes: &'a ProbeConfig, grace_window: f32) -> Self {
        Self {
            probes,
            grace_window,
        }
    }

    /// Query the three probes around `origin`.
    ///
    /// The front and back probes swap world sides when the character turns,
    /// so the side each overlap stands for depends on `facing`.
    pub fn sample(&self, origin: Vec2, facing: Facing, probe: &impl CollisionProbe) -> CollisionResult {
        let probes = self.probes;
        let sign = facing.sign();

        let grounded = probe.overlaps(
            origin + probes.ground_offset,
            probes.ground_half_extents,
            probes.layer_mask,
        );
        let front = probe.overlaps(
            origin + ProbeConfig::oriented(probes.front_wall_offset, sign),
            probes.wall_half_extents,
            probes.layer_mask,
        );
        let back = probe.overlaps(
            origin + ProbeConfig::oriented(probes.back_wall_offset, sign),
            probes.wall_half_extents,
            probes.layer_mask,
        );

        let (wall_right, wall_left) = match facing {
            Facing::Right => (front, back),
            Facing::Left => (back, front),
        };

        CollisionResult {
            grounded,
            wall_left,
            wall_right,
        }
    }

    /// Reset the grace timers touched by `contacts`.
    pub fn apply(&self, contacts: CollisionResult, timers: &mut TimerBank) {
        if contacts.grounded {
            timers.reset(TimerId::OnGround, self.grace_window);
        }
        if contacts.wall_right {
            timers.reset(TimerId::OnWallRight, self.grace_window);
        }
        if contacts.wall_left {
            timers.reset(TimerId::OnWallLeft, self.grace_window);
        }

        let on_wall = timers
            .get(TimerId::OnWallLeft)
            .max(timers.get(TimerId::OnWallRight));
        timers.reset(TimerId::OnWall, on_wall);
    }

    /// Sample the probes and apply the result.
    pub fn refresh(
        &self,
        origin: Vec2,
        facing: Facing,
        probe: &impl CollisionProbe,
        timers: &mut TimerBank,
    ) -> CollisionResult {
        let contacts = self.sample(origin, facing, probe);
        self.apply(contacts, timers);
        contacts
    }
}
