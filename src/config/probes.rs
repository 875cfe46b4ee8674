//! Configuration for ground and wall probe boxes.

use bevy::prelude::*;

/// Configuration for the three overlap probes used by ground and wall detection.
///
/// Offsets are in character-local space while facing right: `front_wall_offset`
/// normally has a positive X and `back_wall_offset` a negative X. When the
/// character faces left the X offsets are mirrored, so the two wall probes swap
/// world sides.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct ProbeConfig {
    /// Offset of the ground probe center from the character origin.
    pub ground_offset: Vec2,

    /// Half extents of the ground probe box.
    pub ground_half_extents: Vec2,

    /// Offset of the front wall probe center (facing right).
    pub front_wall_offset: Vec2,

    /// Offset of the back wall probe center (facing right).
    pub back_wall_offset: Vec2,

    /// Half extents of both wall probe boxes.
    pub wall_half_extents: Vec2,

    /// Collision layer mask the probes test against.
    pub layer_mask: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ground_offset: Vec2::new(0.0, -1.0),
            ground_half_extents: Vec2::new(0.49, 0.03),
            front_wall_offset: Vec2::new(0.5, 0.0),
            back_wall_offset: Vec2::new(-0.5, 0.0),
            wall_half_extents: Vec2::new(0.03, 0.5),
            layer_mask: u32::MAX,
        }
    }
}

impl ProbeConfig {
    /// Resolve a local probe offset into a world-space offset for the given facing sign.
    #[inline]
    pub fn oriented(offset: Vec2, facing_sign: f32) -> Vec2 {
        Vec2::new(offset.x * facing_sign, offset.y)
    }
}
