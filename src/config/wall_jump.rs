//! Configuration for wall jump mechanics.

use bevy::prelude::*;

/// Configuration for wall jump mechanics.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct WallJumpConfig {
    /// Impulse of a wall jump, for a jump toward +X. Mirrored for jumps to the left.
    pub force: Vec2,

    /// Lerp applied to the run force while wall jumping (0.0-1.0).
    pub run_lerp: f32,

    /// Duration (seconds) of the wall jump state.
    pub duration: f32,

    /// Whether the character turns to face the wall jump direction.
    pub turn_on_jump: bool,
}

impl Default for WallJumpConfig {
    fn default() -> Self {
        Self {
            force: Vec2::new(15.0, 18.0),
            run_lerp: 0.5,
            duration: 0.2,
            turn_on_jump: false,
        }
    }
}
