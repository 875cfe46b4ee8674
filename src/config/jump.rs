//! Configuration for core jump mechanics.

use bevy::prelude::*;

/// Configuration for core jump mechanics.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct JumpConfig {
    /// Upward impulse of a jump (per unit mass).
    pub force: f32,

    /// Fraction of upward velocity kept when the jump button is released early (0.0-1.0).
    pub cut_multiplier: f32,

    /// Jump buffer duration in seconds.
    pub buffer_time: f32,

    /// Coyote time duration in seconds. Also used as the wall contact grace window.
    pub coyote_time: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            force: 13.0,
            cut_multiplier: 0.4,
            buffer_time: 0.1,
            coyote_time: 0.15,
        }
    }
}
