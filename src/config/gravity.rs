//! Configuration for gravity scaling and drag.

use bevy::prelude::*;

/// Configuration for dynamic gravity scaling.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct GravityConfig {
    /// Base gravity scale written to the body.
    pub scale: f32,

    /// Gravity multiplier while falling.
    pub fall_mult: f32,

    /// Gravity multiplier while falling with downward input held.
    pub quick_fall_mult: f32,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            fall_mult: 1.5,
            quick_fall_mult: 2.0,
        }
    }
}

/// Configuration for drag and friction impulses.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct DragConfig {
    /// Drag impulse per physics step while airborne (and during dash end).
    pub drag_amount: f32,

    /// Drag impulse per physics step while grounded.
    pub friction_amount: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_amount: 0.1,
            friction_amount: 0.25,
        }
    }
}
