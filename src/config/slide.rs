//! Configuration for wall sliding.

use bevy::prelude::*;

/// Configuration for wall sliding.
///
/// Sliding drives vertical velocity toward zero with the same power curve
/// as running.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct SlideConfig {
    /// Acceleration rate toward zero vertical velocity.
    pub acceleration: f32,

    /// Curve exponent of the slide force.
    pub power: f32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            acceleration: 3.0,
            power: 1.5,
        }
    }
}
