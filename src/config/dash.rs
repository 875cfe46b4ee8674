//! Configuration for the dash ability.

use bevy::prelude::*;

/// Configuration for the dash ability.
///
/// A dash has two phases. During the attack phase velocity is hard-set to
/// `speed` along the dash direction and gravity is disabled. During the end
/// phase the character slowly regains run control.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct DashConfig {
    /// Number of dashes available between landings.
    pub amount: u32,

    /// Speed of the dash (units/second).
    pub speed: f32,

    /// Duration (seconds) of the attack phase.
    pub attack_time: f32,

    /// Drag applied during the attack phase.
    pub attack_drag_amount: f32,

    /// Duration (seconds) of the end phase following the attack phase.
    pub end_time: f32,

    /// Lerp applied to the run force during the end phase (0.0-1.0).
    pub end_run_lerp: f32,

    /// Fraction of upward velocity kept when an upward dash ends (0.0-1.0).
    pub up_end_mult: f32,

    /// Dash buffer duration in seconds.
    pub buffer_time: f32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            amount: 1,
            speed: 15.0,
            attack_time: 0.15,
            attack_drag_amount: 0.0,
            end_time: 0.15,
            end_run_lerp: 0.5,
            up_end_mult: 0.6,
            buffer_time: 0.1,
        }
    }
}
