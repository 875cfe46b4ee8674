//! Configuration for horizontal running.

use bevy::prelude::*;

/// Configuration for horizontal running (ground and air).
///
/// The run force is computed from the gap between the target speed and
/// the current horizontal velocity, scaled by an acceleration rate and raised
/// to one of three curve exponents depending on whether the character is
/// accelerating, stopping or turning around.
#[derive(Reflect, Debug, Clone, Copy)]
pub struct RunConfig {
    /// Target horizontal speed at full input (units/second).
    pub max_speed: f32,

    /// Acceleration rate used while there is movement input.
    pub acceleration: f32,

    /// Deceleration rate used when there is no movement input.
    pub deceleration: f32,

    /// Multiplier applied to `acceleration` while airborne (0.0-1.0).
    pub air_acceleration_mult: f32,

    /// Multiplier applied to `deceleration` while airborne (0.0-1.0).
    pub air_deceleration_mult: f32,

    /// Curve exponent while accelerating toward the input direction.
    pub accel_power: f32,

    /// Curve exponent while stopping (no input).
    pub stop_power: f32,

    /// Curve exponent while turning against current velocity.
    pub turn_power: f32,

    /// Never decelerate a character already moving faster than the target
    /// speed in the input direction. Only drag slows it down.
    pub keep_momentum: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_speed: 12.0,
            acceleration: 1.0,
            deceleration: 1.0,
            air_acceleration_mult: 0.5,
            air_deceleration_mult: 0.5,
            accel_power: 1.5,
            stop_power: 1.5,
            turn_power: 1.5,
            keep_momentum: false,
        }
    }
}
