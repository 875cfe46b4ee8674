//! Power-curve acceleration for running and sliding, and drag.
//!
//! Forces are computed from the differential between a target speed and the
//! current speed. The differential is scaled by an acceleration rate and raised
//! to a tunable exponent, which gives non-linear, speed-dependent acceleration.
//! The base of the power is always an absolute value and the sign is re-applied
//! afterwards, so a fractional exponent never sees a negative base.

use bevy::math::FloatExt;
use bevy::prelude::*;

use crate::config::{RunConfig, SlideConfig};

/// Speeds below this magnitude count as "no target speed".
pub const SPEED_EPSILON: f32 = 0.01;

/// Sign of `value`, with `sign(0) == 0`.
///
/// `f32::signum` returns `1.0` for `+0.0`, which would turn a zero
/// differential into a unit push.
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// `sign(diff) * (|diff| * rate) ^ power`.
#[inline]
fn power_curve(speed_diff: f32, rate: f32, power: f32) -> f32 {
    (speed_diff.abs() * rate).powf(power) * sign(speed_diff)
}

/// Horizontal run force for one physics step.
///
/// `lerp_amount` below 1 blends the force toward the current velocity so that
/// run control is regained gradually (wall jump recovery, dash end).
pub fn run_force(
    config: &RunConfig,
    velocity_x: f32,
    move_x: f32,
    grounded: bool,
    lerp_amount: f32,
) -> f32 {
    let target_speed = move_x * config.max_speed;
    let speed_diff = target_speed - velocity_x;
    let has_target = target_speed.abs() > SPEED_EPSILON;

    let mut accel_rate = match (grounded, has_target) {
        (true, true) => config.acceleration,
        (true, false) => config.deceleration,
        (false, true) => config.acceleration * config.air_acceleration_mult,
        (false, false) => config.deceleration * config.air_deceleration_mult,
    };

    let overshooting = (velocity_x > target_speed && target_speed > SPEED_EPSILON)
        || (velocity_x < target_speed && target_speed < -SPEED_EPSILON);
    if overshooting && config.keep_momentum {
        accel_rate = 0.0;
    }

    let vel_power = if target_speed.abs() < SPEED_EPSILON {
        config.stop_power
    } else if velocity_x.abs() > 0.0 && sign(target_speed) != sign(velocity_x) {
        config.turn_power
    } else {
        config.accel_power
    };

    let movement = power_curve(speed_diff, accel_rate, vel_power);
    velocity_x.lerp(movement, lerp_amount)
}

/// Vertical slide force driving vertical velocity toward zero.
pub fn slide_force(config: &SlideConfig, velocity_y: f32) -> f32 {
    let speed_diff = 0.0 - velocity_y;
    power_curve(speed_diff, config.acceleration, config.power)
}

/// Impulse opposing `velocity` with magnitude `amount` along its direction.
///
/// Each axis is clamped to the current speed on that axis, so drag can stop
/// motion but never reverse it.
pub fn drag_impulse(velocity: Vec2, amount: f32) -> Vec2 {
    let force = velocity.normalize_or_zero() * amount;
    let x = velocity.x.abs().min(force.x.abs()) * sign(velocity.x);
    let y = velocity.y.abs().min(force.y.abs()) * sign(velocity.y);
    -Vec2::new(x, y)
}
