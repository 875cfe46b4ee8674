//! Movement configuration.
//!
//! [`MovementConfig`] groups the per-concern tunables into one component. It is
//! supplied when a character is spawned and only ever read by the controller.

use bevy::prelude::*;

mod dash;
mod gravity;
mod jump;
mod probes;
mod run;
mod slide;
mod wall_jump;

pub use dash::DashConfig;
pub use gravity::{DragConfig, GravityConfig};
pub use jump::JumpConfig;
pub use probes::ProbeConfig;
pub use run::RunConfig;
pub use slide::SlideConfig;
pub use wall_jump::WallJumpConfig;

use crate::error::ControllerError;

/// Immutable movement tunables for one character.
///
/// # Example
///
/// ```rust
/// use msg_platformer_controller::prelude::*;
///
/// let mut config = MovementConfig::default();
/// config.dash.amount = 2;
/// config.run.keep_momentum = true;
/// assert!(config.validate().is_ok());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct MovementConfig {
    /// Horizontal running.
    pub run: RunConfig,
    /// Jumping, jump buffering and coyote time.
    pub jump: JumpConfig,
    /// Wall jumping.
    pub wall_jump: WallJumpConfig,
    /// Wall sliding.
    pub slide: SlideConfig,
    /// Dash ability.
    pub dash: DashConfig,
    /// Gravity scaling.
    pub gravity: GravityConfig,
    /// Drag and friction.
    pub drag: DragConfig,
    /// Ground and wall probes.
    pub probes: ProbeConfig,
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ControllerError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ControllerError::InvalidConfig {
            field,
            reason: "must be finite and >= 0",
        })
    }
}

fn exponent(field: &'static str, value: f32) -> Result<(), ControllerError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ControllerError::InvalidConfig {
            field,
            reason: "must be finite and > 0",
        })
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ControllerError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ControllerError::InvalidConfig {
            field,
            reason: "must be within [0, 1]",
        })
    }
}

fn positive_extents(field: &'static str, value: Vec2) -> Result<(), ControllerError> {
    if value.is_finite() && value.x > 0.0 && value.y > 0.0 {
        Ok(())
    } else {
        Err(ControllerError::InvalidConfig {
            field,
            reason: "both half extents must be finite and > 0",
        })
    }
}

impl MovementConfig {
    /// Check every tunable against its accepted range.
    pub fn validate(&self) -> Result<(), ControllerError> {
        let run = &self.run;
        non_negative("run.max_speed", run.max_speed)?;
        non_negative("run.acceleration", run.acceleration)?;
        non_negative("run.deceleration", run.deceleration)?;
        unit_interval("run.air_acceleration_mult", run.air_acceleration_mult)?;
        unit_interval("run.air_deceleration_mult", run.air_deceleration_mult)?;
        exponent("run.accel_power", run.accel_power)?;
        exponent("run.stop_power", run.stop_power)?;
        exponent("run.turn_power", run.turn_power)?;

        let jump = &self.jump;
        non_negative("jump.force", jump.force)?;
        unit_interval("jump.cut_multiplier", jump.cut_multiplier)?;
        non_negative("jump.buffer_time", jump.buffer_time)?;
        non_negative("jump.coyote_time", jump.coyote_time)?;

        let wall_jump = &self.wall_jump;
        if !wall_jump.force.is_finite() {
            return Err(ControllerError::InvalidConfig {
                field: "wall_jump.force",
                reason: "must be finite",
            });
        }
        unit_interval("wall_jump.run_lerp", wall_jump.run_lerp)?;
        non_negative("wall_jump.duration", wall_jump.duration)?;

        non_negative("slide.acceleration", self.slide.acceleration)?;
        exponent("slide.power", self.slide.power)?;

        let dash = &self.dash;
        non_negative("dash.speed", dash.speed)?;
        non_negative("dash.attack_time", dash.attack_time)?;
        non_negative("dash.attack_drag_amount", dash.attack_drag_amount)?;
        non_negative("dash.end_time", dash.end_time)?;
        unit_interval("dash.end_run_lerp", dash.end_run_lerp)?;
        unit_interval("dash.up_end_mult", dash.up_end_mult)?;
        non_negative("dash.buffer_time", dash.buffer_time)?;

        non_negative("gravity.scale", self.gravity.scale)?;
        non_negative("gravity.fall_mult", self.gravity.fall_mult)?;
        non_negative("gravity.quick_fall_mult", self.gravity.quick_fall_mult)?;

        non_negative("drag.drag_amount", self.drag.drag_amount)?;
        non_negative("drag.friction_amount", self.drag.friction_amount)?;

        let probes = &self.probes;
        if !(probes.ground_offset.is_finite()
            && probes.front_wall_offset.is_finite()
            && probes.back_wall_offset.is_finite())
        {
            return Err(ControllerError::InvalidConfig {
                field: "probes.*_offset",
                reason: "must be finite",
            });
        }
        positive_extents("probes.ground_half_extents", probes.ground_half_extents)?;
        positive_extents("probes.wall_half_extents", probes.wall_half_extents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(MovementConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_exponent_rejected() {
        let mut config = MovementConfig::default();
        config.run.stop_power = 0.0;

        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            ControllerError::InvalidConfig {
                field: "run.stop_power",
                reason: "must be finite and > 0",
            }
        );
    }

    #[test]
    fn negative_duration_rejected() {
        let mut config = MovementConfig::default();
        config.dash.end_time = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ControllerError::InvalidConfig { field: "dash.end_time", .. })
        ));
    }

    #[test]
    fn lerp_outside_unit_interval_rejected() {
        let mut config = MovementConfig::default();
        config.wall_jump.run_lerp = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ControllerError::InvalidConfig { field: "wall_jump.run_lerp", .. })
        ));
    }

    #[test]
    fn nan_rejected() {
        let mut config = MovementConfig::default();
        config.run.max_speed = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = MovementConfig::default();
        config.jump.cut_multiplier = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn flat_probe_rejected() {
        let mut config = MovementConfig::default();
        config.probes.wall_half_extents = Vec2::new(0.0, 0.5);
        assert!(matches!(
            config.validate(),
            Err(ControllerError::InvalidConfig { field: "probes.wall_half_extents", .. })
        ));
    }

    #[test]
    fn error_message_names_field() {
        let mut config = MovementConfig::default();
        config.jump.buffer_time = -1.0;
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("jump.buffer_time"), "{message}");
    }
}
