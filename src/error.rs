//! Controller setup errors.
//!
//! Steady-state stepping never fails. Everything here is reported once, when a
//! character is prepared, before its first frame update.

use bevy::prelude::*;
use thiserror::Error;

/// Errors raised while validating a configuration or preparing a character.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    /// A tunable is out of its accepted range.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field (e.g. `run.accel_power`).
        field: &'static str,
        /// What the field must satisfy.
        reason: &'static str,
    },

    /// The character has a `MovementState` but no `MovementConfig`.
    #[error("entity {0} has a MovementState but no MovementConfig")]
    MissingConfig(Entity),

    /// The physics backend found no rigid body on the character.
    #[error("entity {0} has no rigid body for the physics backend")]
    MissingRigidBody(Entity),

    /// The character's rigid body cannot be driven by the controller.
    #[error("entity {entity} has an unsupported rigid body: {reason}")]
    UnsupportedBody {
        /// The offending character.
        entity: Entity,
        /// Why the body was rejected.
        reason: &'static str,
    },
}

/// Marker inserted once a character passed preparation and may be stepped.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ControllerReady;

/// Inserted instead of [`ControllerReady`] when preparation failed.
///
/// Faulted characters are never stepped.
#[derive(Component, Debug, Clone)]
pub struct ControllerFault(pub ControllerError);
