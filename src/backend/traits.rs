//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement to
//! drive characters. The state machine only sees a `MotorBody`; the backend
//! maps those calls onto its engine's components.

use bevy::ecs::schedule::InternedScheduleLabel;
use bevy::prelude::*;

use crate::error::ControllerError;

/// Trait for physics backend implementations.
///
/// All functions are static and operate on the [`World`], so the controller
/// systems can stay generic over the engine. Impulses and forces are given
/// per unit mass.
///
/// A backend plugin must register a system in
/// [`PlatformerControllerSet::Sensors`](crate::PlatformerControllerSet::Sensors)
/// of the frame schedule that refreshes contacts for every ready character, and
/// should use `ForceReset` / `FinalApplication` in `FixedUpdate` if forces
/// are accumulated.
///
/// See `Avian2dBackend` for the reference implementation.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// The velocity component type used by this backend.
    type VelocityComponent: Component;

    /// Returns the plugin that sets up this backend.
    ///
    /// `frame_schedule` is the schedule the controller runs its frame step in.
    fn plugin(frame_schedule: InternedScheduleLabel) -> impl Plugin;

    /// Get the current velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Set the velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Apply an impulse to an entity.
    ///
    /// The impulse is an instantaneous velocity change.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2);

    /// Apply a force to an entity.
    ///
    /// The force acts over the current physics step.
    fn apply_force(world: &mut World, entity: Entity, force: Vec2);

    /// Get the gravity scale of an entity.
    fn get_gravity_scale(world: &World, entity: Entity) -> f32;

    /// Set the gravity scale of an entity.
    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32);

    /// Check that the entity has a body this backend can drive and insert
    /// whatever the backend needs on it.
    ///
    /// Called once per character, before its first frame step.
    fn prepare_body(world: &mut World, entity: Entity) -> Result<(), ControllerError>;
}
