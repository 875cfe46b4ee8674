//! Avian2D physics backend implementation.
//!
//! This module provides the physics backend for Avian2D (`avian2d`).
//! Enable with the `avian2d` feature.

use avian2d::prelude::*;
use bevy::ecs::schedule::InternedScheduleLabel;
use bevy::prelude::*;

use crate::PlatformerControllerSet;
use crate::backend::CharacterPhysicsBackend;
use crate::config::MovementConfig;
use crate::detection::CollisionProbe;
use crate::error::{ControllerError, ControllerReady};
use crate::machine::AbilityStateMachine;
use crate::state::MovementState;

/// Per-step controller forces on an Avian body.
///
/// Forces are accumulated (per unit mass) during the physics step and added to
/// [`ConstantForce`] at the end of it. The share we added is subtracted again
/// before the next step, so forces applied by other code are preserved.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct AvianMotorForces {
    accumulated: Vec2,
    applied: Vec2,
}

impl AvianMotorForces {
    /// Forces accumulated in the current step, per unit mass.
    pub fn accumulated(&self) -> Vec2 {
        self.accumulated
    }

    /// Force currently added to the body's [`ConstantForce`].
    pub fn applied(&self) -> Vec2 {
        self.applied
    }

    fn add_force(&mut self, force: Vec2) {
        self.accumulated += force;
    }

    /// Clear the accumulator and return the force to subtract.
    fn prepare_new_step(&mut self) -> Vec2 {
        self.accumulated = Vec2::ZERO;
        std::mem::take(&mut self.applied)
    }

    /// Convert the accumulator to a force and remember it for subtraction.
    fn finalize_step(&mut self, mass: f32) -> Vec2 {
        self.applied = self.accumulated * mass;
        self.applied
    }
}

/// Avian2D physics backend for the platformer controller.
///
/// The body is driven through [`LinearVelocity`], [`GravityScale`] and
/// [`ConstantForce`]. Ground and wall probes are box overlap queries through
/// [`SpatialQuery`].
pub struct Avian2dBackend;

impl CharacterPhysicsBackend for Avian2dBackend {
    type VelocityComponent = LinearVelocity;

    fn plugin(frame_schedule: InternedScheduleLabel) -> impl Plugin {
        Avian2dBackendPlugin { frame_schedule }
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<LinearVelocity>(entity)
            .map(|v| v.0)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) {
        // Per unit mass: the impulse is the velocity change.
        if let Some(mut vel) = world.get_mut::<LinearVelocity>(entity) {
            vel.0 += impulse;
        }
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec2) {
        // Written to ConstantForce by apply_motor_forces at the end of the step.
        if let Some(mut forces) = world.get_mut::<AvianMotorForces>(entity) {
            forces.add_force(force);
        }
    }

    fn get_gravity_scale(world: &World, entity: Entity) -> f32 {
        world
            .get::<GravityScale>(entity)
            .map(|g| g.0)
            .unwrap_or(1.0)
    }

    fn set_gravity_scale(world: &mut World, entity: Entity, scale: f32) {
        if let Some(mut gravity) = world.get_mut::<GravityScale>(entity) {
            gravity.0 = scale;
        } else if let Ok(mut entity_mut) = world.get_entity_mut(entity) {
            entity_mut.insert(GravityScale(scale));
        }
    }

    fn prepare_body(world: &mut World, entity: Entity) -> Result<(), ControllerError> {
        match world.get::<RigidBody>(entity) {
            None => return Err(ControllerError::MissingRigidBody(entity)),
            Some(RigidBody::Dynamic) => {}
            Some(_) => {
                return Err(ControllerError::UnsupportedBody {
                    entity,
                    reason: "expected a dynamic rigid body",
                });
            }
        }

        let mut entity_mut = world
            .get_entity_mut(entity)
            .map_err(|_| ControllerError::MissingRigidBody(entity))?;
        entity_mut.insert_if_new((
            GravityScale(1.0),
            ConstantForce(Vec2::ZERO),
            AvianMotorForces::default(),
        ));

        Ok(())
    }
}

/// Plugin that sets up Avian2D-specific systems for the platformer controller.
pub struct Avian2dBackendPlugin {
    frame_schedule: InternedScheduleLabel,
}

impl Plugin for Avian2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<AvianMotorForces>();

        app.add_systems(
            self.frame_schedule,
            avian_probe_detection.in_set(PlatformerControllerSet::Sensors),
        );

        app.add_systems(
            FixedUpdate,
            clear_motor_forces.in_set(PlatformerControllerSet::ForceReset),
        );
        app.add_systems(
            FixedUpdate,
            apply_motor_forces.in_set(PlatformerControllerSet::FinalApplication),
        );
    }
}

/// Box overlap probe through [`SpatialQuery`], ignoring the character itself.
struct AvianProbe<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    exclude: Entity,
}

impl CollisionProbe for AvianProbe<'_, '_, '_> {
    fn overlaps(&self, center: Vec2, half_extents: Vec2, layer_mask: u32) -> bool {
        let shape = Collider::rectangle(half_extents.x * 2.0, half_extents.y * 2.0);
        let filter = SpatialQueryFilter::from_mask(LayerMask(layer_mask))
            .with_excluded_entities([self.exclude]);

        !self
            .spatial_query
            .shape_intersections(&shape, center, 0.0, &filter)
            .is_empty()
    }
}

/// Refresh ground and wall contacts of every ready character.
fn avian_probe_detection(
    spatial_query: SpatialQuery,
    mut q_characters: Query<
        (Entity, &GlobalTransform, &MovementConfig, &mut MovementState),
        (With<ControllerReady>, With<LinearVelocity>),
    >,
) {
    for (entity, transform, config, mut state) in &mut q_characters {
        let probe = AvianProbe {
            spatial_query: &spatial_query,
            exclude: entity,
        };
        let origin = transform.translation().xy();

        AbilityStateMachine::new(config, &mut state).refresh_contacts(origin, &probe);
    }
}

/// Remove last step's controller forces from [`ConstantForce`].
pub fn clear_motor_forces(mut q: Query<(&mut AvianMotorForces, &mut ConstantForce)>) {
    for (mut forces, mut constant_force) in &mut q {
        constant_force.0 -= forces.prepare_new_step();
    }
}

/// Add this step's accumulated controller forces to [`ConstantForce`].
pub fn apply_motor_forces(
    mut q: Query<(
        &mut AvianMotorForces,
        &mut ConstantForce,
        Option<&ComputedMass>,
    )>,
) {
    for (mut forces, mut constant_force, computed_mass) in &mut q {
        let mass = computed_mass
            .map(|m| m.value())
            .filter(|m| m.is_finite() && *m > 0.0)
            .unwrap_or(0.0);

        constant_force.0 += forces.finalize_step(mass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::transform::TransformPlugin);
        // Insert SceneSpawner resource required by Avian's ColliderHierarchyPlugin
        app.insert_resource(bevy::scene::SceneSpawner::default());
        app.add_plugins(PhysicsPlugins::default());
        app.insert_resource(Time::<Fixed>::from_hz(60.0));
        app.finish();
        app.cleanup();
        app
    }

    #[test]
    fn avian_backend_velocity() {
        let mut app = create_test_app();

        let entity = app
            .world_mut()
            .spawn((
                Transform::default(),
                RigidBody::Dynamic,
                LinearVelocity(Vec2::new(50.0, 30.0)),
            ))
            .id();

        app.update();

        let vel = Avian2dBackend::get_velocity(app.world(), entity);
        assert!((vel.x - 50.0).abs() < 0.01);
        assert!((vel.y - 30.0).abs() < 0.01);

        Avian2dBackend::set_velocity(app.world_mut(), entity, Vec2::new(100.0, 0.0));
        Avian2dBackend::apply_impulse(app.world_mut(), entity, Vec2::new(0.0, 5.0));

        let vel = Avian2dBackend::get_velocity(app.world(), entity);
        assert!((vel.x - 100.0).abs() < 0.01);
        assert!((vel.y - 5.0).abs() < 0.01);
    }

    #[test]
    fn gravity_scale_inserted_when_missing() {
        let mut app = create_test_app();
        let entity = app
            .world_mut()
            .spawn((Transform::default(), RigidBody::Dynamic))
            .id();

        Avian2dBackend::set_gravity_scale(app.world_mut(), entity, 0.0);
        assert_eq!(Avian2dBackend::get_gravity_scale(app.world(), entity), 0.0);

        Avian2dBackend::set_gravity_scale(app.world_mut(), entity, 3.0);
        assert_eq!(app.world().get::<GravityScale>(entity).map(|g| g.0), Some(3.0));
    }

    #[test]
    fn prepare_body_inserts_force_components() {
        let mut app = create_test_app();
        let entity = app
            .world_mut()
            .spawn((Transform::default(), RigidBody::Dynamic, GravityScale(0.5)))
            .id();

        assert_eq!(Avian2dBackend::prepare_body(app.world_mut(), entity), Ok(()));

        let world = app.world();
        assert!(world.get::<ConstantForce>(entity).is_some());
        assert!(world.get::<AvianMotorForces>(entity).is_some());
        // Existing components are kept.
        assert_eq!(world.get::<GravityScale>(entity).map(|g| g.0), Some(0.5));
    }

    #[test]
    fn prepare_body_rejects_missing_and_static_bodies() {
        let mut app = create_test_app();
        let bare = app.world_mut().spawn(Transform::default()).id();
        let wall = app
            .world_mut()
            .spawn((Transform::default(), RigidBody::Static))
            .id();

        assert_eq!(
            Avian2dBackend::prepare_body(app.world_mut(), bare),
            Err(ControllerError::MissingRigidBody(bare))
        );
        assert!(matches!(
            Avian2dBackend::prepare_body(app.world_mut(), wall),
            Err(ControllerError::UnsupportedBody { entity, .. }) if entity == wall
        ));
    }

    #[test]
    fn motor_forces_replace_previous_step() {
        let mut forces = AvianMotorForces::default();
        let mut constant_force = Vec2::new(1.0, 0.0);

        forces.add_force(Vec2::new(10.0, 0.0));
        forces.add_force(Vec2::new(0.0, 4.0));
        constant_force += forces.finalize_step(2.0);
        assert_eq!(constant_force, Vec2::new(21.0, 8.0));

        constant_force -= forces.prepare_new_step();
        assert_eq!(constant_force, Vec2::new(1.0, 0.0));
        assert_eq!(forces.accumulated(), Vec2::ZERO);
        assert_eq!(forces.applied(), Vec2::ZERO);
    }
}
