//! Controller systems.
//!
//! The frame step and the physics step run as exclusive systems so they can
//! hand the backend a `&mut World` per character. Each character is collected
//! first, stepped on a copy of its state, and written back.

use std::marker::PhantomData;

use bevy::prelude::*;

use crate::MovementEvent;
use crate::backend::CharacterPhysicsBackend;
use crate::config::MovementConfig;
use crate::error::{ControllerError, ControllerFault, ControllerReady};
use crate::intent::PlatformerInput;
use crate::machine::{AbilityStateMachine, FrameEvents, MotorBody};
use crate::state::MovementState;

/// [`MotorBody`] view of one entity through a physics backend.
struct BackendBody<'w, B> {
    world: &'w mut World,
    entity: Entity,
    _marker: PhantomData<B>,
}

impl<'w, B: CharacterPhysicsBackend> BackendBody<'w, B> {
    fn new(world: &'w mut World, entity: Entity) -> Self {
        Self {
            world,
            entity,
            _marker: PhantomData,
        }
    }
}

impl<B: CharacterPhysicsBackend> MotorBody for BackendBody<'_, B> {
    fn velocity(&self) -> Vec2 {
        B::get_velocity(self.world, self.entity)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        B::set_velocity(self.world, self.entity, velocity);
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        B::apply_impulse(self.world, self.entity, impulse);
    }

    fn apply_force(&mut self, force: Vec2) {
        B::apply_force(self.world, self.entity, force);
    }

    fn gravity_scale(&self) -> f32 {
        B::get_gravity_scale(self.world, self.entity)
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        B::set_gravity_scale(self.world, self.entity, scale);
    }
}

/// Validate and prepare characters that have not been prepared yet.
pub(crate) fn prepare_characters<B: CharacterPhysicsBackend>(world: &mut World) {
    let mut query = world.query_filtered::<
        (Entity, Option<&MovementConfig>),
        (
            With<MovementState>,
            Without<ControllerReady>,
            Without<ControllerFault>,
        ),
    >();
    let pending: Vec<(Entity, Option<MovementConfig>)> = query
        .iter(world)
        .map(|(entity, config)| (entity, config.copied()))
        .collect();

    for (entity, config) in pending {
        let result = prepare_character::<B>(world, entity, config);
        let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
            continue;
        };

        match result {
            Ok(()) => {
                entity_mut.insert(ControllerReady);
                debug!("character {entity} ready");
            }
            Err(err) => {
                error!("failed to prepare character {entity}: {err}");
                entity_mut.insert(ControllerFault(err));
            }
        }
    }
}

fn prepare_character<B: CharacterPhysicsBackend>(
    world: &mut World,
    entity: Entity,
    config: Option<MovementConfig>,
) -> Result<(), ControllerError> {
    let config = config.ok_or(ControllerError::MissingConfig(entity))?;
    config.validate()?;
    B::prepare_body(world, entity)?;
    B::set_gravity_scale(world, entity, config.gravity.scale);
    Ok(())
}

/// Poll input, advance timers and update facing.
pub(crate) fn begin_frame<B: CharacterPhysicsBackend>(
    time: Res<Time>,
    mut q_characters: Query<
        (
            Entity,
            &MovementConfig,
            &mut MovementState,
            &mut PlatformerInput,
        ),
        (With<ControllerReady>, With<B::VelocityComponent>),
    >,
    mut messages: MessageWriter<MovementEvent>,
) {
    let dt = time.delta_secs();

    for (entity, config, mut state, mut input) in &mut q_characters {
        let snapshot = input.poll();
        let events = AbilityStateMachine::new(config, &mut state).begin_frame(dt, snapshot);
        messages.write_batch(events.into_iter().map(|kind| MovementEvent { entity, kind }));
    }
}

fn ready_characters<B: CharacterPhysicsBackend>(
    world: &mut World,
) -> Vec<(Entity, MovementConfig, MovementState)> {
    let mut query = world.query_filtered::<
        (Entity, &MovementConfig, &MovementState),
        (With<ControllerReady>, With<B::VelocityComponent>),
    >();
    query
        .iter(world)
        .map(|(entity, config, state)| (entity, *config, state.clone()))
        .collect()
}

fn store_state(world: &mut World, entity: Entity, state: MovementState) {
    if let Some(mut stored) = world.get_mut::<MovementState>(entity) {
        *stored = state;
    }
}

fn write_events(world: &mut World, entity: Entity, events: FrameEvents) {
    for kind in events {
        world.write_message(MovementEvent { entity, kind });
    }
}

/// Gravity and mode transitions for every ready character.
pub(crate) fn resolve_frame<B: CharacterPhysicsBackend>(world: &mut World) {
    for (entity, config, mut state) in ready_characters::<B>(world) {
        let events = {
            let mut body = BackendBody::<B>::new(world, entity);
            AbilityStateMachine::new(&config, &mut state).resolve_frame(&mut body)
        };

        store_state(world, entity, state);
        write_events(world, entity, events);
    }
}

/// Drag, run and slide forces for every ready character.
pub(crate) fn physics_step<B: CharacterPhysicsBackend>(world: &mut World) {
    for (entity, config, mut state) in ready_characters::<B>(world) {
        {
            let mut body = BackendBody::<B>::new(world, entity);
            AbilityStateMachine::new(&config, &mut state).physics_step(&mut body);
        }

        store_state(world, entity, state);
    }
}
