//! Integration tests for the platformer controller with the Avian2D backend.
//!
//! These tests run the real physics simulation and check the controller
//! through velocities, positions and its published messages.

#![cfg(feature = "avian2d")]

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use msg_platformer_controller::avian::AvianMotorForces;
use msg_platformer_controller::prelude::*;

const FIXED_UPDATE_HZ: f64 = 60.0;

#[derive(Resource, Default)]
struct Recorded(Vec<MovementEvent>);

fn record_events(mut reader: MessageReader<MovementEvent>, mut recorded: ResMut<Recorded>) {
    recorded.0.extend(reader.read().copied());
}

/// Create a minimal test app with physics and the platformer controller.
fn create_test_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);
    app.add_plugins(TransformPlugin);
    // Insert SceneSpawner resource to satisfy Avian's ColliderHierarchyPlugin
    app.insert_resource(bevy::scene::SceneSpawner::default());
    // Controller forces run in FixedUpdate, physics in FixedPostUpdate
    app.add_plugins(PhysicsPlugins::default());
    app.add_plugins(PlatformerControllerPlugin::<Avian2dBackend>::default());
    app.insert_resource(Time::<Fixed>::from_hz(FIXED_UPDATE_HZ));
    // One fixed step per update
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / FIXED_UPDATE_HZ,
    )));
    app.init_resource::<Recorded>();
    app.add_systems(Update, record_events);

    app.finish();
    app.cleanup();
    app
}

/// Spawn a static box collider.
fn spawn_block(app: &mut App, position: Vec2, half_size: Vec2) -> Entity {
    let transform = Transform::from_translation(position.extend(0.0));
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Static,
            Collider::rectangle(half_size.x * 2.0, half_size.y * 2.0),
        ))
        .id()
}

/// Flat ground whose top surface is at y = 0.5.
fn spawn_ground(app: &mut App) -> Entity {
    spawn_block(app, Vec2::ZERO, Vec2::new(50.0, 0.5))
}

/// Spawn a 1x2 character whose center is at `position`.
fn spawn_character(app: &mut App, position: Vec2) -> Entity {
    let transform = Transform::from_translation(position.extend(0.0));
    app.world_mut()
        .spawn((
            transform,
            GlobalTransform::from(transform),
            RigidBody::Dynamic,
            Collider::rectangle(1.0, 2.0),
            LockedAxes::ROTATION_LOCKED,
            MovementConfig::default(),
            MovementState::new(),
        ))
        .id()
}

fn run_frames(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn state(app: &App, entity: Entity) -> &MovementState {
    app.world().get::<MovementState>(entity).unwrap()
}

fn with_input(app: &mut App, entity: Entity, f: impl FnOnce(&mut PlatformerInput)) {
    if let Some(mut input) = app.world_mut().get_mut::<PlatformerInput>(entity) {
        f(&mut input);
    }
}

fn recorded(app: &App, entity: Entity) -> Vec<MovementEventKind> {
    app.world()
        .resource::<Recorded>()
        .0
        .iter()
        .filter(|e| e.entity == entity)
        .map(|e| e.kind)
        .collect()
}

// ==================== Preparation Tests ====================

mod preparation {
    use super::*;

    #[test]
    fn dynamic_body_is_prepared() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, Vec2::new(0.0, 10.0));

        app.update();

        let world = app.world();
        assert!(world.get::<ControllerReady>(character).is_some());
        assert!(world.get::<AvianMotorForces>(character).is_some());
        assert!(world.get::<ConstantForce>(character).is_some());

        // Initial gravity scale comes from the config.
        let scale = world.get::<GravityScale>(character).map(|g| g.0);
        assert_eq!(scale, Some(MovementConfig::default().gravity.scale));
    }

    #[test]
    fn static_body_is_rejected() {
        let mut app = create_test_app();
        let character = app
            .world_mut()
            .spawn((
                Transform::default(),
                RigidBody::Static,
                Collider::rectangle(1.0, 2.0),
                MovementConfig::default(),
                MovementState::new(),
            ))
            .id();

        run_frames(&mut app, 2);

        let fault = app.world().get::<ControllerFault>(character).unwrap();
        assert!(matches!(
            fault.0,
            ControllerError::UnsupportedBody { entity, .. } if entity == character
        ));
        assert!(app.world().get::<ControllerReady>(character).is_none());
    }
}

// ==================== Detection Tests ====================

mod detection {
    use super::*;

    #[test]
    fn resting_on_ground_is_grounded() {
        let mut app = create_test_app();
        spawn_ground(&mut app);
        let character = spawn_character(&mut app, Vec2::new(0.0, 1.6));

        run_frames(&mut app, 60);

        let state = state(&app, character);
        assert!(
            state.on_ground_time() > 0.0,
            "on_ground_time = {}",
            state.on_ground_time()
        );
        // The character's own collider never counts as a wall.
        assert!(state.on_wall_time() <= 0.0);
    }

    #[test]
    fn falling_character_is_not_grounded() {
        let mut app = create_test_app();
        let character = spawn_character(&mut app, Vec2::new(0.0, 100.0));

        run_frames(&mut app, 30);

        assert!(state(&app, character).on_ground_time() <= 0.0);
        let velocity = app.world().get::<LinearVelocity>(character).unwrap();
        assert!(velocity.y < 0.0);
    }

    #[test]
    fn detects_wall_on_right() {
        let mut app = create_test_app();
        spawn_ground(&mut app);
        // Wall face at x = 1.0.
        spawn_block(&mut app, Vec2::new(1.5, 3.0), Vec2::new(0.5, 2.5));
        let character = spawn_character(&mut app, Vec2::new(0.5, 1.5));

        run_frames(&mut app, 30);

        let state = state(&app, character);
        assert!(state.on_wall_right_time() > 0.0);
        assert!(state.on_wall_left_time() <= 0.0);
    }

    #[test]
    fn probe_ignores_other_layers() {
        let mut app = create_test_app();
        let ground = spawn_ground(&mut app);
        app.world_mut()
            .entity_mut(ground)
            .insert(CollisionLayers::new(LayerMask(1 << 1), LayerMask::ALL));

        let mut config = MovementConfig::default();
        config.probes.layer_mask = 1 << 0;
        let character = spawn_character(&mut app, Vec2::new(0.0, 1.6));
        app.world_mut().entity_mut(character).insert(config);

        run_frames(&mut app, 60);

        // Physically resting on the ground, but the probes only see layer 0.
        assert!(state(&app, character).on_ground_time() <= 0.0);
    }
}

// ==================== Movement Tests ====================

mod movement {
    use super::*;

    #[test]
    fn jump_from_ground_rises() {
        let mut app = create_test_app();
        spawn_ground(&mut app);
        let character = spawn_character(&mut app, Vec2::new(0.0, 1.6));
        run_frames(&mut app, 60);
        let start_y = app.world().get::<Transform>(character).unwrap().translation.y;

        with_input(&mut app, character, |input| input.press_jump());
        run_frames(&mut app, 2);

        assert!(recorded(&app, character).contains(&MovementEventKind::Jumped));
        let velocity = app.world().get::<LinearVelocity>(character).unwrap();
        assert!(velocity.y > 5.0, "vy = {}", velocity.y);

        run_frames(&mut app, 10);
        let y = app.world().get::<Transform>(character).unwrap().translation.y;
        assert!(y > start_y + 0.5, "y = {y}, start = {start_y}");
    }

    #[test]
    fn run_input_moves_character() {
        let mut app = create_test_app();
        spawn_ground(&mut app);
        let character = spawn_character(&mut app, Vec2::new(0.0, 1.6));
        run_frames(&mut app, 30);
        let start_x = app.world().get::<Transform>(character).unwrap().translation.x;

        with_input(&mut app, character, |input| input.set_move(Vec2::X));
        run_frames(&mut app, 60);

        let x = app.world().get::<Transform>(character).unwrap().translation.x;
        let velocity = app.world().get::<LinearVelocity>(character).unwrap();
        assert!(x > start_x + 1.0, "x = {x}, start = {start_x}");
        assert!(velocity.x > 0.0);
        assert!(velocity.x <= MovementConfig::default().run.max_speed + 0.5);
    }

    #[test]
    fn dash_sets_velocity_and_disables_gravity() {
        let mut app = create_test_app();
        spawn_ground(&mut app);
        let character = spawn_character(&mut app, Vec2::new(0.0, 1.6));
        run_frames(&mut app, 30);
        assert_eq!(state(&app, character).dashes_left(), 1);

        with_input(&mut app, character, |input| {
            input.set_move(Vec2::X);
            input.press_dash();
        });
        run_frames(&mut app, 2);

        assert!(state(&app, character).is_dash_attacking());
        assert_eq!(state(&app, character).dashes_left(), 0);
        let world = app.world();
        assert_eq!(world.get::<GravityScale>(character).map(|g| g.0), Some(0.0));
        let velocity = world.get::<LinearVelocity>(character).unwrap();
        assert!(velocity.x > 10.0, "vx = {}", velocity.x);

        run_frames(&mut app, 60);
        assert_eq!(state(&app, character).mode(), MovementMode::Idle);
        // Gravity is back (base or fall scale, depending on the resting velocity).
        let scale = app.world().get::<GravityScale>(character).map(|g| g.0);
        assert!(scale.is_some_and(|s| s >= MovementConfig::default().gravity.scale));
    }
}
