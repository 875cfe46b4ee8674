//! # msg_platformer_controller
//!
//! Tick-driven 2D platformer movement and ability controller for Bevy.
//!
//! Characters get tuned running, buffered jumps with coyote time, wall jumps,
//! wall slides and a charge-limited dash. The controller drives a physics
//! body it does not own through the [`CharacterPhysicsBackend`] trait.
//!
//! ## Stepping
//!
//! - The **frame step** runs in `PreUpdate` by default: it polls
//!   [`PlatformerInput`], advances timers, probes for ground and walls and
//!   resolves every mode transition.
//! - The **physics step** runs in `FixedUpdate`: drag, run and slide forces.
//!
//! Transitions are published as [`MovementEvent`] messages.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use avian2d::prelude::*;
//! use msg_platformer_controller::prelude::*;
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn((
//!         Transform::default(),
//!         RigidBody::Dynamic,
//!         Collider::rectangle(1.0, 2.0),
//!         LockedAxes::ROTATION_LOCKED,
//!         MovementConfig::default(),
//!         MovementState::new(),
//!     ));
//! }
//!
//! App::new()
//!     .add_plugins(DefaultPlugins)
//!     .add_plugins(PhysicsPlugins::default())
//!     .add_plugins(PlatformerControllerPlugin::<Avian2dBackend>::default())
//!     .add_systems(Startup, setup)
//!     .run();
//! ```

use std::marker::PhantomData;

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

pub mod acceleration;
pub mod backend;
pub mod config;
pub mod detection;
pub mod error;
pub mod intent;
pub mod machine;
pub mod state;
mod systems;
pub mod timers;

#[cfg(feature = "avian2d")]
pub use backend::avian;

pub use backend::CharacterPhysicsBackend;
pub use config::MovementConfig;
pub use error::ControllerError;
pub use intent::PlatformerInput;
pub use machine::{AbilityStateMachine, MovementEventKind};
pub use state::MovementState;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::acceleration::{drag_impulse, run_force, sign, slide_force};
    pub use crate::backend::CharacterPhysicsBackend;
    pub use crate::config::{
        DashConfig, DragConfig, GravityConfig, JumpConfig, MovementConfig, ProbeConfig,
        RunConfig, SlideConfig, WallJumpConfig,
    };
    pub use crate::detection::{CollisionProbe, CollisionResult, GroundWallDetector};
    pub use crate::error::{ControllerError, ControllerFault, ControllerReady};
    pub use crate::intent::{InputSnapshot, PlatformerInput};
    pub use crate::machine::{AbilityStateMachine, FrameEvents, MotorBody, MovementEventKind};
    pub use crate::state::{Facing, MovementMode, MovementState};
    pub use crate::timers::{TimerBank, TimerId};
    pub use crate::{MovementEvent, PlatformerControllerPlugin, PlatformerControllerSet};

    #[cfg(feature = "avian2d")]
    pub use crate::backend::avian::Avian2dBackend;
}

/// System sets for the controller.
///
/// The frame phases run chained in the frame schedule, the force phases run
/// chained in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlatformerControllerSet {
    /// Validate and prepare newly spawned characters.
    Preparation,
    /// Poll input, tick timers, update facing.
    Timers,
    /// Backend probe queries refresh ground and wall contacts.
    Sensors,
    /// Gravity scaling and mode transitions.
    Transitions,
    /// Backend clears the previous physics step's forces.
    ForceReset,
    /// Drag, run and slide.
    Forces,
    /// Backend applies the accumulated forces.
    FinalApplication,
}

/// A movement transition of one character.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct MovementEvent {
    /// The character.
    pub entity: Entity,
    /// What happened.
    pub kind: MovementEventKind,
}

/// Main plugin for the platformer controller.
///
/// Generic over the physics backend `B`.
pub struct PlatformerControllerPlugin<B: CharacterPhysicsBackend> {
    frame_schedule: InternedScheduleLabel,
    _marker: PhantomData<B>,
}

impl<B: CharacterPhysicsBackend> Default for PlatformerControllerPlugin<B> {
    fn default() -> Self {
        Self {
            frame_schedule: PreUpdate.intern(),
            _marker: PhantomData,
        }
    }
}

impl<B: CharacterPhysicsBackend> PlatformerControllerPlugin<B> {
    /// Run the frame step in `schedule` instead of `PreUpdate`.
    ///
    /// The schedule should run once per rendered frame, before `FixedUpdate`.
    pub fn with_frame_schedule(mut self, schedule: impl ScheduleLabel) -> Self {
        self.frame_schedule = schedule.intern();
        self
    }
}

impl<B: CharacterPhysicsBackend> Plugin for PlatformerControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        let frame = self.frame_schedule;

        app.register_type::<MovementConfig>()
            .register_type::<MovementState>()
            .register_type::<PlatformerInput>();

        app.add_message::<MovementEvent>();

        app.configure_sets(
            frame,
            (
                PlatformerControllerSet::Preparation,
                PlatformerControllerSet::Timers,
                PlatformerControllerSet::Sensors,
                PlatformerControllerSet::Transitions,
            )
                .chain(),
        );
        app.configure_sets(
            FixedUpdate,
            (
                PlatformerControllerSet::ForceReset,
                PlatformerControllerSet::Forces,
                PlatformerControllerSet::FinalApplication,
            )
                .chain(),
        );

        app.add_systems(
            frame,
            systems::prepare_characters::<B>.in_set(PlatformerControllerSet::Preparation),
        );
        app.add_systems(
            frame,
            systems::begin_frame::<B>.in_set(PlatformerControllerSet::Timers),
        );
        app.add_systems(
            frame,
            systems::resolve_frame::<B>.in_set(PlatformerControllerSet::Transitions),
        );
        app.add_systems(
            FixedUpdate,
            systems::physics_step::<B>.in_set(PlatformerControllerSet::Forces),
        );

        app.add_plugins(B::plugin(frame));
    }
}
