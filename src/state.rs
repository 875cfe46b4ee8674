//! Per-character movement state.
//!
//! [`MovementState`] is created when a character spawns and mutated only by
//! its [`AbilityStateMachine`](crate::machine::AbilityStateMachine). Outside
//! systems (animation, camera) get read-only accessors.

use bevy::prelude::*;

use crate::intent::{InputSnapshot, PlatformerInput};
use crate::timers::{TimerBank, TimerId};

/// Horizontal facing of a character.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Facing +X.
    #[default]
    Right,
    /// Facing -X.
    Left,
}

impl Facing {
    /// `+1.0` for right, `-1.0` for left.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Unit vector along the facing direction.
    #[inline]
    pub fn direction(self) -> Vec2 {
        Vec2::X * self.sign()
    }

    /// Facing for a non-zero horizontal input.
    #[inline]
    pub fn from_axis(x: f32) -> Self {
        if x > 0.0 { Facing::Right } else { Facing::Left }
    }
}

/// Exclusive locomotion mode.
///
/// At most one of jumping, wall jumping and dashing is active. Every mode
/// eventually returns to [`MovementMode::Idle`].
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    /// Standing, running or falling freely.
    #[default]
    Idle,
    /// Rising from a ground jump until the apex.
    Jumping,
    /// Pushing off a wall for the configured wall jump duration.
    WallJumping,
    /// Dashing. `attacking` is true during the attack phase.
    Dashing {
        /// Whether the dash is still in its attack phase.
        attacking: bool,
    },
}

/// Mutable movement state of one character.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
#[require(PlatformerInput)]
pub struct MovementState {
    pub(crate) clock: f64,
    pub(crate) facing: Facing,
    pub(crate) mode: MovementMode,
    pub(crate) sliding: bool,
    pub(crate) timers: TimerBank,
    pub(crate) input: InputSnapshot,
    pub(crate) wall_jump_started_at: f64,
    pub(crate) last_wall_jump_dir: f32,
    pub(crate) dashes_left: u32,
    pub(crate) dash_started_at: f64,
    pub(crate) last_dash_dir: Vec2,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            clock: 0.0,
            facing: Facing::Right,
            mode: MovementMode::Idle,
            sliding: false,
            timers: TimerBank::new(),
            input: InputSnapshot::default(),
            wall_jump_started_at: 0.0,
            last_wall_jump_dir: 0.0,
            dashes_left: 0,
            dash_started_at: 0.0,
            last_dash_dir: Vec2::ZERO,
        }
    }
}

impl MovementState {
    /// Create a fresh state: idle, facing right, no dash charges until grounded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds of simulated time seen by this character.
    pub fn elapsed(&self) -> f64 {
        self.clock
    }

    /// Current facing.
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Current exclusive mode.
    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    /// Whether a ground jump is rising.
    pub fn is_jumping(&self) -> bool {
        self.mode == MovementMode::Jumping
    }

    /// Whether a wall jump is in progress.
    pub fn is_wall_jumping(&self) -> bool {
        self.mode == MovementMode::WallJumping
    }

    /// Whether a dash is in progress (either phase).
    pub fn is_dashing(&self) -> bool {
        matches!(self.mode, MovementMode::Dashing { .. })
    }

    /// Whether the dash is in its attack phase.
    pub fn is_dash_attacking(&self) -> bool {
        self.mode == MovementMode::Dashing { attacking: true }
    }

    /// Whether the character is sliding down a wall.
    pub fn is_sliding(&self) -> bool {
        self.sliding
    }

    /// Remaining grounded grace time. Positive while grounded or within coyote time.
    pub fn on_ground_time(&self) -> f32 {
        self.timers.get(TimerId::OnGround)
    }

    /// Remaining wall grace time (either side).
    pub fn on_wall_time(&self) -> f32 {
        self.timers.get(TimerId::OnWall)
    }

    /// Remaining grace time for a wall on the left.
    pub fn on_wall_left_time(&self) -> f32 {
        self.timers.get(TimerId::OnWallLeft)
    }

    /// Remaining grace time for a wall on the right.
    pub fn on_wall_right_time(&self) -> f32 {
        self.timers.get(TimerId::OnWallRight)
    }

    /// Remaining jump buffer time.
    pub fn jump_buffer_time(&self) -> f32 {
        self.timers.get(TimerId::JumpPressed)
    }

    /// Remaining dash buffer time.
    pub fn dash_buffer_time(&self) -> f32 {
        self.timers.get(TimerId::DashPressed)
    }

    /// Dash charges left before the next landing.
    pub fn dashes_left(&self) -> u32 {
        self.dashes_left
    }

    /// Direction of the last wall jump: `-1.0` off a right wall, `1.0` off a left wall.
    pub fn last_wall_jump_dir(&self) -> f32 {
        self.last_wall_jump_dir
    }

    /// Unnormalized direction of the last dash.
    pub fn last_dash_dir(&self) -> Vec2 {
        self.last_dash_dir
    }

    /// Read-only view of all timers.
    pub fn timers(&self) -> &TimerBank {
        &self.timers
    }

    /// Input snapshot of the current frame.
    pub fn input(&self) -> &InputSnapshot {
        &self.input
    }

    #[inline]
    pub(crate) fn grounded(&self) -> bool {
        self.timers.is_active(TimerId::OnGround)
    }
}
