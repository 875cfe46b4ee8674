//! Locomotion and ability state machine.
//!
//! The machine runs in two steps per simulation frame:
//!
//! 1. **Frame step** (variable rate): timers, facing, ground/wall detection,
//!    gravity scaling and every mode transition (jump, wall jump, dash, jump cut).
//!    Input edges are turned into buffer timers at the end of the step and are
//!    consumed by a later frame.
//! 2. **Physics step** (fixed rate): continuous drag, run and slide forces.
//!
//! Transitions made by a frame step are visible to the physics step that follows it.

use bevy::prelude::*;

use crate::acceleration::{drag_impulse, run_force, sign, slide_force};
use crate::config::MovementConfig;
use crate::detection::{CollisionProbe, CollisionResult, GroundWallDetector};
use crate::intent::InputSnapshot;
use crate::state::{Facing, MovementMode, MovementState};
use crate::timers::TimerId;

/// Share of the upward dash counter impulse used when the dash also had a horizontal component.
const DIAGONAL_DASH_END_SCALE: f32 = 0.7;

/// Rigid body commands the machine issues.
///
/// Impulses and forces are expressed per unit mass. Backends scale them by
/// the body mass when needed.
pub trait MotorBody {
    /// Current linear velocity.
    fn velocity(&self) -> Vec2;

    /// Overwrite the linear velocity.
    fn set_velocity(&mut self, velocity: Vec2);

    /// Apply an instantaneous velocity change.
    fn apply_impulse(&mut self, impulse: Vec2);

    /// Apply a force over the current physics step.
    fn apply_force(&mut self, force: Vec2);

    /// Current gravity scale.
    fn gravity_scale(&self) -> f32;

    /// Overwrite the gravity scale.
    fn set_gravity_scale(&mut self, scale: f32);
}

/// A transition reported by the state machine.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub enum MovementEventKind {
    /// The character turned around.
    Turned(Facing),
    /// A ground (or coyote) jump fired.
    Jumped,
    /// A wall jump fired. `direction` is `-1.0` off a right wall, `1.0` off a left wall.
    WallJumped {
        /// Horizontal sign of the jump.
        direction: f32,
    },
    /// Upward velocity was cut by an early jump release.
    JumpCut,
    /// A dash started along `direction` (unnormalized).
    DashStarted {
        /// Requested dash direction.
        direction: Vec2,
    },
    /// The dash attack phase ended.
    DashAttackEnded,
    /// The dash ended entirely.
    DashEnded,
    /// Dash charges were refilled on landing.
    DashesRecharged,
}

/// Transitions reported by one step, in the order they happened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEvents(Vec<MovementEventKind>);

impl FrameEvents {
    #[inline]
    fn push(&mut self, kind: MovementEventKind) {
        self.0.push(kind);
    }

    /// Move all events of `other` into `self`.
    pub fn append(&mut self, mut other: FrameEvents) {
        self.0.append(&mut other.0);
    }

    /// Whether an event equal to `kind` was reported.
    pub fn contains(&self, kind: &MovementEventKind) -> bool {
        self.0.contains(kind)
    }

    /// Whether nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of reported events.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the events in order.
    pub fn iter(&self) -> impl Iterator<Item = &MovementEventKind> {
        self.0.iter()
    }
}

impl IntoIterator for FrameEvents {
    type Item = MovementEventKind;
    type IntoIter = std::vec::IntoIter<MovementEventKind>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The locomotion/ability core for one character.
///
/// Borrows the character's immutable config and its mutable state for the
/// duration of a step.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_platformer_controller::prelude::*;
///
/// struct Body { velocity: Vec2, gravity_scale: f32 }
///
/// impl MotorBody for Body {
///     fn velocity(&self) -> Vec2 { self.velocity }
///     fn set_velocity(&mut self, velocity: Vec2) { self.velocity = velocity; }
///     fn apply_impulse(&mut self, impulse: Vec2) { self.velocity += impulse; }
///     fn apply_force(&mut self, _force: Vec2) {}
///     fn gravity_scale(&self) -> f32 { self.gravity_scale }
///     fn set_gravity_scale(&mut self, scale: f32) { self.gravity_scale = scale; }
/// }
///
/// struct Floor;
///
/// impl CollisionProbe for Floor {
///     fn overlaps(&self, center: Vec2, _half_extents: Vec2, _layer_mask: u32) -> bool {
///         center.y < -0.5
///     }
/// }
///
/// let config = MovementConfig::default();
/// let mut state = MovementState::new();
/// let mut body = Body { velocity: Vec2::ZERO, gravity_scale: 1.0 };
///
/// let mut press = InputSnapshot::default();
/// press.jump_pressed = true;
///
/// AbilityStateMachine::new(&config, &mut state)
///     .frame_update(1.0 / 60.0, press, Vec2::ZERO, &Floor, &mut body);
/// AbilityStateMachine::new(&config, &mut state)
///     .frame_update(1.0 / 60.0, InputSnapshot::default(), Vec2::ZERO, &Floor, &mut body);
///
/// assert!(state.is_jumping());
/// assert_eq!(body.velocity.y, config.jump.force);
/// ```
pub struct AbilityStateMachine<'a> {
    config: &'a MovementConfig,
    state: &'a mut MovementState,
}

impl<'a> AbilityStateMachine<'a> {
    /// Borrow one character's config and state for a step.
    pub fn new(config: &'a MovementConfig, state: &'a mut MovementState) -> Self {
        Self { config, state }
    }

    /// Full frame step: [`begin_frame`](Self::begin_frame),
    /// [`refresh_contacts`](Self::refresh_contacts) at `origin`, then
    /// [`resolve_frame`](Self::resolve_frame).
    pub fn frame_update(
        &mut self,
        dt: f32,
        input: InputSnapshot,
        origin: Vec2,
        probe: &impl CollisionProbe,
        body: &mut impl MotorBody,
    ) -> FrameEvents {
        let mut events = self.begin_frame(dt, input);
        self.refresh_contacts(origin, probe);
        events.append(self.resolve_frame(body));
        events
    }

    /// Advance the clock and timers, store this frame's input and update facing.
    pub fn begin_frame(&mut self, dt: f32, input: InputSnapshot) -> FrameEvents {
        let mut events = FrameEvents::default();

        self.state.clock += f64::from(dt);
        self.state.timers.tick(dt);
        self.state.input = input;

        if input.has_horizontal() {
            self.face(Facing::from_axis(input.move_axis.x), &mut events);
        }

        events
    }

    /// Whether ground/wall detection runs this frame.
    ///
    /// Detection is skipped while jumping or dashing, so a jump's own take-off
    /// cannot refresh coyote time.
    pub fn detection_enabled(&self) -> bool {
        !(self.state.is_dashing() || self.state.is_jumping())
    }

    /// Run ground/wall detection around `origin` unless it is disabled this frame.
    pub fn refresh_contacts(
        &mut self,
        origin: Vec2,
        probe: &impl CollisionProbe,
    ) -> Option<CollisionResult> {
        if !self.detection_enabled() {
            return None;
        }

        let detector = GroundWallDetector::new(&self.config.probes, self.config.jump.coyote_time);
        Some(detector.refresh(origin, self.state.facing, probe, &mut self.state.timers))
    }

    /// Evaluate gravity and every mode transition for the current frame.
    pub fn resolve_frame(&mut self, body: &mut impl MotorBody) -> FrameEvents {
        let mut events = FrameEvents::default();

        self.update_gravity(body);
        self.expire_jumps(body.velocity());

        if !self.state.is_dashing() {
            self.dispatch_jump(body, &mut events);
        }

        self.update_dash(body, &mut events);

        let input = self.state.input;
        if input.jump_released {
            self.jump_cut(body, &mut events);
        }
        if input.dash_pressed {
            self.state
                .timers
                .reset(TimerId::DashPressed, self.config.dash.buffer_time);
        }
        if input.jump_pressed {
            self.state
                .timers
                .reset(TimerId::JumpPressed, self.config.jump.buffer_time);
        }

        self.state.sliding = self.should_slide();

        events
    }

    /// Fixed-rate step: drag, run and slide.
    pub fn physics_step(&mut self, body: &mut impl MotorBody) {
        let config = self.config;
        let velocity = body.velocity();
        let grounded = self.state.grounded();
        let move_x = self.state.input.move_axis.x;

        let drag = match self.state.mode {
            MovementMode::Dashing { attacking: true } => config.dash.attack_drag_amount,
            MovementMode::Dashing { attacking: false } => config.drag.drag_amount,
            _ if !grounded => config.drag.drag_amount,
            _ => config.drag.friction_amount,
        };
        body.apply_impulse(drag_impulse(velocity, drag));

        // Velocity is hard-set during the dash attack phase.
        let run_lerp = match self.state.mode {
            MovementMode::Dashing { attacking: true } => None,
            MovementMode::Dashing { attacking: false } => Some(config.dash.end_run_lerp),
            MovementMode::WallJumping => Some(config.wall_jump.run_lerp),
            MovementMode::Idle | MovementMode::Jumping => Some(1.0),
        };
        if let Some(lerp) = run_lerp {
            let force = run_force(&config.run, velocity.x, move_x, grounded, lerp);
            body.apply_force(Vec2::X * force);
        }

        self.state.sliding = self.should_slide();
        if self.state.sliding {
            let force = slide_force(&config.slide, velocity.y);
            body.apply_force(Vec2::Y * force);
        }
    }

    fn face(&mut self, facing: Facing, events: &mut FrameEvents) {
        if facing != self.state.facing {
            self.state.facing = facing;
            events.push(MovementEventKind::Turned(facing));
        }
    }

    fn update_gravity(&self, body: &mut impl MotorBody) {
        if self.state.is_dashing() {
            return;
        }

        let gravity = &self.config.gravity;
        let scale = if body.velocity().y >= 0.0 || self.state.is_wall_jumping() {
            gravity.scale
        } else if self.state.input.move_axis.y < 0.0 {
            gravity.scale * gravity.quick_fall_mult
        } else {
            gravity.scale * gravity.fall_mult
        };
        body.set_gravity_scale(scale);
    }

    fn expire_jumps(&mut self, velocity: Vec2) {
        if self.state.is_jumping() && velocity.y < 0.0 {
            self.state.mode = MovementMode::Idle;
        }

        if self.state.is_wall_jumping()
            && self.state.clock - self.state.wall_jump_started_at
                > f64::from(self.config.wall_jump.duration)
        {
            self.state.mode = MovementMode::Idle;
        }
    }

    fn can_jump(&self) -> bool {
        self.state.grounded() && !self.state.is_jumping()
    }

    fn can_wall_jump(&self) -> bool {
        let timers = &self.state.timers;
        let last_dir = self.state.last_wall_jump_dir;

        timers.is_active(TimerId::JumpPressed)
            && timers.is_active(TimerId::OnWall)
            && !timers.is_active(TimerId::OnGround)
            && (!self.state.is_wall_jumping()
                || (timers.is_active(TimerId::OnWallRight) && last_dir == 1.0)
                || (timers.is_active(TimerId::OnWallLeft) && last_dir == -1.0))
    }

    fn dispatch_jump(&mut self, body: &mut impl MotorBody, events: &mut FrameEvents) {
        if self.can_jump() && self.state.timers.is_active(TimerId::JumpPressed) {
            self.state.mode = MovementMode::Jumping;
            self.jump(body);
            events.push(MovementEventKind::Jumped);
        } else if self.can_wall_jump() {
            let direction = if self.state.timers.is_active(TimerId::OnWallRight) {
                -1.0
            } else {
                1.0
            };

            self.state.mode = MovementMode::WallJumping;
            self.state.wall_jump_started_at = self.state.clock;
            self.state.last_wall_jump_dir = direction;
            self.wall_jump(direction, body);

            if self.config.wall_jump.turn_on_jump {
                self.face(Facing::from_axis(direction), events);
            }
            debug!("wall jump toward {direction}");
            events.push(MovementEventKind::WallJumped { direction });
        }
    }

    fn jump(&mut self, body: &mut impl MotorBody) {
        self.state
            .timers
            .consume(TimerId::OnGround, TimerId::JumpPressed);

        let mut force = self.config.jump.force;
        let velocity_y = body.velocity().y;
        if velocity_y < 0.0 {
            force -= velocity_y;
        }

        body.apply_impulse(Vec2::Y * force);
    }

    fn wall_jump(&mut self, direction: f32, body: &mut impl MotorBody) {
        let timers = &mut self.state.timers;
        timers.consume(TimerId::OnGround, TimerId::JumpPressed);
        timers.clear(TimerId::OnWall);
        timers.clear(TimerId::OnWallLeft);
        timers.clear(TimerId::OnWallRight);

        let velocity = body.velocity();
        let mut force = self.config.wall_jump.force;
        force.x *= direction;

        if sign(velocity.x) != sign(force.x) {
            force.x -= velocity.x;
        }
        if velocity.y < 0.0 {
            force.y -= velocity.y;
        }

        body.apply_impulse(force);
    }

    fn jump_cut(&mut self, body: &mut impl MotorBody, events: &mut FrameEvents) {
        let velocity_y = body.velocity().y;
        let rising_jump = self.state.is_jumping() || self.state.is_wall_jumping();
        if !rising_jump || velocity_y <= 0.0 {
            return;
        }

        let cut = velocity_y * (1.0 - self.config.jump.cut_multiplier);
        body.apply_impulse(Vec2::NEG_Y * cut);
        events.push(MovementEventKind::JumpCut);
    }

    fn dash_elapsed(&self) -> f64 {
        self.state.clock - self.state.dash_started_at
    }

    fn dash_attack_over(&self) -> bool {
        self.state.is_dashing() && self.dash_elapsed() > f64::from(self.config.dash.attack_time)
    }

    /// Refill charges when grounded, then report whether a dash is available.
    fn can_dash(&mut self, events: &mut FrameEvents) -> bool {
        let amount = self.config.dash.amount;
        if self.state.dashes_left < amount && self.state.grounded() {
            self.state.dashes_left = amount;
            events.push(MovementEventKind::DashesRecharged);
        }

        self.state.dashes_left > 0
    }

    fn update_dash(&mut self, body: &mut impl MotorBody, events: &mut FrameEvents) {
        if self.dash_attack_over() {
            let dash = self.config.dash;
            if self.state.is_dash_attacking() {
                self.state.mode = MovementMode::Dashing { attacking: false };
                self.stop_dash(body);
                events.push(MovementEventKind::DashAttackEnded);
            } else if self.dash_elapsed() > f64::from(dash.attack_time + dash.end_time) {
                self.state.mode = MovementMode::Idle;
                events.push(MovementEventKind::DashEnded);
            }
        }

        if self.can_dash(events) && self.state.timers.is_active(TimerId::DashPressed) {
            self.start_dash(body, events);
        }
    }

    fn start_dash(&mut self, body: &mut impl MotorBody, events: &mut FrameEvents) {
        let move_axis = self.state.input.move_axis;
        let direction = if move_axis != Vec2::ZERO {
            move_axis
        } else {
            self.state.facing.direction()
        };

        self.state.last_dash_dir = direction;
        self.state.dash_started_at = self.state.clock;
        self.state.dashes_left = self.state.dashes_left.saturating_sub(1);
        self.state.mode = MovementMode::Dashing { attacking: true };
        self.state.sliding = false;

        self.state
            .timers
            .consume(TimerId::OnGround, TimerId::DashPressed);

        body.set_gravity_scale(0.0);
        body.set_velocity(direction.normalize_or_zero() * self.config.dash.speed);

        debug!(
            "dash toward {direction}, {} charge(s) left",
            self.state.dashes_left
        );
        events.push(MovementEventKind::DashStarted { direction });
    }

    fn stop_dash(&mut self, body: &mut impl MotorBody) {
        body.set_gravity_scale(self.config.gravity.scale);

        let direction = self.state.last_dash_dir;
        if direction.y > 0.0 {
            let mut cut = body.velocity().y * (1.0 - self.config.dash.up_end_mult);
            if direction.x != 0.0 {
                cut *= DIAGONAL_DASH_END_SCALE;
            }
            body.apply_impulse(Vec2::NEG_Y * cut);
        }
    }

    fn should_slide(&self) -> bool {
        let timers = &self.state.timers;
        let move_x = self.state.input.move_axis.x;

        timers.is_active(TimerId::OnWall)
            && self.state.mode == MovementMode::Idle
            && !timers.is_active(TimerId::OnGround)
            && ((timers.is_active(TimerId::OnWallLeft) && move_x < 0.0)
                || (timers.is_active(TimerId::OnWallRight) && move_x > 0.0))
    }
}
