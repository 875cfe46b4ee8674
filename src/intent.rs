//! Movement input components.
//!
//! Game code (player input or AI) writes [`PlatformerInput`]. The frame step
//! polls it once per frame into an immutable [`InputSnapshot`] and clears its
//! edge flags, so every press or release is seen by exactly one frame.

use bevy::prelude::*;

/// Per-frame, read-only copy of a character's input.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Movement vector, each axis in [-1, 1].
    pub move_axis: Vec2,
    /// Jump was pressed since the last frame.
    pub jump_pressed: bool,
    /// Jump was released since the last frame.
    pub jump_released: bool,
    /// Dash was pressed since the last frame.
    pub dash_pressed: bool,
    /// Climb axis in [-1, 1].
    pub climb: f32,
}

impl InputSnapshot {
    /// Snapshot with only a movement vector.
    pub fn moving(move_axis: Vec2) -> Self {
        Self {
            move_axis: move_axis.clamp(Vec2::NEG_ONE, Vec2::ONE),
            ..Default::default()
        }
    }

    /// Whether there is horizontal input.
    pub fn has_horizontal(&self) -> bool {
        self.move_axis.x != 0.0
    }
}

/// Input provider for one character.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use msg_platformer_controller::prelude::*;
///
/// let mut input = PlatformerInput::new();
/// input.set_move(Vec2::new(1.0, 0.0));
/// input.press_jump();
///
/// let snapshot = input.poll();
/// assert!(snapshot.jump_pressed);
///
/// // Edges are consumed by polling; the movement vector persists.
/// let snapshot = input.poll();
/// assert!(!snapshot.jump_pressed);
/// assert_eq!(snapshot.move_axis, Vec2::X);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct PlatformerInput {
    /// Movement vector (-1.0 to 1.0 per axis).
    pub move_axis: Vec2,
    /// Climb axis (-1.0 to 1.0).
    pub climb: f32,
    jump_pressed: bool,
    jump_released: bool,
    dash_pressed: bool,
}

impl PlatformerInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the movement vector. Each axis is clamped to [-1, 1].
    pub fn set_move(&mut self, axis: Vec2) {
        self.move_axis = axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Set the climb axis, clamped to [-1, 1].
    pub fn set_climb(&mut self, climb: f32) {
        self.climb = climb.clamp(-1.0, 1.0);
    }

    /// Clear the movement vector and climb axis.
    pub fn clear_axes(&mut self) {
        self.move_axis = Vec2::ZERO;
        self.climb = 0.0;
    }

    /// Record a jump press edge.
    pub fn press_jump(&mut self) {
        self.jump_pressed = true;
    }

    /// Record a jump release edge.
    pub fn release_jump(&mut self) {
        self.jump_released = true;
    }

    /// Record a dash press edge.
    pub fn press_dash(&mut self) {
        self.dash_pressed = true;
    }

    /// Snapshot without consuming edges.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            move_axis: self.move_axis.clamp(Vec2::NEG_ONE, Vec2::ONE),
            jump_pressed: self.jump_pressed,
            jump_released: self.jump_released,
            dash_pressed: self.dash_pressed,
            climb: self.climb.clamp(-1.0, 1.0),
        }
    }

    /// Snapshot and consume edges.
    pub fn poll(&mut self) -> InputSnapshot {
        let snapshot = self.snapshot();
        self.jump_pressed = false;
        self.jump_released = false;
        self.dash_pressed = false;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_new_is_empty() {
        let input = PlatformerInput::new();
        let snapshot = input.snapshot();
        assert_eq!(snapshot, InputSnapshot::default());
        assert!(!snapshot.has_horizontal());
    }

    #[test]
    fn set_move_clamps() {
        let mut input = PlatformerInput::new();
        input.set_move(Vec2::new(5.0, -3.0));
        assert_eq!(input.move_axis, Vec2::new(1.0, -1.0));

        input.set_move(Vec2::new(0.5, 0.25));
        assert_eq!(input.move_axis, Vec2::new(0.5, 0.25));
    }

    #[test]
    fn set_climb_clamps() {
        let mut input = PlatformerInput::new();
        input.set_climb(2.0);
        assert_eq!(input.climb, 1.0);
        input.set_climb(-0.4);
        assert_eq!(input.climb, -0.4);
    }

    #[test]
    fn snapshot_clamps_direct_field_writes() {
        let mut input = PlatformerInput::new();
        input.move_axis = Vec2::new(3.0, -2.0);
        input.climb = -7.5;

        let snapshot = input.poll();
        assert_eq!(snapshot.move_axis, Vec2::new(1.0, -1.0));
        assert_eq!(snapshot.climb, -1.0);
        assert_eq!(input.snapshot().move_axis, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn poll_consumes_edges_only() {
        let mut input = PlatformerInput::new();
        input.set_move(Vec2::NEG_X);
        input.press_jump();
        input.release_jump();
        input.press_dash();

        let first = input.poll();
        assert!(first.jump_pressed);
        assert!(first.jump_released);
        assert!(first.dash_pressed);
        assert_eq!(first.move_axis, Vec2::NEG_X);

        let second = input.poll();
        assert!(!second.jump_pressed);
        assert!(!second.jump_released);
        assert!(!second.dash_pressed);
        assert_eq!(second.move_axis, Vec2::NEG_X);
    }

    #[test]
    fn snapshot_does_not_consume() {
        let mut input = PlatformerInput::new();
        input.press_dash();
        assert!(input.snapshot().dash_pressed);
        assert!(input.snapshot().dash_pressed);
    }

    #[test]
    fn clear_axes() {
        let mut input = PlatformerInput::new();
        input.set_move(Vec2::ONE);
        input.set_climb(1.0);
        input.press_jump();

        input.clear_axes();
        assert_eq!(input.move_axis, Vec2::ZERO);
        assert_eq!(input.climb, 0.0);
        assert!(input.snapshot().jump_pressed);
    }

    #[test]
    fn moving_snapshot() {
        let snapshot = InputSnapshot::moving(Vec2::new(2.0, 0.0));
        assert_eq!(snapshot.move_axis, Vec2::X);
        assert!(snapshot.has_horizontal());
        assert!(!snapshot.jump_pressed);
    }
}
