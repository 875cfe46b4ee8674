//! Countdown timers for grace windows and input buffers.
//!
//! Every timer counts down by the frame delta and is considered active while
//! strictly positive. Events reset a timer to its configured window. Buffered
//! actions fire when their prerequisite timer and their buffer timer are both
//! active, and zero both so a single press fires at most once.

use bevy::prelude::*;

/// Identifies one timer in a [`TimerBank`].
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    /// Time left since the character last touched the ground (coyote time).
    OnGround,
    /// Time left since the character last touched any wall.
    OnWall,
    /// Time left since the character last touched a wall on its left.
    OnWallLeft,
    /// Time left since the character last touched a wall on its right.
    OnWallRight,
    /// Time left on the jump press buffer.
    JumpPressed,
    /// Time left on the dash press buffer.
    DashPressed,
}

impl TimerId {
    /// All timers, in storage order.
    pub const ALL: [TimerId; 6] = [
        TimerId::OnGround,
        TimerId::OnWall,
        TimerId::OnWallLeft,
        TimerId::OnWallRight,
        TimerId::JumpPressed,
        TimerId::DashPressed,
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Bank of countdown timers owned by a single character.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct TimerBank {
    remaining: [f32; 6],
}

impl TimerBank {
    /// Create a bank with every timer expired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decrement every timer by `dt`.
    pub fn tick(&mut self, dt: f32) {
        for remaining in &mut self.remaining {
            *remaining -= dt;
        }
    }

    /// Set a timer to a configured grace window.
    #[inline]
    pub fn reset(&mut self, id: TimerId, window: f32) {
        self.remaining[id.index()] = window;
    }

    /// Zero a timer.
    #[inline]
    pub fn clear(&mut self, id: TimerId) {
        self.remaining[id.index()] = 0.0;
    }

    /// Remaining time of a timer. Negative once expired.
    #[inline]
    pub fn get(&self, id: TimerId) -> f32 {
        self.remaining[id.index()]
    }

    /// Whether a timer is still running.
    #[inline]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.get(id) > 0.0
    }

    /// Whether a buffered action is eligible: both its prerequisite and its buffer are active.
    #[inline]
    pub fn is_buffered(&self, prerequisite: TimerId, buffer: TimerId) -> bool {
        self.is_active(prerequisite) && self.is_active(buffer)
    }

    /// Consume a buffered action, zeroing both timers.
    pub fn consume(&mut self, prerequisite: TimerId, buffer: TimerId) {
        self.clear(prerequisite);
        self.clear(buffer);
    }
}
