//! Gesture scheduler
//!
//! Picks a spontaneous gesture every 10-20 seconds once the greeting is over.
//! The countdown keeps running while other motions play; when it runs out
//! while something blocks it, the gesture fires on the first clear frame.

use crate::primitives::Gesture;
use rand::Rng;
use std::ops::Range;

pub const GESTURE_INTERVAL: Range<f32> = 10.0..20.0;

/// Conditions that hold a due gesture back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerGuard {
    /// Something already occupies the exclusive-motion slot.
    pub motion_active: bool,
    pub head_tilt: bool,
    pub speaking: bool,
}

impl SchedulerGuard {
    pub fn blocks(&self) -> bool {
        self.motion_active || self.head_tilt || self.speaking
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerState {
    /// Countdown not started yet (greeting still pending).
    Idle,
    Armed { timer: f32, threshold: f32 },
}

#[derive(Debug, Clone)]
pub struct GestureScheduler {
    armed: bool,
    timer: f32,
    threshold: f32,
}

impl GestureScheduler {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            armed: false,
            timer: 0.0,
            threshold: rng.gen_range(GESTURE_INTERVAL),
        }
    }

    /// Start the countdown. Idempotent.
    pub fn arm(&mut self) {
        if !self.armed {
            tracing::debug!(threshold = self.threshold, "Gesture countdown armed");
            self.armed = true;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn state(&self) -> SchedulerState {
        if self.armed {
            SchedulerState::Armed {
                timer: self.timer,
                threshold: self.threshold,
            }
        } else {
            SchedulerState::Idle
        }
    }

    /// Advance the countdown. Returns the gesture to start, if one is due and
    /// nothing blocks it.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        guard: SchedulerGuard,
        rng: &mut R,
    ) -> Option<Gesture> {
        if !self.armed {
            return None;
        }
        self.timer += dt;
        if self.timer < self.threshold || guard.blocks() {
            return None;
        }

        self.timer = 0.0;
        self.threshold = rng.gen_range(GESTURE_INTERVAL);
        let gesture = Gesture::random(rng);
        tracing::debug!(kind = ?gesture.kind(), side = ?gesture.side(), "Gesture scheduled");
        Some(gesture)
    }
}
