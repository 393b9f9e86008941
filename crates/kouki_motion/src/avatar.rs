//! The avatar aggregate and its per-frame coordinator.
//!
//! `Avatar` owns the loaded model and every piece of animation state. A frame
//! runs in a fixed order, because later writers silently overwrite earlier
//! ones on shared joints:
//!
//! 0. fire deferred timers that came due
//! 1. advance the model's own update
//! 2. blink, lip-sync, breathing (disjoint channels/axes, always on)
//! 3. exactly one of: the exclusive motion, or idle sway
//! 4. gesture countdown (runs even while something else is showing)
//! 5. hand the posed model to the renderer

use crate::clock::{AnimationClock, Deferred, TimerQueue};
use crate::command::{AvatarCommand, CommandReceiver};
use crate::exclusive::{ExclusiveMotion, MotionKind};
use crate::expression::ExpressionController;
use crate::primitives::{
    Blink, Breathing, Gesture, GestureKind, HeadTilt, IdleSway, MotionStatus, Side, SpeakingState,
    Wave, BLINK_HOLD_SECS,
};
use crate::rig::{AvatarModel, Renderer};
use crate::scheduler::{GestureScheduler, SchedulerGuard};
use kouki_core::Emotion;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::mpsc::error::TryRecvError;

/// Snapshot published after every frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarStatus {
    pub emotion: Emotion,
    pub speaking: bool,
    pub motion: Option<MotionKind>,
    pub gestures_armed: bool,
    pub model_loaded: bool,
    pub elapsed: f64,
    pub frames: u64,
}

pub struct Avatar {
    model: Option<Box<dyn AvatarModel>>,
    renderer: Option<Box<dyn Renderer>>,
    clock: AnimationClock,
    rng: StdRng,
    timers: TimerQueue,

    expression: ExpressionController,
    expression_generation: u64,
    speaking: SpeakingState,
    speaking_generation: u64,

    blink: Blink,
    breathing: Breathing,
    idle: IdleSway,
    motion: ExclusiveMotion,
    scheduler: GestureScheduler,
}

impl Avatar {
    /// A fresh avatar with no model. `seed` fixes blink and gesture timing.
    pub fn new(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let blink = Blink::new(&mut rng);
        let scheduler = GestureScheduler::new(&mut rng);

        Self {
            model: None,
            renderer: None,
            clock: AnimationClock::default(),
            rng,
            timers: TimerQueue::default(),
            expression: ExpressionController::new(),
            expression_generation: 0,
            speaking: SpeakingState::default(),
            speaking_generation: 0,
            blink,
            breathing: Breathing::default(),
            idle: IdleSway::default(),
            motion: ExclusiveMotion::None,
            scheduler,
        }
    }

    pub fn with_model(mut self, model: impl AvatarModel + 'static) -> Self {
        self.set_model(Box::new(model));
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Attach a model and bring its face in line with the current emotion.
    pub fn set_model(&mut self, model: Box<dyn AvatarModel>) {
        self.model = Some(model);
        let current = self.expression.current();
        self.show(current);
    }

    pub fn unload_model(&mut self) -> Option<Box<dyn AvatarModel>> {
        self.model.take()
    }

    pub fn model(&self) -> Option<&dyn AvatarModel> {
        self.model.as_deref()
    }

    pub fn model_mut(&mut self) -> Option<&mut (dyn AvatarModel + 'static)> {
        self.model.as_deref_mut()
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Apply every queued command. Returns `false` once all senders are gone.
    pub fn drain(&mut self, rx: &mut CommandReceiver) -> bool {
        loop {
            match rx.try_recv() {
                Ok(command) => self.apply(command),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }

    /// Drain commands, then run one frame.
    pub fn frame(&mut self, rx: &mut CommandReceiver, dt: f32) -> bool {
        let open = self.drain(rx);
        self.tick(dt);
        open
    }

    pub fn apply(&mut self, command: AvatarCommand) {
        tracing::trace!(?command, "Avatar command");
        match command {
            AvatarCommand::SetExpression(emotion) => self.set_expression(emotion),
            AvatarCommand::RestoreNeutralAfter(secs) => self.restore_neutral_after(secs),
            AvatarCommand::StartSpeaking => self.start_speaking(),
            AvatarCommand::StopSpeaking => self.stop_speaking(),
            AvatarCommand::SpeakFor(secs) => self.speak_for(secs),
            AvatarCommand::Wave => {
                self.trigger_wave();
            }
            AvatarCommand::TiltHead => {
                self.trigger_head_tilt();
            }
            AvatarCommand::Gesture(kind, side) => {
                self.trigger_gesture(kind, side);
            }
            AvatarCommand::ArmGesturesAfter(secs) => {
                self.timers.schedule(secs, Deferred::ArmGestures);
            }
        }
    }

    pub fn set_expression(&mut self, emotion: Emotion) {
        self.expression_generation += 1;
        self.show(emotion);
    }

    /// Schedule a return to neutral. Superseded if the expression changes first.
    pub fn restore_neutral_after(&mut self, secs: f32) {
        self.timers.schedule(
            secs,
            Deferred::RestoreNeutral {
                generation: self.expression_generation,
            },
        );
    }

    pub fn start_speaking(&mut self) {
        self.speaking_generation += 1;
        self.speaking.start();
    }

    pub fn stop_speaking(&mut self) {
        self.speaking_generation += 1;
        self.speaking.stop();
    }

    /// Speak for `secs` without audio, ending on the frame clock.
    pub fn speak_for(&mut self, secs: f32) {
        self.start_speaking();
        self.timers.schedule(
            secs,
            Deferred::StopSpeaking {
                generation: self.speaking_generation,
            },
        );
    }

    pub fn trigger_wave(&mut self) -> bool {
        self.request_motion(ExclusiveMotion::Wave(Wave::new()))
    }

    pub fn trigger_head_tilt(&mut self) -> bool {
        self.request_motion(ExclusiveMotion::HeadTilt(HeadTilt::new()))
    }

    /// Start a specific gesture. Refused while any exclusive motion runs.
    pub fn trigger_gesture(&mut self, kind: GestureKind, side: Side) -> bool {
        self.request_motion(ExclusiveMotion::Gesture(Gesture::new(kind, side)))
    }

    pub fn arm_gestures(&mut self) {
        self.scheduler.arm();
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    pub fn tick(&mut self, dt: f32) {
        let dt = self.clock.advance(dt);

        for action in self.timers.advance(dt) {
            self.fire(action);
        }

        self.idle.advance(dt);
        match self.model.as_deref_mut() {
            Some(model) => {
                model.update(dt);

                if self.blink.update(dt, &mut self.rng, model.expressions_mut()) {
                    self.timers.schedule(BLINK_HOLD_SECS, Deferred::BlinkReset);
                }
                self.speaking.update(dt, model.expressions_mut());
                self.breathing.update(dt, model.skeleton_mut());

                if self.motion.is_active() {
                    let finished = self.motion.kind();
                    if self.motion.update(dt, model.skeleton_mut()) == MotionStatus::Finished {
                        tracing::debug!(motion = ?finished, "Motion finished");
                    }
                } else {
                    self.idle.apply(model.skeleton_mut());
                }
            }
            None => {
                self.breathing.advance(dt);
            }
        }

        let guard = SchedulerGuard {
            motion_active: self.motion.is_active(),
            head_tilt: self.motion.is_head_tilt(),
            speaking: self.speaking.is_active(),
        };
        if let Some(gesture) = self.scheduler.tick(dt, guard, &mut self.rng) {
            if self.model.is_some() {
                self.motion = ExclusiveMotion::Gesture(gesture);
            }
        }

        if let (Some(renderer), Some(model)) = (self.renderer.as_mut(), self.model.as_deref()) {
            renderer.submit(model);
        }
    }

    fn fire(&mut self, action: Deferred) {
        match action {
            Deferred::BlinkReset => {
                let surface = self.model.as_deref_mut().map(|m| m.expressions_mut());
                self.blink.finish(surface);
            }
            Deferred::StopSpeaking { generation } => {
                if generation == self.speaking_generation {
                    self.speaking.stop();
                }
            }
            Deferred::RestoreNeutral { generation } => {
                if generation == self.expression_generation {
                    self.show(Emotion::Neutral);
                } else {
                    tracing::trace!("Neutral restore superseded");
                }
            }
            Deferred::ArmGestures => self.scheduler.arm(),
        }
    }

    fn show(&mut self, emotion: Emotion) {
        match self.model.as_deref_mut() {
            Some(model) => self.expression.set_emotion(model.expressions_mut(), emotion),
            None => self.expression.remember(emotion),
        }
    }

    /// Motions only run against a skeleton, so none is accepted without a model.
    fn request_motion(&mut self, next: ExclusiveMotion) -> bool {
        let requested = next.kind();
        if self.model.is_none() {
            tracing::debug!(?requested, "Motion request refused, no model loaded");
            return false;
        }
        let skeleton = self.model.as_deref_mut().map(|m| m.skeleton_mut());
        let accepted = self.motion.request(next, skeleton);
        if !accepted {
            tracing::debug!(?requested, current = ?self.motion.kind(), "Motion request refused");
        }
        accepted
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn emotion(&self) -> Emotion {
        self.expression.current()
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.is_active()
    }

    pub fn motion(&self) -> &ExclusiveMotion {
        &self.motion
    }

    pub fn scheduler(&self) -> &GestureScheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn status(&self) -> AvatarStatus {
        AvatarStatus {
            emotion: self.emotion(),
            speaking: self.is_speaking(),
            motion: self.motion.kind(),
            gestures_armed: self.scheduler.is_armed(),
            model_loaded: self.model.is_some(),
            elapsed: self.clock.elapsed(),
            frames: self.clock.frames(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_model::MemoryModel;
    use crate::primitives::{BLINK_CHANNEL, MOUTH_CHANNEL};
    use crate::rig::Joint;

    fn avatar() -> Avatar {
        Avatar::new(Some(42)).with_model(MemoryModel::humanoid())
    }

    fn weight(avatar: &Avatar, channel: &str) -> f32 {
        avatar
            .model()
            .and_then(|m| m.expressions().weight(channel))
            .unwrap_or(f32::NAN)
    }

    #[test]
    fn test_model_update_receives_delta() {
        let mut a = avatar();
        a.tick(0.25);
        a.tick(-1.0);
        a.tick(0.25);
        assert_eq!(a.clock().elapsed(), 0.5);
        assert_eq!(a.clock().frames(), 3);
    }

    #[test]
    fn test_restore_neutral_after_hold() {
        let mut a = avatar();
        a.set_expression(Emotion::Happy);
        a.restore_neutral_after(3.0);

        for _ in 0..5 {
            a.tick(0.5);
        }
        assert_eq!(a.emotion(), Emotion::Happy);
        assert_eq!(weight(&a, "happy"), 1.0);

        a.tick(0.5);
        assert_eq!(a.emotion(), Emotion::Neutral);
        assert_eq!(weight(&a, "neutral"), 1.0);
        assert_eq!(weight(&a, "happy"), 0.0);
    }

    #[test]
    fn test_newer_expression_supersedes_restore() {
        let mut a = avatar();
        a.set_expression(Emotion::Happy);
        a.restore_neutral_after(1.0);
        a.tick(0.5);
        a.set_expression(Emotion::Sad);
        a.tick(1.0);
        assert_eq!(a.emotion(), Emotion::Sad);
    }

    #[test]
    fn test_blink_cycle_through_frames() {
        let mut a = avatar();
        let mut transitions = 0;
        let mut last = 0.0;
        for _ in 0..(60 * 6) {
            a.tick(1.0 / 60.0);
            let w = weight(&a, BLINK_CHANNEL);
            if w != last {
                transitions += 1;
                last = w;
            }
        }
        // The first blink lands within five seconds and reopens 0.15 s later
        assert!(transitions >= 2, "transitions = {transitions}");
    }

    #[test]
    fn test_blink_reset_survives_unload() {
        let mut a = avatar();
        a.tick(5.0);
        assert_eq!(weight(&a, BLINK_CHANNEL), 1.0);
        let model = a.unload_model().unwrap();
        a.tick(0.2);
        assert_eq!(a.pending_timers(), 0);
        assert_eq!(model.expressions().weight(BLINK_CHANNEL), Some(1.0));
    }

    #[test]
    fn test_synthetic_speech_window() {
        let mut a = avatar();
        a.speak_for(1.0);
        a.tick(0.1);
        assert!(a.is_speaking());
        assert!(weight(&a, MOUTH_CHANNEL) > 0.0);

        a.tick(1.0);
        assert!(!a.is_speaking());
        a.tick(0.016);
        assert_eq!(weight(&a, MOUTH_CHANNEL), 0.0);
    }

    #[test]
    fn test_explicit_stop_cancels_synthetic_timer() {
        let mut a = avatar();
        a.speak_for(2.0);
        a.stop_speaking();
        a.start_speaking();
        a.tick(2.5);
        // The stale synthetic stop must not end the newer speaking window
        assert!(a.is_speaking());
    }

    #[test]
    fn test_greeting_arms_scheduler_later() {
        let mut a = avatar();
        a.apply(AvatarCommand::Wave);
        a.apply(AvatarCommand::ArmGesturesAfter(3.0));
        assert!(!a.scheduler().is_armed());
        for _ in 0..6 {
            a.tick(0.5);
        }
        assert!(a.scheduler().is_armed());
        assert!(!a.motion().is_active());
    }

    #[test]
    fn test_without_model_timers_still_run() {
        let mut a = Avatar::new(Some(1));
        a.set_expression(Emotion::Angry);
        a.restore_neutral_after(1.0);
        a.tick(1.0);
        assert_eq!(a.emotion(), Emotion::Neutral);
        assert!(!a.status().model_loaded);

        a.set_model(Box::new(MemoryModel::humanoid()));
        assert_eq!(weight(&a, "neutral"), 1.0);
    }

    #[test]
    fn test_without_model_motions_are_refused() {
        let mut a = Avatar::new(Some(1));
        a.apply(AvatarCommand::Wave);
        a.apply(AvatarCommand::ArmGesturesAfter(0.0));
        assert!(!a.trigger_head_tilt());
        assert!(!a.motion().is_active());

        // The countdown still runs, but a due gesture is dropped
        for _ in 0..50 {
            a.tick(0.5);
        }
        let status = a.status();
        assert!(status.gestures_armed);
        assert_eq!(status.motion, None);
    }

    #[test]
    fn test_breathing_moves_root() {
        let mut a = avatar();
        a.tick(1.0);
        let root = a.model().unwrap().skeleton().joint(Joint::Root).copied().unwrap();
        assert!(root.translation.x > 0.0);
    }
}
