//! The frame loop task.
//!
//! The avatar is moved into a background task that ticks at a fixed rate,
//! applies queued commands at the start of each frame and publishes an
//! [`AvatarStatus`] snapshot after it.

use crate::avatar::{Avatar, AvatarStatus};
use crate::command::{AvatarHandle, CommandReceiver};
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub struct AvatarRuntime {
    handle: AvatarHandle,
    status_rx: watch::Receiver<AvatarStatus>,
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Avatar>,
}

/// Frame period for a target rate. Zero is treated as one frame per second.
pub fn frame_period(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}

impl AvatarRuntime {
    /// Move `avatar` into a frame loop running at `fps`.
    pub fn spawn(avatar: Avatar, fps: u32) -> Self {
        let (handle, commands) = AvatarHandle::channel();
        let (status_tx, status_rx) = watch::channel(avatar.status());
        let (stop_tx, stop_rx) = oneshot::channel();

        tracing::info!(fps, model_loaded = avatar.model().is_some(), "Frame loop starting");
        let task = tokio::spawn(run_frames(
            avatar,
            commands,
            status_tx,
            stop_rx,
            frame_period(fps),
        ));

        Self {
            handle,
            status_rx,
            stop_tx: Some(stop_tx),
            task,
        }
    }

    pub fn handle(&self) -> AvatarHandle {
        self.handle.clone()
    }

    /// Latest published snapshot.
    pub fn status(&self) -> AvatarStatus {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AvatarStatus> {
        self.status_rx.clone()
    }

    /// Stop the loop and take the avatar back.
    pub async fn shutdown(mut self) -> Result<Avatar> {
        if let Some(stop) = self.stop_tx.take() {
            let _ = stop.send(());
        }
        let avatar = self.task.await.context("Frame loop panicked")?;
        tracing::info!(frames = avatar.clock().frames(), "Frame loop stopped");
        Ok(avatar)
    }
}

async fn run_frames(
    mut avatar: Avatar,
    mut commands: CommandReceiver,
    status_tx: watch::Sender<AvatarStatus>,
    mut stop_rx: oneshot::Receiver<()>,
    period: Duration,
) -> Avatar {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    loop {
        tokio::select! {
            // Explicit stop, or the runtime was dropped
            _ = &mut stop_rx => break,

            _ = interval.tick() => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;

                avatar.frame(&mut commands, dt);
                let _ = status_tx.send(avatar.status());
            }
        }
    }

    avatar
}
