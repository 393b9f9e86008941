//! # Kouki Motion
//!
//! Per-frame animation for the avatar. One [`Avatar`] owns the loaded model
//! and everything that moves it:
//!
//! - **Always on**: blink, lip-sync, breathing
//! - **Exclusive slot**: head tilt, greeting wave, spontaneous gestures
//! - **Fallback**: idle sway, only while the slot is empty
//!
//! ## Time
//!
//! Nothing here reads the wall clock. Every timer, including the deferred
//! blink reset and neutral restoration, is advanced by the frame delta, so a
//! sequence of `tick(dt)` calls fully determines the output.
//!
//! ## Ownership
//!
//! [`AvatarRuntime`] moves the avatar into a frame loop task. Other tasks
//! talk to it through a cloneable [`AvatarHandle`].

mod avatar;
pub mod clock;
mod command;
pub mod exclusive;
pub mod expression;
pub mod memory_model;
pub mod primitives;
pub mod rig;
mod runtime;
pub mod scheduler;

pub use avatar::{Avatar, AvatarStatus};
pub use command::{AvatarCommand, AvatarHandle, CommandReceiver};
pub use exclusive::{ExclusiveMotion, MotionKind};
pub use memory_model::{MemoryModel, RigManifest};
pub use primitives::{GestureKind, Side};
pub use rig::{AvatarModel, ExpressionSurface, Joint, JointTransform, Renderer, Skeleton, TraceRenderer};
pub use runtime::{frame_period, AvatarRuntime};
pub use scheduler::{GestureScheduler, SchedulerGuard};
