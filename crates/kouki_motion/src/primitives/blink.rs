use crate::rig::ExpressionSurface;
use rand::Rng;
use std::ops::Range;

pub const BLINK_CHANNEL: &str = "blink";
/// How long the eyes stay shut.
pub const BLINK_HOLD_SECS: f32 = 0.15;
/// A new wait is drawn from this range after every blink.
pub const BLINK_INTERVAL: Range<f32> = 3.0..5.0;

#[derive(Debug, Clone)]
pub struct Blink {
    timer: f32,
    threshold: f32,
    in_flight: bool,
}

impl Blink {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            timer: 0.0,
            threshold: rng.gen_range(BLINK_INTERVAL),
            in_flight: false,
        }
    }

    /// Accumulate `dt`; closes the eyes when the wait runs out.
    ///
    /// Returns `true` when a blink started this frame. The caller owns the
    /// reopening: schedule [`Blink::finish`] after [`BLINK_HOLD_SECS`].
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        rng: &mut R,
        surface: &mut dyn ExpressionSurface,
    ) -> bool {
        self.timer += dt;
        if self.in_flight || self.timer <= self.threshold {
            return false;
        }

        if let Err(e) = surface.set_weight(BLINK_CHANNEL, 1.0) {
            tracing::debug!("Blink skipped: {}", e);
        }
        self.timer = 0.0;
        self.threshold = rng.gen_range(BLINK_INTERVAL);
        self.in_flight = true;
        true
    }

    /// Reopen the eyes. Tolerates the model having gone away meanwhile.
    pub fn finish(&mut self, surface: Option<&mut dyn ExpressionSurface>) {
        self.in_flight = false;
        if let Some(surface) = surface {
            if let Err(e) = surface.set_weight(BLINK_CHANNEL, 0.0) {
                tracing::debug!("Blink reset skipped: {}", e);
            }
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}
