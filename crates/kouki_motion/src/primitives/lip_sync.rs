use crate::rig::ExpressionSurface;

pub const MOUTH_CHANNEL: &str = "aa";
/// Peak mouth opening while talking.
pub const MOUTH_GAIN: f32 = 0.6;
const MOUTH_RATE: f32 = 10.0;

/// Speaking flag plus the lip-sync phase it drives.
#[derive(Debug, Clone, Default)]
pub struct SpeakingState {
    active: bool,
    timer: f32,
    close_pending: bool,
}

impl SpeakingState {
    pub fn start(&mut self) {
        self.active = true;
        self.timer = 0.0;
        self.close_pending = false;
    }

    pub fn stop(&mut self) {
        if self.active {
            self.close_pending = true;
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Drive the mouth channel for this frame. Returns the weight written, if any.
    pub fn update(&mut self, dt: f32, surface: &mut dyn ExpressionSurface) -> Option<f32> {
        let weight = if self.active {
            self.timer += dt;
            (self.timer * MOUTH_RATE).sin().abs() * MOUTH_GAIN
        } else if self.close_pending {
            self.close_pending = false;
            self.timer = 0.0;
            0.0
        } else {
            return None;
        };

        if let Err(e) = surface.set_weight(MOUTH_CHANNEL, weight) {
            tracing::debug!("Lip-sync skipped: {}", e);
        }
        Some(weight)
    }
}
