//! Frame clock and the deferred-action queue.
//!
//! Deferred actions (blink reset, synthetic speech end, neutral restoration)
//! are plain entries counted down by the same frame delta that drives the
//! animation, so a frame sequence fully determines when they fire.

/// Clamp a measured delta to something the primitives can consume.
pub fn sanitize_delta(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    elapsed: f64,
    frames: u64,
}

impl AnimationClock {
    /// Advance by one frame. Returns the delta actually applied.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let dt = sanitize_delta(dt);
        self.elapsed += dt as f64;
        self.frames += 1;
        dt
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Work scheduled to run a fixed time after it was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Close the eyes' blink channel again.
    BlinkReset,
    /// End a synthetic speaking window, if it is still the current one.
    StopSpeaking { generation: u64 },
    /// Return to neutral, unless another expression was set since.
    RestoreNeutral { generation: u64 },
    /// Start the gesture countdown.
    ArmGestures,
}

#[derive(Debug, Clone)]
struct TimerEntry {
    remaining: f32,
    action: Deferred,
}

#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    pub fn schedule(&mut self, after_secs: f32, action: Deferred) {
        self.entries.push(TimerEntry {
            remaining: after_secs.max(0.0),
            action,
        });
    }

    /// Count every entry down by `dt` and return those that came due,
    /// earliest deadline first. Ties keep scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<Deferred> {
        let mut due = Vec::new();
        self.entries.retain_mut(|entry| {
            entry.remaining -= dt;
            if entry.remaining <= 0.0 {
                due.push((entry.remaining, entry.action));
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, action)| action).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, pred: impl Fn(&Deferred) -> bool) -> bool {
        self.entries.iter().any(|e| pred(&e.action))
    }
}
