/// Linear gain ramp, advanced once per sample on the audio thread.
///
/// Every target change takes exactly one ramp length to complete, no matter how far the gain has
/// to travel. A new target arriving mid-ramp restarts the ramp from wherever the gain currently
/// is, so rapid automation never builds up a backlog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainSmoother {
    current: f32,
    target: f32,
    step: f64,
    remaining_steps: u32,

    /// Where the ramp in progress started
    start: f32,

    /// Ramp length in samples, fixed between two `reset()` calls
    ramp_length: u32,
}

impl Default for GainSmoother {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl GainSmoother {
    /// Create a smoother that sits at `linear_gain` and jumps instantly until `reset()` gives it
    /// a ramp length.
    pub fn new(linear_gain: f32) -> Self {
        Self {
            current: linear_gain,
            target: linear_gain,
            step: 0.0,
            remaining_steps: 0,
            start: linear_gain,
            ramp_length: 0,
        }
    }

    /// Configure the ramp for a new session. Any ramp in progress is finished on the spot.
    pub fn reset(&mut self, sample_rate: f32, ramp_seconds: f32) {
        // `as` saturates, so NaN and negative products end up as a zero length ramp
        self.ramp_length = (sample_rate as f64 * ramp_seconds as f64).round() as u32;
        self.set_current_and_target(self.target);
    }

    /// Jump straight to `linear_gain` without ramping.
    pub fn set_current_and_target(&mut self, linear_gain: f32) {
        self.current = linear_gain;
        self.target = linear_gain;
        self.step = 0.0;
        self.remaining_steps = 0;
        self.start = linear_gain;
    }

    /// Start ramping towards `linear_gain`. Setting the same target again is a no-op.
    pub fn set_target(&mut self, linear_gain: f32) {
        if linear_gain == self.target {
            return;
        }

        if self.ramp_length == 0 {
            self.set_current_and_target(linear_gain);
            return;
        }

        self.start = self.current;
        self.target = linear_gain;
        self.step = (self.target as f64 - self.start as f64) / self.ramp_length as f64;
        self.remaining_steps = self.ramp_length;
    }

    /// Advance one sample and return the gain to apply to it.
    #[inline]
    pub fn next_value(&mut self) -> f32 {
        if self.remaining_steps == 0 {
            return self.current;
        }

        self.remaining_steps -= 1;
        if self.remaining_steps == 0 {
            self.current = self.target;
        } else {
            // Computed from the start of the ramp instead of accumulated, so rounding errors
            // can't pile up and land on the target before the last step
            let elapsed = (self.ramp_length - self.remaining_steps) as f64;
            self.current = (self.start as f64 + self.step * elapsed) as f32;
        }

        self.current
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn remaining_steps(&self) -> u32 {
        self.remaining_steps
    }

    pub fn ramp_length(&self) -> u32 {
        self.ramp_length
    }

    pub fn is_smoothing(&self) -> bool {
        self.remaining_steps > 0
    }
}
