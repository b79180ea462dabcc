//! Frame-multiplier clock
//!
//! Speeds and animation steps are tuned per 60 Hz frame. The clock turns the
//! measured frame duration into a multiplier so motion looks the same at any
//! refresh rate.

use crate::consts::{MAX_FRAME_MULTIPLIER, MIN_FRAME_MULTIPLIER, REFERENCE_FRAME_MS};

/// Multiplier for a frame that took `frame_ms`, clamped so a stalled tab
/// cannot teleport entities
pub fn frame_multiplier(frame_ms: f64) -> f32 {
    if !frame_ms.is_finite() || frame_ms <= 0.0 {
        return 1.0;
    }
    ((frame_ms / REFERENCE_FRAME_MS) as f32).clamp(MIN_FRAME_MULTIPLIER, MAX_FRAME_MULTIPLIER)
}

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_frame_at: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last_frame_at: None }
    }

    /// Record a frame at wall-clock `now_ms` and return its multiplier.
    /// The first frame always reports 1.0.
    pub fn observe(&mut self, now_ms: f64) -> f32 {
        let multiplier = match self.last_frame_at {
            Some(last) => frame_multiplier(now_ms - last),
            None => 1.0,
        };
        self.last_frame_at = Some(now_ms);
        multiplier
    }

    /// Forget the previous frame (after a pause or tab switch)
    pub fn reset(&mut self) {
        self.last_frame_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_frame_is_unity() {
        assert!((frame_multiplier(REFERENCE_FRAME_MS) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_slow_display_doubles_step() {
        assert!((frame_multiplier(1000.0 / 30.0) - 2.0).abs() < 1e-4);
        assert!((frame_multiplier(1000.0 / 120.0) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_multiplier_is_clamped() {
        assert_eq!(frame_multiplier(5000.0), MAX_FRAME_MULTIPLIER);
        assert_eq!(frame_multiplier(0.5), MIN_FRAME_MULTIPLIER);
        assert_eq!(frame_multiplier(-3.0), 1.0);
        assert_eq!(frame_multiplier(f64::NAN), 1.0);
    }

    #[test]
    fn test_clock_tracks_previous_frame() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.observe(1000.0), 1.0);
        let m = clock.observe(1000.0 + 1000.0 / 30.0);
        assert!((m - 2.0).abs() < 1e-4);

        clock.reset();
        assert_eq!(clock.observe(9000.0), 1.0);
    }
}
