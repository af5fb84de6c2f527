//! Frame pacing and refresh rate measurement.
//!
//! A renderer either measures how fast frames are actually drawn ([`Pacing::Measured`]),
//! or caps the draw rate by sleeping a fixed amount after every frame ([`Pacing::FixedDelay`]).
//! Measurement is done by a [`RefreshTracker`], a rolling window of the most recent
//! render completion times.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of render timestamps kept for the frame rate estimate.
pub const REFRESH_SAMPLE_WINDOW: usize = 60;

/// Delay used by [`Pacing::default`].
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(50);

/// How a renderer spaces out its frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pacing {
    /// Record when each frame completes and estimate the frame rate.
    /// If `show_refresh_rate` is set, the estimate is printed below the frame.
    Measured { show_refresh_rate: bool },
    /// Block for the given duration after drawing each frame.
    FixedDelay(Duration),
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing::FixedDelay(DEFAULT_FRAME_DELAY)
    }
}

impl Pacing {
    /// Whether render timestamps are recorded at all.
    pub fn is_measured(&self) -> bool {
        matches!(self, Pacing::Measured { .. })
    }

    /// Whether the frame rate gets printed below the frame.
    pub fn shows_refresh_rate(&self) -> bool {
        matches!(
            self,
            Pacing::Measured {
                show_refresh_rate: true
            }
        )
    }
}

/// Rolling window of render completion times.
///
/// # Example
///
/// ```rust
/// use std::time::{Duration, Instant};
/// use pixterm::rendering::refresh::RefreshTracker;
///
/// let mut tracker = RefreshTracker::new();
/// let start = Instant::now();
/// // 60 frames spread over exactly one second
/// for i in 0..60u32 {
///     tracker.record(start + Duration::from_secs(1) * i / 59);
/// }
/// assert_eq!(format!("{:.2}", tracker.rate().unwrap()), "60.00");
/// ```
#[derive(Clone, Debug, Default)]
pub struct RefreshTracker {
    timestamps: VecDeque<Instant>,
}

impl RefreshTracker {
    pub fn new() -> Self {
        Self {
            timestamps: VecDeque::with_capacity(REFRESH_SAMPLE_WINDOW + 1),
        }
    }

    /// Records a render completion, evicting the oldest sample once the window is full.
    pub fn record(&mut self, at: Instant) {
        self.timestamps.push_back(at);
        while self.timestamps.len() > REFRESH_SAMPLE_WINDOW {
            self.timestamps.pop_front();
        }
    }

    /// Frames per second over the window.
    ///
    /// `None` until the window holds [`REFRESH_SAMPLE_WINDOW`] samples, and `None` when the
    /// oldest and newest samples are indistinguishable, which happens if frames complete
    /// faster than the clock ticks.
    pub fn rate(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        let oldest = self.timestamps.front()?;
        let newest = self.timestamps.back()?;
        let elapsed = newest.saturating_duration_since(*oldest).as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }
        Some(REFRESH_SAMPLE_WINDOW as f64 / elapsed)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Whether the window holds enough samples to estimate a rate.
    pub fn is_full(&self) -> bool {
        self.timestamps.len() == REFRESH_SAMPLE_WINDOW
    }

    /// Drops all samples, e.g. when the renderer's pacing changes.
    pub fn clear(&mut self) {
        self.timestamps.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(start: Instant, count: u32, step: Duration) -> RefreshTracker {
        let mut tracker = RefreshTracker::new();
        for i in 0..count {
            tracker.record(start + step * i);
        }
        tracker
    }

    #[test]
    fn test_no_rate_before_window_is_full() {
        let start = Instant::now();
        for count in [0, 1, 30, 59] {
            let tracker = tracker_with(start, count, Duration::from_millis(10));
            assert_eq!(tracker.len(), count as usize);
            assert_eq!(tracker.rate(), None);
        }
    }

    #[test]
    fn test_window_keeps_most_recent_sixty() {
        let start = Instant::now();
        let tracker = tracker_with(start, 100, Duration::from_secs(1));
        assert_eq!(tracker.len(), REFRESH_SAMPLE_WINDOW);
        assert_eq!(tracker.timestamps.front(), Some(&(start + Duration::from_secs(40))));
        assert_eq!(tracker.timestamps.back(), Some(&(start + Duration::from_secs(99))));
    }

    #[test]
    fn test_rate_over_one_second_window() {
        let start = Instant::now();
        let mut tracker = RefreshTracker::new();
        for i in 0..60u32 {
            tracker.record(start + Duration::from_secs(1) * i / 59);
        }
        assert_eq!(format!("{:.2}", tracker.rate().unwrap()), "60.00");
    }

    #[test]
    fn test_rate_is_linear_in_elapsed_time() {
        // samples one second apart span 59 seconds
        let tracker = tracker_with(Instant::now(), 60, Duration::from_secs(1));
        let rate = tracker.rate().unwrap();
        assert!((rate - 60.0 / 59.0).abs() < 1e-9);
        assert_eq!(format!("{rate:.2}"), "1.02");
    }

    #[test]
    fn test_zero_elapsed_has_no_rate() {
        let tracker = tracker_with(Instant::now(), 60, Duration::ZERO);
        assert!(tracker.is_full());
        assert_eq!(tracker.rate(), None);
    }

    #[test]
    fn test_clear_starts_a_new_window() {
        let start = Instant::now();
        let mut tracker = tracker_with(start, 60, Duration::from_millis(10));
        assert!(tracker.rate().is_some());
        tracker.clear();
        assert!(tracker.is_empty());
        assert_eq!(tracker.rate(), None);
        tracker.record(start);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_pacing_flags() {
        assert_eq!(Pacing::default(), Pacing::FixedDelay(Duration::from_millis(50)));
        assert!(!Pacing::default().is_measured());
        assert!(Pacing::Measured { show_refresh_rate: false }.is_measured());
        assert!(!Pacing::Measured { show_refresh_rate: false }.shows_refresh_rate());
        assert!(Pacing::Measured { show_refresh_rate: true }.shows_refresh_rate());
    }
}
