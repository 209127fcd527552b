//! Cumulative, monotonic progress across an upload batch.
//!
//! The `0..(100 - reserve)` range is split into equal shares, one per file.
//! File *i* owns `[i * share, (i + 1) * share]`. The remaining reserve is
//! consumed by the finalizing phase.

use crate::config::PipelineConfig;

/// Progress reported by a transport while bytes are in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferProgress {
    pub loaded: u64,
    pub total: u64,
}

impl TransferProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        Self { loaded, total }
    }

    /// Fraction in `0.0..=1.0`, or `None` when the total is unknown.
    pub fn fraction(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some((self.loaded as f64 / self.total as f64).clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone)]
pub struct ProgressTracker {
    file_count: usize,
    share: f64,
    reserve: f64,
    ceiling: f64,
    rate: f64,
    current_file: usize,
    percent: f64,
    transfer_seen: bool,
}

impl ProgressTracker {
    pub fn new(file_count: usize, config: &PipelineConfig) -> Self {
        let reserve = config.finalize_reserve.clamp(0.0, 100.0);
        let share = if file_count == 0 {
            0.0
        } else {
            (100.0 - reserve) / file_count as f64
        };
        Self {
            file_count,
            share,
            reserve,
            ceiling: config.interpolation_ceiling.clamp(0.0, 1.0),
            rate: config.interpolation_rate.clamp(0.0, 1.0),
            current_file: 0,
            percent: 0.0,
            transfer_seen: false,
        }
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn share(&self) -> f64 {
        self.share
    }

    fn base(&self) -> f64 {
        self.current_file as f64 * self.share
    }

    /// Start of the finalizing phase.
    pub fn finalize_floor(&self) -> f64 {
        100.0 - self.reserve
    }

    /// Moves progress forward; lower values are ignored. Returns whether it moved.
    pub fn advance_to(&mut self, percent: f64) -> bool {
        let target = percent.clamp(0.0, 100.0);
        if target > self.percent {
            self.percent = target;
            true
        } else {
            false
        }
    }

    /// Enters the share of file `index`.
    pub fn begin_file(&mut self, index: usize) -> bool {
        self.current_file = index.min(self.file_count);
        self.transfer_seen = false;
        let base = self.base();
        self.advance_to(base)
    }

    /// Maps a transfer event into the current file's share.
    pub fn record_transfer(&mut self, transfer: TransferProgress) -> bool {
        let Some(fraction) = transfer.fraction() else {
            return false;
        };
        self.transfer_seen = true;
        let value = self.base() + self.share * fraction;
        self.advance_to(value)
    }

    /// One eased step toward the interpolation ceiling of the current file.
    ///
    /// Does nothing once real transfer events have been observed for it.
    pub fn interpolate(&mut self) -> bool {
        if self.transfer_seen {
            return false;
        }
        let ceiling = self.base() + self.share * self.ceiling;
        let remaining = ceiling - self.percent;
        if remaining <= f64::EPSILON {
            return false;
        }
        let value = self.percent + remaining * self.rate;
        self.advance_to(value)
    }

    /// Commits the full share of the current file, whatever its outcome.
    pub fn complete_file(&mut self) -> bool {
        let end = self.base() + self.share;
        self.advance_to(end)
    }

    /// Next value of the finalizing animation, ending at exactly 100.
    pub fn finalize_step(&mut self, step: u32, steps: u32) -> bool {
        let steps = steps.max(1);
        let step = step.min(steps);
        let floor = self.finalize_floor();
        let value = floor + self.reserve * (step as f64 / steps as f64);
        let value = if step == steps { 100.0 } else { value };
        self.advance_to(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shares_reserve_five_percent() {
        let tracker = ProgressTracker::new(3, &PipelineConfig::default());
        assert!((tracker.share() - 95.0 / 3.0).abs() < 1e-9);
        assert_eq!(tracker.finalize_floor(), 95.0);
    }

    #[test]
    fn test_advance_never_regresses() {
        let mut tracker = ProgressTracker::new(2, &PipelineConfig::default());
        assert!(tracker.advance_to(40.0));
        assert!(!tracker.advance_to(10.0));
        assert_eq!(tracker.percent(), 40.0);
    }

    #[test]
    fn test_transfer_maps_into_share() {
        let mut tracker = ProgressTracker::new(2, &PipelineConfig::default());
        tracker.begin_file(1);
        assert_eq!(tracker.percent(), 47.5);

        tracker.record_transfer(TransferProgress::new(50, 100));
        assert!((tracker.percent() - 71.25).abs() < 1e-9);

        // Unknown total is ignored
        assert!(!tracker.record_transfer(TransferProgress::new(10, 0)));
    }

    #[test]
    fn test_interpolation_stays_below_ceiling() {
        let mut tracker = ProgressTracker::new(1, &PipelineConfig::default());
        tracker.begin_file(0);
        for _ in 0..500 {
            tracker.interpolate();
        }
        assert!(tracker.percent() < 95.0 * 0.9 + 1e-6);
        assert!(tracker.percent() > 80.0);

        tracker.complete_file();
        assert_eq!(tracker.percent(), 95.0);
    }

    #[test]
    fn test_interpolation_yields_to_transfer_events() {
        let mut tracker = ProgressTracker::new(1, &PipelineConfig::default());
        tracker.begin_file(0);
        tracker.record_transfer(TransferProgress::new(1, 10));
        let before = tracker.percent();
        assert!(!tracker.interpolate());
        assert_eq!(tracker.percent(), before);
    }

    #[test]
    fn test_finalize_ends_at_hundred() {
        let mut tracker = ProgressTracker::new(1, &PipelineConfig::default());
        tracker.begin_file(0);
        tracker.complete_file();
        for step in 1..=5 {
            tracker.finalize_step(step, 5);
        }
        assert_eq!(tracker.percent(), 100.0);
    }
}
