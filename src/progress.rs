//! Load progress tracking.

/// Counts completed asynchronous loads against a fixed expected total.
///
/// Drives the startup progress bar. The count only moves forward; percent is
/// therefore monotonically non-decreasing over a load sequence.
#[derive(Clone, Copy, Debug)]
pub struct LoadProgress {
    completed: u32,
    total: u32,
}

impl LoadProgress {
    pub fn new(total: u32) -> Self {
        Self {
            completed: 0,
            total: total.max(1),
        }
    }

    /// Record one completed load. Saturates at the total.
    pub fn complete_one(&mut self) {
        if self.completed < self.total {
            self.completed += 1;
            log::info!("loaded {}/{} ({}%)", self.completed, self.total, self.percent());
        }
    }

    /// Completion as a fraction in 0..=1.
    pub fn fraction(&self) -> f32 {
        self.completed as f32 / self.total as f32
    }

    /// Completion as a rounded percentage.
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_monotone_and_rounded() {
        let mut progress = LoadProgress::new(3);
        let mut last = 0;
        let mut seen = Vec::new();
        for _ in 0..3 {
            progress.complete_one();
            assert!(progress.percent() >= last);
            last = progress.percent();
            seen.push(progress.percent());
        }
        // round(1/3 * 100) = 33, round(2/3 * 100) = 67.
        assert_eq!(seen, vec![33, 67, 100]);
    }

    #[test]
    fn reaches_total_exactly_once() {
        let mut progress = LoadProgress::new(2);
        assert!(!progress.is_done());
        progress.complete_one();
        assert!(!progress.is_done());
        progress.complete_one();
        assert!(progress.is_done());
        assert_eq!(progress.percent(), 100);

        // Extra completions latch rather than overflow.
        progress.complete_one();
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn zero_total_is_clamped() {
        let progress = LoadProgress::new(0);
        assert!(!progress.is_done());
        assert_eq!(progress.percent(), 0);
    }
}
