//! Frame timing with an explicit start/stop lifecycle.
//!
//! The driver owns when the render loop is live and how much time each tick
//! advances. It produces nothing while stopped, and the first tick after a
//! start reports a zero delta so a long load pause never becomes one giant
//! animation step.

use std::time::Instant;

/// Longest delta a single tick will report, in seconds. Stalls beyond this
/// (debugger, window drag on some platforms) advance as one capped step.
const MAX_DT: f32 = 0.25;

pub struct FrameDriver {
    running: bool,
    last_tick: Option<Instant>,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            running: false,
            last_tick: None,
        }
    }

    /// Begin producing ticks. Idempotent; the tick clock restarts, so the
    /// next delta is zero.
    pub fn start(&mut self) {
        if !self.running {
            log::info!("frame driver started");
        }
        self.running = true;
        self.last_tick = None;
    }

    /// Stop producing ticks until the next [`start`](Self::start).
    pub fn stop(&mut self) {
        if self.running {
            log::info!("frame driver stopped");
        }
        self.running = false;
        self.last_tick = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance the clock and return the elapsed seconds since the previous
    /// tick, or `None` while stopped.
    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Option<f32> {
        if !self.running {
            return None;
        }
        let dt = match self.last_tick {
            Some(last) => now.duration_since(last).as_secs_f32().min(MAX_DT),
            None => 0.0,
        };
        self.last_tick = Some(now);
        Some(dt)
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn stopped_driver_produces_no_ticks() {
        let mut driver = FrameDriver::new();
        assert_eq!(driver.tick(), None);
        driver.start();
        driver.stop();
        assert_eq!(driver.tick(), None);
    }

    #[test]
    fn first_tick_after_start_is_zero() {
        let mut driver = FrameDriver::new();
        driver.start();
        assert_eq!(driver.tick(), Some(0.0));
    }

    #[test]
    fn tick_reports_elapsed_time() {
        let mut driver = FrameDriver::new();
        driver.start();
        let t0 = Instant::now();
        driver.tick_at(t0);
        let dt = driver.tick_at(t0 + Duration::from_millis(16)).unwrap();
        assert!((dt - 0.016).abs() < 1e-4);
    }

    #[test]
    fn long_stalls_are_capped() {
        let mut driver = FrameDriver::new();
        driver.start();
        let t0 = Instant::now();
        driver.tick_at(t0);
        let dt = driver.tick_at(t0 + Duration::from_secs(30)).unwrap();
        assert_eq!(dt, MAX_DT);
    }

    #[test]
    fn restart_resets_the_clock() {
        let mut driver = FrameDriver::new();
        driver.start();
        let t0 = Instant::now();
        driver.tick_at(t0);
        driver.stop();
        driver.start();
        assert_eq!(driver.tick_at(t0 + Duration::from_secs(5)), Some(0.0));
    }
}
