// Tour clock
//
// Runs while the tour is ACTIVE. The presentation layer polls `elapsed()` for
// its once-per-second display; the clock itself never touches tour state.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct TourClock {
    started: Option<Instant>,
    frozen: Option<Duration>,
}

impl TourClock {
    pub fn new() -> Self {
        TourClock::default()
    }

    /// Starts (or restarts) the clock from zero
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
        self.frozen = None;
    }

    /// Freezes the elapsed value; later calls are no-ops
    pub fn stop(&mut self) {
        if self.frozen.is_none() {
            if let Some(started) = self.started {
                self.frozen = Some(started.elapsed());
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some() && self.frozen.is_none()
    }

    pub fn elapsed(&self) -> Duration {
        match (self.frozen, self.started) {
            (Some(frozen), _) => frozen,
            (None, Some(started)) => started.elapsed(),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

/// Formats milliseconds as zero-padded `MM:SS`
pub fn format_time(milliseconds: u64) -> String {
    let seconds = milliseconds / 1000;
    let minutes = seconds / 60;
    let remaining_seconds = seconds % 60;
    format!("{:02}:{:02}", minutes, remaining_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(999), "00:00");
        assert_eq!(format_time(61_500), "01:01");
        assert_eq!(format_time(3_600_000), "60:00");
    }

    #[test]
    fn test_unstarted_clock_reads_zero() {
        let clock = TourClock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_stopped_clock_is_frozen() {
        let mut clock = TourClock::new();
        clock.start();
        assert!(clock.is_running());
        clock.stop();
        let first = clock.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.elapsed(), first);
        assert!(!clock.is_running());
    }
}
