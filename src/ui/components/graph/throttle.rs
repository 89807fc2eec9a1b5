//! Minimum interval between plotted readings

use log::debug;

/// Admits at most one reading per interval onto the chart
///
/// Readings arriving faster than the interval are dropped from the plot; the
/// caller may still show them elsewhere (e.g. the live value text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotThrottle {
    interval_ms: u64,
    last_plotted_ms: Option<u64>,
}

impl PlotThrottle {
    /// Create a throttle that has not plotted anything yet
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_plotted_ms: None,
        }
    }

    /// Decide whether a reading at `now_ms` should be plotted
    ///
    /// An admitted reading starts a new interval.
    pub fn admit(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_plotted_ms {
            let elapsed = now_ms.saturating_sub(last);
            if elapsed < self.interval_ms {
                debug!(
                    "Skipping plot, {} ms of {} ms interval elapsed",
                    elapsed, self.interval_ms
                );
                return false;
            }
        }

        self.last_plotted_ms = Some(now_ms);
        true
    }

    /// Continue from the last plotted time of restored history
    pub fn resume_from(&mut self, last_plotted_ms: u64) {
        self.last_plotted_ms = Some(last_plotted_ms);
    }

    /// Forget the last plotted time; the next reading is admitted
    pub fn reset(&mut self) {
        self.last_plotted_ms = None;
    }

    /// Time of the last admitted reading
    pub fn last_plotted_ms(&self) -> Option<u64> {
        self.last_plotted_ms
    }

    /// Configured interval
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_reading_admitted() {
        let mut throttle = PlotThrottle::new(60_000);
        assert!(throttle.admit(1_000));
        assert_eq!(throttle.last_plotted_ms(), Some(1_000));
    }

    #[test]
    fn test_readings_inside_interval_dropped() {
        let mut throttle = PlotThrottle::new(60_000);
        assert!(throttle.admit(0));
        assert!(!throttle.admit(30_000));
        assert!(!throttle.admit(59_999));
        assert!(throttle.admit(60_000));
        // The interval restarts from the admitted reading
        assert!(!throttle.admit(100_000));
        assert!(throttle.admit(120_000));
    }

    #[test]
    fn test_resume_and_reset() {
        let mut throttle = PlotThrottle::new(60_000);
        throttle.resume_from(500_000);
        assert!(!throttle.admit(520_000));

        throttle.reset();
        assert!(throttle.admit(520_000));
    }

    #[test]
    fn test_clock_going_backwards_does_not_admit() {
        let mut throttle = PlotThrottle::new(60_000);
        assert!(throttle.admit(1_000_000));
        assert!(!throttle.admit(10_000));
    }
}
