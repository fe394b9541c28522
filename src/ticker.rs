use std::time::Duration;

/// Event-loop poll interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Focus timer refresh interval in milliseconds
pub const FOCUS_TICK_MS: i64 = 1000;

/// Get the event-loop poll duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// A periodic due-time driven by the event loop. Dropping it cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    period_ms: i64,
    next_due: i64,
}

impl Interval {
    pub fn every(period_ms: i64, now: i64) -> Self {
        Self {
            period_ms,
            next_due: now + period_ms,
        }
    }

    /// True once per elapsed period; skips missed periods instead of
    /// firing repeatedly after a stall
    pub fn poll(&mut self, now: i64) -> bool {
        if now < self.next_due {
            return false;
        }
        let missed = (now - self.next_due) / self.period_ms;
        self.next_due += (missed + 1) * self.period_ms;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_duration() {
        let duration = tick_duration();
        assert_eq!(duration, Duration::from_millis(250));
    }

    #[test]
    fn test_interval_fires_once_per_period() {
        let mut interval = Interval::every(1000, 0);
        assert!(!interval.poll(999));
        assert!(interval.poll(1000));
        assert!(!interval.poll(1500));
        assert!(interval.poll(2000));
    }

    #[test]
    fn test_interval_skips_missed_periods() {
        let mut interval = Interval::every(1000, 0);
        assert!(interval.poll(5300));
        assert!(!interval.poll(5900));
        assert!(interval.poll(6000));
    }
}
