use std::time::{Duration, Instant};

/// Rate-limits and deduplicates outgoing heading messages.
///
/// A heading is transmitted at most once per interval, and only when it
/// differs from the last transmitted value. Whatever the heading is when the
/// interval elapses is what goes out; intermediate values are dropped.
#[derive(Debug)]
pub struct IntentThrottler {
    interval: Duration,
    last_sent_angle: Option<i32>,
    last_send_at: Option<Instant>,
}

impl IntentThrottler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_sent_angle: None,
            last_send_at: None,
        }
    }

    /// Offer the current heading; returns the angle to transmit, if any.
    pub fn pump(&mut self, now: Instant, angle: i32) -> Option<i32> {
        if let Some(at) = self.last_send_at {
            if now.saturating_duration_since(at) < self.interval {
                return None;
            }
        }
        if self.last_sent_angle == Some(angle) {
            return None;
        }
        self.last_send_at = Some(now);
        self.last_sent_angle = Some(angle);
        Some(angle)
    }

    /// Forget send history so a fresh session gets the heading immediately.
    pub fn reset(&mut self) {
        self.last_sent_angle = None;
        self.last_send_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(200);

    #[test]
    fn test_duplicate_angle_is_suppressed() {
        let base = Instant::now();
        let mut throttler = IntentThrottler::new(INTERVAL);

        assert_eq!(throttler.pump(base, 10), Some(10));
        assert_eq!(throttler.pump(base + INTERVAL, 10), None);
        assert_eq!(throttler.pump(base + INTERVAL * 2, 10), None);
    }

    #[test]
    fn test_at_most_one_send_per_interval() {
        let base = Instant::now();
        let mut throttler = IntentThrottler::new(INTERVAL);

        assert_eq!(throttler.pump(base, 10), Some(10));
        // Changed value, but inside the interval window.
        assert_eq!(throttler.pump(base + Duration::from_millis(50), 20), None);
        // Whichever value is current when the interval elapses goes out.
        assert_eq!(throttler.pump(base + INTERVAL, 25), Some(25));
    }

    #[test]
    fn test_changed_angle_sends_after_interval() {
        let base = Instant::now();
        let mut throttler = IntentThrottler::new(INTERVAL);

        assert_eq!(throttler.pump(base, 10), Some(10));
        assert_eq!(throttler.pump(base + INTERVAL, 20), Some(20));
        assert_eq!(throttler.pump(base + INTERVAL * 2, 10), Some(10));
    }

    #[test]
    fn test_unchanged_angle_does_not_consume_the_window() {
        let base = Instant::now();
        let mut throttler = IntentThrottler::new(INTERVAL);

        assert_eq!(throttler.pump(base, 10), Some(10));
        assert_eq!(throttler.pump(base + INTERVAL, 10), None);
        // The suppressed duplicate above must not delay a real change.
        assert_eq!(
            throttler.pump(base + INTERVAL + Duration::from_millis(10), 20),
            Some(20)
        );
    }

    #[test]
    fn test_reset_allows_resending_same_angle() {
        let base = Instant::now();
        let mut throttler = IntentThrottler::new(INTERVAL);

        assert_eq!(throttler.pump(base, 10), Some(10));
        throttler.reset();
        assert_eq!(throttler.pump(base + Duration::from_millis(1), 10), Some(10));
    }
}
