//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

use crate::config::LivenessConfig;

/// Doubling delay schedule, capped, with up to 10% added jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    jitter: bool,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            jitter: true,
        }
    }

    /// Same schedule without jitter, for deterministic timing.
    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// `base * 2^(attempt - 1)`, capped at `max`. Attempt 0 waits nothing.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.jittered(self.floor(attempt))
    }

    /// The delay before jitter is applied.
    pub fn floor(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 2u32.saturating_pow(attempt - 1);
        self.base.saturating_mul(factor).min(self.max)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        let range_ms = (delay.as_millis() / 10) as u64;
        if !self.jitter || range_ms == 0 {
            return delay;
        }
        delay + Duration::from_millis(rand::thread_rng().gen_range(0..range_ms))
    }
}

impl From<&LivenessConfig> for Backoff {
    fn from(config: &LivenessConfig) -> Self {
        Self::new(
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubling_schedule() {
        let backoff = Backoff::new(Duration::from_millis(100), Duration::from_millis(2000)).without_jitter();
        assert_eq!(backoff.delay(0), Duration::ZERO);
        assert_eq!(backoff.delay(1), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(200));
        assert_eq!(backoff.delay(4), Duration::from_millis(800));
        assert_eq!(backoff.delay(10), Duration::from_millis(2000));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let backoff = Backoff::new(Duration::from_millis(1000), Duration::from_secs(60));
        for _ in 0..50 {
            let delay = backoff.delay(2);
            assert!(delay >= Duration::from_millis(2000));
            assert!(delay < Duration::from_millis(2200));
        }
    }

    #[test]
    fn test_large_attempt_does_not_overflow() {
        let backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(60));
        assert_eq!(backoff.floor(u32::MAX), Duration::from_secs(60));
    }

    #[test]
    fn test_from_liveness_config() {
        let backoff = Backoff::from(&LivenessConfig::default());
        assert_eq!(backoff.floor(1), Duration::from_secs(1));
        assert_eq!(backoff.floor(4), Duration::from_secs(8));
    }
}
