use rand::Rng;
use std::time::Duration;

/// Base delay between fetch attempts against the reader proxy.
pub const BASE_DELAY: Duration = Duration::from_millis(500);

/// Exponential backoff with jitter: `base * 2^attempt`, ±30%.
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    // Cap the exponent so a misconfigured attempt count can't sleep for hours
    let capped_attempt = attempt.min(6);

    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let delay_ms = base_ms.saturating_mul(2_u64.saturating_pow(capped_attempt));

    let jitter_factor = rand::thread_rng().gen_range(0.7..1.3);
    Duration::from_millis((delay_ms as f64 * jitter_factor).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_progression() {
        let base = Duration::from_millis(1000);

        let delay0 = backoff_delay(0, base);
        let delay1 = backoff_delay(1, base);
        let delay2 = backoff_delay(2, base);

        assert!(delay0.as_millis() >= 700 && delay0.as_millis() <= 1300);
        assert!(delay1.as_millis() >= 1400 && delay1.as_millis() <= 2600);
        assert!(delay2.as_millis() >= 2800 && delay2.as_millis() <= 5200);
    }

    #[test]
    fn test_backoff_cap() {
        let base = Duration::from_millis(1000);

        // 1000ms * 2^6 = 64s, ±30%
        let delay_high = backoff_delay(40, base);
        assert!(delay_high.as_millis() >= 44_800 && delay_high.as_millis() <= 83_200);
    }

    #[test]
    fn test_zero_base_never_sleeps() {
        assert_eq!(backoff_delay(3, Duration::ZERO), Duration::ZERO);
    }
}
