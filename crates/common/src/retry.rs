use rand::Rng;
use std::time::Duration;

/// Bounded retry policy with jitter for reconnection attempts.
///
/// Delay formula: min(max_delay, base * 2^attempt) + random_jitter.
/// With `max_delay == base` the delay is constant, which is how the
/// market-data client retries (fixed 3s between attempts).
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    base: Duration,
    max_delay: Duration,
    jitter_factor: f64,
    max_attempts: u32,
    attempt: u32,
}

impl Default for RetryPolicy {
    /// The market-data client's reconnect policy: fixed 3s delay,
    /// at most 5 attempts, 10% jitter.
    fn default() -> Self {
        Self::fixed(Duration::from_secs(3), 5, 0.1)
    }
}

impl RetryPolicy {
    /// Create a policy with a constant per-attempt delay.
    ///
    /// # Arguments
    /// * `delay` - Delay between attempts
    /// * `max_attempts` - Attempts allowed before the policy is exhausted
    /// * `jitter_factor` - Jitter as a fraction of the delay (0.0 to 1.0).
    ///   Negative values are clamped to 0.
    pub fn fixed(delay: Duration, max_attempts: u32, jitter_factor: f64) -> Self {
        Self::new(delay, delay, max_attempts, jitter_factor)
    }

    /// Create a policy whose delay doubles per attempt up to `max_delay`.
    pub fn new(
        base: Duration,
        max_delay: Duration,
        max_attempts: u32,
        jitter_factor: f64,
    ) -> Self {
        Self {
            base,
            max_delay,
            // Clamp negative jitter to 0 to prevent gen_range panic
            jitter_factor: jitter_factor.max(0.0),
            max_attempts,
            attempt: 0,
        }
    }

    /// Calculate the next delay and consume one attempt.
    ///
    /// Returns `None` once the attempt budget is spent; the caller must
    /// stop retrying at that point.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_attempts {
            return None;
        }

        let exp_delay = self.base.saturating_mul(2u32.saturating_pow(self.attempt));
        let capped_delay = exp_delay.min(self.max_delay);

        // Jitter: random value in [-jitter_factor, +jitter_factor] of the delay
        let jitter_range = capped_delay.as_secs_f64() * self.jitter_factor;
        let jitter = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(-jitter_range..=jitter_range)
        } else {
            0.0
        };
        let final_secs = (capped_delay.as_secs_f64() + jitter).max(0.0);

        self.attempt = self.attempt.saturating_add(1);

        Some(Duration::from_secs_f64(final_secs))
    }

    /// Whether the attempt budget is spent.
    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    /// Reset the attempt counter (call after a successful connection).
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Get current attempt number.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Get the attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
