use std::collections::HashMap;
use std::hash::Hash;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const LOGIN_MAX_ATTEMPTS: usize = 5;
pub const LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Sliding-window counter of failed attempts per key.
#[derive(Clone)]
pub struct AttemptLimiter<K> {
    max_attempts: usize,
    window: Duration,
    attempts: Arc<Mutex<HashMap<K, Vec<Instant>>>>,
}

/// Failed logins per client address.
pub type LoginLimiter = AttemptLimiter<IpAddr>;

impl Default for AttemptLimiter<IpAddr> {
    fn default() -> Self {
        Self::new(LOGIN_MAX_ATTEMPTS, LOGIN_WINDOW)
    }
}

impl<K: Eq + Hash> AttemptLimiter<K> {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// True once `key` has used up its attempts inside the window.
    /// Expired attempts for `key` are dropped on the way.
    pub fn is_blocked(&self, key: &K) -> bool {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let Some(cutoff) = Instant::now().checked_sub(self.window) else {
            return map.get(key).is_some_and(|t| t.len() >= self.max_attempts);
        };
        match map.get_mut(key) {
            Some(stamps) => {
                stamps.retain(|t| *t > cutoff);
                stamps.len() >= self.max_attempts
            }
            None => false,
        }
    }

    /// Record a failed attempt for `key`, dropping every other key whose
    /// attempts have all expired.
    pub fn record_failure(&self, key: K) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        if let Some(cutoff) = now.checked_sub(self.window) {
            map.retain(|_, stamps| {
                stamps.retain(|t| *t > cutoff);
                !stamps.is_empty()
            });
        }
        map.entry(key).or_default().push(now);
    }

    pub fn clear(&self, key: &K) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_max_attempts() {
        let limiter: AttemptLimiter<&str> = AttemptLimiter::new(2, Duration::from_secs(60));
        assert!(!limiter.is_blocked(&"a"));
        limiter.record_failure("a");
        limiter.record_failure("a");
        assert!(limiter.is_blocked(&"a"));
        assert!(!limiter.is_blocked(&"b"));
        limiter.clear(&"a");
        assert!(!limiter.is_blocked(&"a"));
    }

    #[test]
    fn old_attempts_expire() {
        let limiter: AttemptLimiter<&str> = AttemptLimiter::new(1, Duration::from_millis(0));
        limiter.record_failure("a");
        std::thread::sleep(Duration::from_millis(5));
        assert!(!limiter.is_blocked(&"a"));
    }

    fn tracked_keys<K>(limiter: &AttemptLimiter<K>) -> usize {
        limiter.attempts.lock().unwrap().len()
    }

    #[test]
    fn expired_keys_are_dropped() {
        let limiter: AttemptLimiter<&str> = AttemptLimiter::new(3, Duration::from_millis(20));
        limiter.record_failure("a");
        limiter.record_failure("b");
        assert_eq!(tracked_keys(&limiter), 2);

        std::thread::sleep(Duration::from_millis(40));
        limiter.record_failure("c");
        assert_eq!(tracked_keys(&limiter), 1);
        assert!(!limiter.is_blocked(&"a"));
    }
}
