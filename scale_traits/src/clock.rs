use std::thread;
use std::time::{Duration, Instant};

/// Monotonic clock used for read pacing and session deadlines.
///
/// - now(): returns a monotonic Instant
/// - sleep(): blocks for the provided duration (test clocks only advance time)
/// - elapsed_since(): time passed since an epoch Instant, saturating at zero
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    fn elapsed_since(&self, epoch: Instant) -> Duration {
        self.now().saturating_duration_since(epoch)
    }
}

/// Real-time clock backed by std::time::Instant.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, d: Duration) {
        (**self).sleep(d);
    }
}

#[cfg(any(test, feature = "test-clock"))]
pub mod test_clock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Deterministic clock whose time only moves when slept on or advanced.
    ///
    /// Clones share the same timeline, so a test can keep a handle while the
    /// parser owns another.
    #[derive(Debug, Clone)]
    pub struct TestClock {
        origin: Instant,
        state: Arc<Mutex<State>>,
    }

    #[derive(Debug, Default)]
    struct State {
        offset: Duration,
        sleeps: usize,
    }

    impl Default for TestClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestClock {
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
                state: Arc::new(Mutex::new(State::default())),
            }
        }

        /// Move time forward without counting a sleep.
        pub fn advance(&self, d: Duration) {
            if let Ok(mut st) = self.state.lock() {
                st.offset = st.offset.saturating_add(d);
            }
        }

        /// Total simulated time elapsed since construction.
        pub fn elapsed(&self) -> Duration {
            self.state.lock().map(|st| st.offset).unwrap_or_default()
        }

        /// Number of `sleep` calls observed.
        pub fn sleeps(&self) -> usize {
            self.state.lock().map(|st| st.sleeps).unwrap_or_default()
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Instant {
            self.origin + self.elapsed()
        }

        fn sleep(&self, d: Duration) {
            if let Ok(mut st) = self.state.lock() {
                st.offset = st.offset.saturating_add(d);
                st.sleeps += 1;
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn sleep_advances_shared_timeline() {
            let clock = TestClock::new();
            let handle = clock.clone();
            let t0 = clock.now();
            clock.sleep(Duration::from_millis(100));
            clock.sleep(Duration::from_millis(100));
            assert_eq!(handle.sleeps(), 2);
            assert_eq!(handle.elapsed_since(t0), Duration::from_millis(200));
        }

        #[test]
        fn advance_does_not_count_as_sleep() {
            let clock = TestClock::new();
            clock.advance(Duration::from_secs(1));
            assert_eq!(clock.sleeps(), 0);
            assert_eq!(clock.elapsed(), Duration::from_secs(1));
        }
    }
}
