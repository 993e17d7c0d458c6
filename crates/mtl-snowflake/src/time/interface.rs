use core::time::Duration;

/// A trait for wall-clock sources.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// clock in tests. Readings are **nanoseconds since the Unix epoch** and may
/// move backward; handling that is the generator's job.
///
/// Every wait the generator performs goes through [`TimeSource::sleep`], so a
/// virtual clock can advance itself instead of blocking the thread.
///
/// # Example
///
/// ```
/// use mtl_snowflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn now_nanos(&self) -> i64 {
///         1_700_000_000_000_000_000
///     }
/// }
///
/// assert_eq!(FixedTime.now_nanos(), 1_700_000_000_000_000_000);
/// ```
pub trait TimeSource {
    /// Returns the current time in nanoseconds since the Unix epoch.
    fn now_nanos(&self) -> i64;

    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_nanos(&self) -> i64 {
        (**self).now_nanos()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::sync::Arc<T> {
    fn now_nanos(&self) -> i64 {
        (**self).now_nanos()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}
