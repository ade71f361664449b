use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Process-wide clock: snapshots carry monotonic time, trace rows also carry
/// wall-clock time for correlation with other logs.
#[derive(Debug, Clone, Copy)]
pub struct TimeBase {
    start: Instant,
}

impl TimeBase {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Monotonic microseconds since construction.
    pub fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Wall-clock microseconds since the Unix epoch.
    pub fn unix_us(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as u64
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_time_advances() {
        let tb = TimeBase::new();
        let a = tb.now_us();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = tb.now_us();
        assert!(b > a);
    }
}
