use serde::Serialize;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// State published by the simulation loop once per tick.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EngineSnapshot {
    pub timestamp_us: u64,
    pub tick: u64,
    pub rpm: f64,
    pub torque: f64,
}

/// Wait-free single-writer/single-reader slot. The writer fills the next
/// slot and then publishes its index; the reader always sees a complete value.
struct TripleBuffer<T: Copy + Default> {
    slots: [UnsafeCell<T>; 3],
    index: AtomicUsize,
}

unsafe impl<T: Copy + Default + Send> Send for TripleBuffer<T> {}
unsafe impl<T: Copy + Default + Sync> Sync for TripleBuffer<T> {}

impl<T: Copy + Default> TripleBuffer<T> {
    fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| UnsafeCell::new(T::default())),
            index: AtomicUsize::new(0),
        }
    }

    fn publish(&self, value: T) {
        let next = (self.index.load(Ordering::Relaxed) + 1) % 3;
        unsafe {
            *self.slots[next].get() = value;
        }
        self.index.store(next, Ordering::Release);
    }

    fn load(&self) -> T {
        let idx = self.index.load(Ordering::Acquire);
        unsafe { *self.slots[idx].get() }
    }
}

/// Cross-loop state: pedal intent and lifecycle flags written by the UI loop,
/// engine snapshots written by the simulation loop. Each field is
/// independently atomic; no cross-field consistency is assumed, so readers
/// may observe a pedal flag one tick newer than the snapshot next to it.
pub struct SharedState {
    pedal_pressed: AtomicBool,
    running: AtomicBool,
    reset_pending: AtomicBool,
    snapshot: TripleBuffer<EngineSnapshot>,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            pedal_pressed: AtomicBool::new(false),
            running: AtomicBool::new(true),
            reset_pending: AtomicBool::new(false),
            snapshot: TripleBuffer::new(),
        }
    }

    pub fn set_pedal(&self, pressed: bool) {
        self.pedal_pressed.store(pressed, Ordering::Relaxed);
    }

    pub fn pedal(&self) -> bool {
        self.pedal_pressed.load(Ordering::Relaxed)
    }

    /// One-way transition; once stopped, the state never runs again.
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Ask the simulation loop to zero the engine on its next tick.
    pub fn request_reset(&self) {
        self.reset_pending.store(true, Ordering::Relaxed);
    }

    /// Consume a pending reset request. Returns true at most once per request.
    pub fn take_reset(&self) -> bool {
        self.reset_pending.swap(false, Ordering::Relaxed)
    }

    /// Called by the simulation loop every tick (non-blocking).
    pub fn publish(&self, snapshot: EngineSnapshot) {
        self.snapshot.publish(snapshot);
    }

    /// Latest published snapshot; at most one tick stale for the reader.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot.load()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn pedal_flag_round_trips() {
        let shared = SharedState::new();
        assert!(!shared.pedal());
        shared.set_pedal(true);
        assert!(shared.pedal());
        shared.set_pedal(false);
        assert!(!shared.pedal());
    }

    #[test]
    fn stop_is_one_way() {
        let shared = SharedState::new();
        assert!(shared.is_running());
        shared.request_stop();
        assert!(!shared.is_running());
    }

    #[test]
    fn reset_request_is_consumed_once() {
        let shared = SharedState::new();
        assert!(!shared.take_reset());
        shared.request_reset();
        assert!(shared.take_reset());
        assert!(!shared.take_reset());
    }

    #[test]
    fn snapshot_reader_sees_latest_publish() {
        let shared = SharedState::new();
        assert_eq!(shared.snapshot().tick, 0);
        shared.publish(EngineSnapshot {
            timestamp_us: 1,
            tick: 7,
            rpm: 1234.5,
            torque: 56.0,
        });
        let snap = shared.snapshot();
        assert_eq!(snap.tick, 7);
        assert_eq!(snap.rpm, 1234.5);
    }

    #[test]
    fn snapshot_ticks_are_monotonic_across_threads() {
        let shared = Arc::new(SharedState::new());
        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for tick in 1..=10_000u64 {
                    shared.publish(EngineSnapshot {
                        timestamp_us: tick,
                        tick,
                        rpm: tick as f64,
                        torque: tick as f64 * 2.0,
                    });
                    if tick % 64 == 0 {
                        thread::yield_now();
                    }
                }
            })
        };

        let mut last_tick = 0;
        while last_tick < 10_000 {
            let snap = shared.snapshot();
            assert!(snap.tick >= last_tick, "snapshot went backwards");
            last_tick = snap.tick;
        }
        writer.join().unwrap();
    }
}
