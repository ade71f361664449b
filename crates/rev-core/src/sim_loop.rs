use crate::engine::{Engine, DT};
use crate::sync::{EngineSnapshot, SharedState};
use crate::timebase::TimeBase;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Wall-clock period per tick; paired with [`DT`] simulated seconds.
    pub tick: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // 10 ms of wall clock per 0.01 s of simulated time.
            tick: Duration::from_secs_f64(DT),
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct SimStats {
    pub ticks_executed: u64,
    pub max_step_us: u64,
}

/// Fixed-cadence driver of the engine model. Runs on its own thread and is
/// the only writer of engine state; pedal intent and reset requests come in
/// through [`SharedState`], snapshots go out the same way.
///
/// Pacing is a plain sleep per iteration. Sleep jitter is not carried
/// forward, so simulated time drifts slightly behind wall clock under load.
pub struct SimLoop {
    engine: Engine,
    config: SimConfig,
    shared: Arc<SharedState>,
    timebase: TimeBase,
    stats: SimStats,
}

impl SimLoop {
    pub fn new(engine: Engine, config: SimConfig, shared: Arc<SharedState>, timebase: TimeBase) -> Self {
        Self {
            engine,
            config,
            shared,
            timebase,
            stats: SimStats::default(),
        }
    }

    /// Tick until the stop flag is observed. Shutdown latency is bounded by
    /// one tick period.
    pub fn run(&mut self) {
        while self.shared.is_running() {
            let step_start = Instant::now();

            if self.shared.take_reset() {
                log::debug!("rpm reset requested");
                self.engine.reset();
            }

            let pedal = self.shared.pedal();
            self.engine.advance(pedal);
            self.stats.ticks_executed += 1;

            self.shared.publish(EngineSnapshot {
                timestamp_us: self.timebase.now_us(),
                tick: self.stats.ticks_executed,
                rpm: self.engine.rpm(),
                torque: self.engine.torque(),
            });

            let step_us = step_start.elapsed().as_micros() as u64;
            self.stats.max_step_us = self.stats.max_step_us.max(step_us);

            std::thread::sleep(self.config.tick);
        }
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConstants;
    use std::thread;

    fn spawn_loop(shared: Arc<SharedState>) -> thread::JoinHandle<SimStats> {
        let engine = Engine::new(EngineConstants::default()).unwrap();
        let config = SimConfig {
            tick: Duration::from_millis(1),
        };
        thread::spawn(move || {
            let mut sim = SimLoop::new(engine, config, shared, TimeBase::new());
            sim.run();
            sim.stats().clone()
        })
    }

    #[test]
    fn stops_when_requested_and_reports_ticks() {
        let shared = Arc::new(SharedState::new());
        let handle = spawn_loop(Arc::clone(&shared));
        thread::sleep(Duration::from_millis(50));
        shared.request_stop();
        let stats = handle.join().unwrap();
        assert!(stats.ticks_executed > 0);
        assert_eq!(stats.ticks_executed, shared.snapshot().tick);
    }

    #[test]
    fn pedal_intent_reaches_the_engine() {
        let shared = Arc::new(SharedState::new());
        shared.set_pedal(true);
        let handle = spawn_loop(Arc::clone(&shared));
        thread::sleep(Duration::from_millis(50));
        shared.request_stop();
        handle.join().unwrap();
        assert!(shared.snapshot().rpm > 0.0);
    }

    #[test]
    fn reset_request_zeroes_rpm() {
        let shared = Arc::new(SharedState::new());
        shared.set_pedal(true);
        let handle = spawn_loop(Arc::clone(&shared));
        thread::sleep(Duration::from_millis(50));

        shared.set_pedal(false);
        shared.request_reset();
        thread::sleep(Duration::from_millis(20));
        shared.request_stop();
        handle.join().unwrap();

        assert_eq!(shared.snapshot().rpm, 0.0);
        assert_eq!(shared.snapshot().torque, 0.0);
    }
}
