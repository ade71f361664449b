//! Optional JSONL trace of the running simulation.
//!
//! A sampling thread reads the published snapshots at a coarse interval and
//! appends one row per new tick it sees. The file is plain JSONL so it can be
//! grepped or loaded into any plotting tool.

use rev_core::{SharedState, TimeBase};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::warn;

const SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// One sampled simulation state.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    /// Monotonic timestamp of the sampled tick in microseconds
    pub timestamp_us: u64,
    /// Wall-clock Unix timestamp of the sample in microseconds
    pub unix_us: u64,
    /// Simulation tick the row was sampled from
    pub tick: u64,
    pub rpm: f64,
    pub torque: f64,
    pub pedal: bool,
}

/// Thread-safe trace writer appending JSONL rows.
pub struct TraceWriter {
    writer: Mutex<BufWriter<File>>,
}

impl TraceWriter {
    /// Open the trace file in append mode, creating parent directories.
    pub fn new(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::with_capacity(8192, file)),
        })
    }

    pub fn log(&self, entry: &TraceEntry) -> std::io::Result<()> {
        let mut writer = self.writer.lock().unwrap();
        serde_json::to_writer(&mut *writer, entry)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

/// Sample snapshots until the stop flag is observed. Rows are deduplicated
/// by tick, so an idle simulation produces no repeated output.
pub fn spawn_trace_writer(
    writer: TraceWriter,
    shared: Arc<SharedState>,
    timebase: TimeBase,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut last_tick = 0u64;
        while shared.is_running() {
            let snapshot = shared.snapshot();
            if snapshot.tick > last_tick {
                last_tick = snapshot.tick;
                let entry = TraceEntry {
                    timestamp_us: snapshot.timestamp_us,
                    unix_us: timebase.unix_us(),
                    tick: snapshot.tick,
                    rpm: snapshot.rpm,
                    torque: snapshot.torque,
                    pedal: shared.pedal(),
                };
                if let Err(e) = writer.log(&entry) {
                    warn!(error = %e, "Trace write failed; trace logging stopped");
                    break;
                }
            }
            thread::sleep(SAMPLE_INTERVAL);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rev_core::EngineSnapshot;

    #[test]
    fn writes_parseable_jsonl_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let writer = TraceWriter::new(&path).unwrap();

        for tick in 1..=3u64 {
            writer
                .log(&TraceEntry {
                    timestamp_us: tick * 10_000,
                    unix_us: 1,
                    tick,
                    rpm: tick as f64 * 30.0,
                    torque: 0.0,
                    pedal: true,
                })
                .unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["tick"], 3);
        assert_eq!(rows[2]["rpm"], 90.0);
        assert_eq!(rows[0]["pedal"], true);
    }

    #[test]
    fn sampler_dedupes_by_tick_and_stops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let writer = TraceWriter::new(&path).unwrap();

        let shared = Arc::new(SharedState::new());
        shared.publish(EngineSnapshot {
            timestamp_us: 5,
            tick: 1,
            rpm: 30.0,
            torque: 0.0,
        });

        let handle = spawn_trace_writer(writer, Arc::clone(&shared), TimeBase::new());
        // Several sample intervals pass with no new tick published.
        thread::sleep(Duration::from_millis(350));
        shared.request_stop();
        handle.join().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
