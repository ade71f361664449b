use crate::infra::trace::{spawn_trace_writer, TraceWriter};
use crate::runtime::config::RuntimeConfig;
use crate::runtime::logging::init_tracing;
use crate::ui::console::CrosstermConsole;
use crate::ui::input_loop::{InputRenderLoop, UiConfig};
use rev_core::{ConstantsError, Engine, EngineConstants, SharedState, SimConfig, SimLoop, TimeBase};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("engine constants rejected: {0}")]
    Constants(#[from] ConstantsError),
    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),
    #[error("trace log error: {0}")]
    TraceLog(#[source] std::io::Error),
}

pub fn run_from_args() -> ExitCode {
    let config = RuntimeConfig::from_env();
    if config.show_help {
        RuntimeConfig::print_help();
        return ExitCode::SUCCESS;
    }
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("rev-sim: {e}");
            ExitCode::FAILURE
        }
    }
}

pub fn run(config: RuntimeConfig) -> Result<(), RuntimeError> {
    let _log_guard = init_tracing(config.json_logs, config.log_file.as_deref());

    let constants = EngineConstants::default();
    let engine = Engine::new(constants)?;
    let shared = Arc::new(SharedState::new());
    let timebase = TimeBase::new();
    let sim_config = SimConfig::default();

    info!(
        tick_ms = sim_config.tick.as_millis(),
        max_rpm = constants.max_rpm,
        peak_rpm = constants.peak_rpm,
        "Starting simulation loop"
    );

    let sim_handle = {
        let shared = Arc::clone(&shared);
        let sim_config = sim_config.clone();
        thread::spawn(move || {
            let mut sim = SimLoop::new(engine, sim_config, shared, timebase);
            sim.run();
            sim.stats().clone()
        })
    };

    let trace_handle = match config.trace_path.as_deref() {
        Some(path) => {
            let writer = TraceWriter::new(path).map_err(RuntimeError::TraceLog)?;
            info!(path = %path.display(), "Trace logging enabled");
            Some(spawn_trace_writer(writer, Arc::clone(&shared), timebase))
        }
        None => None,
    };

    // A timed run stops itself; otherwise the UI loop (or an external kill)
    // ends the process.
    let timer_handle = config.run_seconds.map(|seconds| {
        let shared = Arc::clone(&shared);
        info!(seconds, "Running for limited duration");
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(seconds));
            shared.request_stop();
        })
    });

    let ui_result = if config.headless {
        if config.run_seconds.is_none() {
            info!("Headless run without --run-seconds; stop with an external signal");
        }
        Ok(())
    } else {
        let console = CrosstermConsole::new();
        let mut ui = InputRenderLoop::new(console, Arc::clone(&shared), constants, UiConfig::default());
        let result = ui.run().map_err(RuntimeError::Terminal);
        // Whatever ended the UI, quit or error, every other loop must observe
        // the stop flag before teardown.
        shared.request_stop();
        result
    };

    let stats = sim_handle.join().unwrap();
    if let Some(handle) = trace_handle {
        let _ = handle.join();
    }
    // The timer thread just sleeps and sets the stop flag; joining it would
    // stall an early ESC quit until the full duration elapsed.
    drop(timer_handle);

    info!(
        ticks_executed = stats.ticks_executed,
        max_step_us = stats.max_step_us,
        final_rpm = shared.snapshot().rpm,
        "Simulation stopped"
    );

    ui_result
}
