use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub show_help: bool,
    pub headless: bool,
    pub run_seconds: Option<u64>,
    pub json_logs: bool,
    pub log_file: Option<PathBuf>,
    pub trace_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            show_help: false,
            headless: false,
            run_seconds: None,
            json_logs: false,
            log_file: None,
            trace_path: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_args(&args)
    }

    pub fn from_args(args: &[String]) -> Self {
        let mut cfg = RuntimeConfig::default();
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--headless" => {
                    cfg.headless = true;
                }
                "--run-seconds" => {
                    if i + 1 < args.len() {
                        cfg.run_seconds = args[i + 1].parse::<u64>().ok();
                        i += 1;
                    }
                }
                "--json-logs" => {
                    cfg.json_logs = true;
                }
                "--log-file" => {
                    if i + 1 < args.len() {
                        cfg.log_file = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--trace-log" => {
                    if i + 1 < args.len() {
                        cfg.trace_path = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    }
                }
                "--help" | "-h" => {
                    cfg.show_help = true;
                    break;
                }
                _ => {}
            }
            i += 1;
        }
        cfg
    }

    pub fn print_help() {
        println!(
            r#"rev-sim - Terminal engine RPM/torque simulator

USAGE:
    rev-sim [OPTIONS]

With no options, runs the interactive terminal simulator:
    W   - hold for gas
    R   - reset RPM
    ESC - quit (exit code 0)

OPTIONS:
    --headless              Run without a terminal UI (for CI / timed runs)
    --run-seconds <SECS>    Stop after a fixed duration
    --json-logs             Output logs in JSON format
    --log-file <PATH>       Write logs to a file instead of stderr
    --trace-log <PATH>      Sample engine snapshots to a JSONL file
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log filter (e.g., RUST_LOG=debug,rev_sim=trace)

EXAMPLES:
    # Interactive run
    rev-sim

    # Two-second headless run with a snapshot trace
    rev-sim --headless --run-seconds 2 --trace-log /tmp/rev.jsonl
"#
        );
    }
}
