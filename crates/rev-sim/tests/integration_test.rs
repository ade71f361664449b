use std::process::Command;

#[test]
fn headless_timed_run_exits_cleanly_with_trace() {
    let dir = tempfile::tempdir().unwrap();
    let trace_path = dir.path().join("trace.jsonl");

    let status = Command::new(env!("CARGO_BIN_EXE_rev-sim"))
        .args([
            "--headless",
            "--run-seconds",
            "1",
            "--trace-log",
            trace_path.to_str().unwrap(),
        ])
        .status()
        .expect("Failed to start rev-sim");
    assert!(status.success(), "rev-sim exited with {status}");

    let contents = std::fs::read_to_string(&trace_path).expect("trace file missing");
    let rows: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("trace row is not valid JSON"))
        .collect();
    assert!(!rows.is_empty(), "expected at least one trace row");

    let mut last_tick = 0u64;
    for row in &rows {
        // Nobody presses the pedal in a headless run, so the engine idles.
        assert_eq!(row["rpm"].as_f64().unwrap(), 0.0);
        assert_eq!(row["torque"].as_f64().unwrap(), 0.0);
        assert_eq!(row["pedal"].as_bool().unwrap(), false);
        let tick = row["tick"].as_u64().unwrap();
        assert!(tick > last_tick, "ticks must be strictly increasing");
        last_tick = tick;
    }
}

#[test]
fn help_prints_usage_and_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_rev-sim"))
        .arg("--help")
        .output()
        .expect("Failed to start rev-sim");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("USAGE"));
    assert!(stdout.contains("--headless"));
}
