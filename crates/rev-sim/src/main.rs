mod infra;
mod runtime;
mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    runtime::run_from_args()
}
