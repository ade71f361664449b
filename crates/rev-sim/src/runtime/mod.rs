mod app;
mod config;
mod logging;

pub use app::run_from_args;
pub use config::RuntimeConfig;
