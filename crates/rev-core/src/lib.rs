pub mod engine;
pub mod sim_loop;
pub mod sync;
pub mod timebase;

pub use engine::{ConstantsError, Engine, EngineConstants, DT};
pub use sim_loop::{SimConfig, SimLoop, SimStats};
pub use sync::{EngineSnapshot, SharedState};
pub use timebase::TimeBase;
