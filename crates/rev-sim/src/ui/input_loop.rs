use crate::ui::console::Console;
use crate::ui::input::{apply_frame, read_frame};
use rev_core::{EngineConstants, EngineSnapshot, SharedState};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct UiConfig {
    /// Wall-clock period per render frame.
    pub frame_time: Duration,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            // ~30 Hz display refresh.
            frame_time: Duration::from_millis(33),
        }
    }
}

/// The terminal side of the simulator: polls keys, writes pedal intent into
/// [`SharedState`], and renders the latest engine snapshot at its own cadence,
/// independent of the simulation tick.
pub struct InputRenderLoop<C: Console> {
    console: C,
    shared: Arc<SharedState>,
    constants: EngineConstants,
    config: UiConfig,
}

impl<C: Console> InputRenderLoop<C> {
    pub fn new(
        console: C,
        shared: Arc<SharedState>,
        constants: EngineConstants,
        config: UiConfig,
    ) -> Self {
        Self {
            console,
            shared,
            constants,
            config,
        }
    }

    /// Run until the stop flag is observed. Terminal teardown always runs,
    /// also when the loop body fails.
    pub fn run(&mut self) -> io::Result<()> {
        self.console.init()?;
        let result = self.pump();
        let teardown = self.console.shutdown();
        result.and(teardown)
    }

    fn pump(&mut self) -> io::Result<()> {
        while self.shared.is_running() {
            let frame = read_frame(&mut self.console)?;
            apply_frame(&frame, &self.shared);
            if !self.shared.is_running() {
                break;
            }

            let snapshot = self.shared.snapshot();
            self.render(&snapshot)?;

            thread::sleep(self.config.frame_time);
        }
        Ok(())
    }

    fn render(&mut self, snapshot: &EngineSnapshot) -> io::Result<()> {
        let pedal = self.shared.pedal();
        let progress = (snapshot.rpm / self.constants.max_rpm) * 100.0;

        self.console.clear()?;
        self.console.draw_text(0, 0, "Engine RPM Simulator")?;
        self.console.draw_text(1, 0, "====================")?;
        self.console
            .draw_text(2, 0, &format!("Current RPM: {:.0}", snapshot.rpm))?;
        self.console
            .draw_text(3, 0, &format!("Current Torque: {:.1} Nm", snapshot.torque))?;
        self.console.draw_text(
            4,
            0,
            if pedal {
                "Gas pedal: PRESSED (W)"
            } else {
                "Gas pedal: RELEASED"
            },
        )?;
        self.console
            .draw_text(5, 0, &format!("Progress: {progress:.1}%"))?;
        self.console.draw_text(8, 0, "Controls:")?;
        self.console.draw_text(9, 0, "W - Hold for gas")?;
        self.console.draw_text(10, 0, "R - Reset RPM")?;
        self.console.draw_text(11, 0, "ESC - Exit")?;
        self.console.present()
    }
}
