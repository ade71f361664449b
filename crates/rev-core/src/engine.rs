use thiserror::Error;

/// Simulated seconds per integration step.
pub const DT: f64 = 0.01;

/// Immutable engine parameters, fixed at construction.
///
/// The defaults describe a stylized F1-style engine: 15k rpm ceiling, torque
/// building linearly from the 4k idle threshold to a 500 Nm peak at 11k rpm,
/// then falling off to 60% of peak at the limiter.
#[derive(Debug, Clone, Copy)]
pub struct EngineConstants {
    pub max_rpm: f64,
    pub deceleration_rate: f64,
    pub acceleration_rate_max: f64,
    pub max_torque: f64,
    pub peak_rpm: f64,
    pub null_rpm: f64,
}

impl Default for EngineConstants {
    fn default() -> Self {
        Self {
            max_rpm: 15000.0,
            deceleration_rate: 500.0,
            acceleration_rate_max: 3000.0,
            max_torque: 500.0,
            peak_rpm: 11000.0,
            null_rpm: 4000.0,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConstantsError {
    #[error("rpm thresholds must satisfy 0 < null_rpm < peak_rpm < max_rpm (null={null_rpm}, peak={peak_rpm}, max={max_rpm})")]
    InvalidThresholds {
        null_rpm: f64,
        peak_rpm: f64,
        max_rpm: f64,
    },
    #[error("{name} must be positive and finite (got {value})")]
    InvalidRate { name: &'static str, value: f64 },
}

impl EngineConstants {
    pub fn validate(&self) -> Result<(), ConstantsError> {
        for (name, value) in [
            ("deceleration_rate", self.deceleration_rate),
            ("acceleration_rate_max", self.acceleration_rate_max),
            ("max_torque", self.max_torque),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConstantsError::InvalidRate { name, value });
            }
        }

        let ordered = self.null_rpm > 0.0
            && self.null_rpm < self.peak_rpm
            && self.peak_rpm < self.max_rpm
            && self.max_rpm.is_finite();
        if !ordered {
            return Err(ConstantsError::InvalidThresholds {
                null_rpm: self.null_rpm,
                peak_rpm: self.peak_rpm,
                max_rpm: self.max_rpm,
            });
        }
        Ok(())
    }
}

/// Engine state: rpm integrated from the pedal input, torque derived from rpm.
///
/// `advance` is the only mutation driven by simulated time; it is total over
/// the whole rpm range and keeps rpm clamped to `[0, max_rpm]`.
#[derive(Debug, Clone)]
pub struct Engine {
    constants: EngineConstants,
    rpm: f64,
    torque: f64,
}

impl Engine {
    pub fn new(constants: EngineConstants) -> Result<Self, ConstantsError> {
        constants.validate()?;
        Ok(Self {
            constants,
            rpm: 0.0,
            torque: 0.0,
        })
    }

    /// Advance one fixed step of [`DT`] simulated seconds.
    pub fn advance(&mut self, pedal_pressed: bool) {
        let c = &self.constants;

        // Acceleration is halved in the lowest and highest thirds of the rev
        // range. The band bounds are strict on both sides: rpm sitting exactly
        // on 0, max/3, 2*max/3 or max gets the full rate.
        let third = c.max_rpm / 3.0;
        let sigma_factor = if (self.rpm > 0.0 && self.rpm < third)
            || (self.rpm > third * 2.0 && self.rpm < c.max_rpm)
        {
            0.5 * c.acceleration_rate_max
        } else {
            c.acceleration_rate_max
        };

        if pedal_pressed {
            self.rpm += DT * sigma_factor;
            if self.rpm > c.max_rpm {
                self.rpm = c.max_rpm;
            }
        } else {
            // Engine braking is constant, independent of the band.
            self.rpm -= DT * c.deceleration_rate;
            if self.rpm < 0.0 {
                self.rpm = 0.0;
            }
        }

        self.torque = torque_at(c, self.rpm);
    }

    /// Drop the revs back to zero. Torque follows rpm, so it goes to zero too.
    pub fn reset(&mut self) {
        self.set_rpm(0.0);
    }

    /// Force rpm to a value, clamped into `[0, max_rpm]`, and recompute torque.
    pub fn set_rpm(&mut self, rpm: f64) {
        self.rpm = rpm.clamp(0.0, self.constants.max_rpm);
        self.torque = torque_at(&self.constants, self.rpm);
    }

    pub fn rpm(&self) -> f64 {
        self.rpm
    }

    pub fn torque(&self) -> f64 {
        self.torque
    }

    pub fn max_rpm(&self) -> f64 {
        self.constants.max_rpm
    }

    pub fn constants(&self) -> &EngineConstants {
        &self.constants
    }
}

/// Three-segment torque curve: dead below idle, linear ramp to the peak,
/// linear falloff to 60% of peak at the limiter. Both ramp and falloff
/// evaluate to exactly `max_torque` at `peak_rpm`.
fn torque_at(c: &EngineConstants, rpm: f64) -> f64 {
    if rpm < c.null_rpm {
        0.0
    } else if rpm <= c.peak_rpm {
        c.max_torque * (rpm / c.peak_rpm)
    } else {
        let drop_factor = 1.0 - 0.4 * (rpm - c.peak_rpm) / (c.max_rpm - c.peak_rpm);
        c.max_torque * drop_factor
    }
}
