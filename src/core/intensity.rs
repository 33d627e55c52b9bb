// This module provides the fault intensity signal: a value in [0, 1] that ramps up linearly while
// the host clock is inside a fault window and drops straight back to zero outside it.

use crate::core::units::{DAYS_IN_MONTH, HOURS_PER_DAY, MONTHS_PER_YEAR};
use crate::errors::ValidationError;
use crate::run_period::RunPeriodStep;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Substituted for a zero time constant so the ramp stays numerically defined.
pub const MINIMUM_TIME_CONSTANT: f64 = 0.001;

/// A (month, day, hour) point on the host's calendar. Ordering is lexicographic in that order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct WindowInstant {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl WindowInstant {
    pub fn new(month: u32, day: u32, hour: u32) -> Self {
        Self { month, day, hour }
    }

    fn is_valid(&self) -> bool {
        (1..=MONTHS_PER_YEAR).contains(&self.month)
            && self.day >= 1
            && self.day <= DAYS_IN_MONTH[(self.month - 1) as usize]
            && self.hour <= HOURS_PER_DAY
    }
}

/// The clock readings the host solver exposes at each of its timesteps.
pub trait HostTimestep {
    fn month(&self) -> u32;
    fn day_of_month(&self) -> u32;
    fn hour(&self) -> u32;
    /// Length of the host's current timestep, in hours. May change between calls.
    fn system_timestep(&self) -> f64;

    fn instant(&self) -> WindowInstant {
        WindowInstant::new(self.month(), self.day_of_month(), self.hour())
    }
}

/// A host clock reading supplied directly by the caller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostTick {
    pub instant: WindowInstant,
    pub timestep: f64,
}

impl HostTick {
    pub fn new(month: u32, day: u32, hour: u32, timestep: f64) -> Self {
        Self {
            instant: WindowInstant::new(month, day, hour),
            timestep,
        }
    }
}

impl HostTimestep for HostTick {
    fn month(&self) -> u32 {
        self.instant.month
    }

    fn day_of_month(&self) -> u32 {
        self.instant.day
    }

    fn hour(&self) -> u32 {
        self.instant.hour
    }

    fn system_timestep(&self) -> f64 {
        self.timestep
    }
}

impl HostTimestep for RunPeriodStep {
    fn month(&self) -> u32 {
        RunPeriodStep::month(self)
    }

    fn day_of_month(&self) -> u32 {
        self.day()
    }

    fn hour(&self) -> u32 {
        self.hour_of_day()
    }

    fn system_timestep(&self) -> f64 {
        self.timestep
    }
}

/// Window bounds and time constant for one fault instance's intensity ramp. This is what gets
/// handed to the host integration layer; the update rule itself lives in
/// [`IntensityProgram::next_intensity`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IntensityProgram {
    name: String,
    start: WindowInstant,
    end: WindowInstant,
    /// in hours
    time_constant: f64,
}

impl IntensityProgram {
    pub fn new(
        name: impl Into<String>,
        start: WindowInstant,
        end: WindowInstant,
        time_constant: f64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();

        if let Some(bound) = [start, end].into_iter().find(|bound| !bound.is_valid()) {
            return Err(ValidationError::InvalidWindowInstant {
                program: name,
                month: bound.month,
                day: bound.day,
                hour: bound.hour,
            });
        }
        if end < start {
            return Err(ValidationError::WindowEndBeforeStart { program: name });
        }
        if !time_constant.is_finite() || time_constant < 0. {
            return Err(ValidationError::InvalidTimeConstant {
                program: name,
                value: time_constant,
            });
        }

        Ok(Self {
            name,
            start,
            end,
            time_constant,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> WindowInstant {
        self.start
    }

    pub fn end(&self) -> WindowInstant {
        self.end
    }

    pub fn time_constant(&self) -> f64 {
        self.time_constant
    }

    /// The time constant actually used by the ramp.
    pub fn effective_time_constant(&self) -> f64 {
        if self.time_constant == 0. {
            MINIMUM_TIME_CONSTANT
        } else {
            self.time_constant
        }
    }

    /// Inclusive of both window bounds.
    pub fn in_window(&self, now: WindowInstant) -> bool {
        self.start <= now && now <= self.end
    }

    /// One host timestep of the ramp: linear accumulation of `timestep / tau` clamped at 1 inside
    /// the window, immediate reset to 0 outside it.
    pub fn next_intensity(&self, previous: f64, in_window: bool, timestep: f64) -> f64 {
        if in_window {
            (previous + timestep / self.effective_time_constant()).min(1.0)
        } else {
            0.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IntensityPhase {
    Idle,
    Ramping,
    Saturated,
}

/// The retained intensity of one fault instance, always within [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntensityState(f64);

impl IntensityState {
    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn phase(&self) -> IntensityPhase {
        if self.0 <= 0.0 {
            IntensityPhase::Idle
        } else if self.0 >= 1.0 {
            IntensityPhase::Saturated
        } else {
            IntensityPhase::Ramping
        }
    }
}

/// Evaluates an [`IntensityProgram`] once per host timestep, keeping only the previous value.
#[derive(Clone, Debug)]
pub struct IntensityIntegrator {
    program: IntensityProgram,
    state: IntensityState,
}

impl IntensityIntegrator {
    pub fn new(program: IntensityProgram) -> Self {
        if program.time_constant() == 0. {
            debug!(
                "Intensity program '{}' has zero time constant, using {MINIMUM_TIME_CONSTANT}",
                program.name()
            );
        }
        Self {
            program,
            state: Default::default(),
        }
    }

    pub fn program(&self) -> &IntensityProgram {
        &self.program
    }

    pub fn state(&self) -> IntensityState {
        self.state
    }

    pub fn update(&mut self, tick: &impl HostTimestep) -> Result<f64, ValidationError> {
        self.step(
            self.program.in_window(tick.instant()),
            tick.system_timestep(),
        )
    }

    /// Advances the ramp with an already-evaluated window test.
    pub fn step(&mut self, in_window: bool, timestep: f64) -> Result<f64, ValidationError> {
        if !timestep.is_finite() || timestep <= 0. {
            return Err(ValidationError::NonPositiveHostTimestep(timestep));
        }
        let current = self
            .program
            .next_intensity(self.state.value(), in_window, timestep);
        self.state = IntensityState(current);
        Ok(current)
    }
}
