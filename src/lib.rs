pub mod core;
pub mod errors;
pub mod input;
pub mod output;
mod output_writer;
pub mod run_period;

pub use crate::core::evaluator::{evaluate, CalendarWindowEvaluator, TimestepRow};
pub use crate::core::intensity::{IntensityIntegrator, IntensityProgram};
pub use crate::core::replay::IntensityTrace;
pub use crate::errors::{FaultScheduleError, ValidationError};
use crate::core::replay::replay_over_run_period;
use crate::errors::OutputError;
use crate::input::ingest;
use crate::output::Output;
use crate::output_writer::{write_erl_programs, write_fault_schedule, write_intensity_trace};
use bitflags::bitflags;
use std::io::Read;
use tracing::info;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct ProjectFlags: u32 {
        /// replay the intensity programs over the run period and write the trace
        const INTENSITY_TRACE = 0b1;
        /// write each intensity program as an EMS program
        const EMIT_ERL = 0b10;
    }
}

#[derive(Debug)]
pub struct RunResults {
    pub rows: Vec<TimestepRow>,
    pub programs: Vec<IntensityProgram>,
    pub intensity_trace: Option<IntensityTrace>,
}

pub fn run_project(
    input: impl Read,
    output: impl Output,
    flags: &ProjectFlags,
) -> Result<RunResults, FaultScheduleError> {
    let input = ingest(input).map_err(FaultScheduleError::InvalidRequest)?;

    // everything is validated up front so that nothing is written for a bad input
    let rules = input.fault_window_rules()?;
    let programs = input.intensity_programs()?;
    let evaluator = CalendarWindowEvaluator::new(&input.run_period, rules)?;

    let rows = evaluator.evaluate();
    let intensity_trace = if flags.contains(ProjectFlags::INTENSITY_TRACE) {
        Some(replay_over_run_period(evaluator.index(), &programs)?)
    } else {
        None
    };

    if !output.is_noop() {
        write_outputs(&output, &rows, &programs, intensity_trace.as_ref(), flags)
            .map_err(|e| FaultScheduleError::ErrorInOutput(OutputError::new(e)))?;
    }

    info!(
        "Run complete: {} of {} timesteps faulted",
        rows.iter().filter(|row| row.faulted).count(),
        rows.len()
    );

    Ok(RunResults {
        rows,
        programs,
        intensity_trace,
    })
}

fn write_outputs(
    output: &impl Output,
    rows: &[TimestepRow],
    programs: &[IntensityProgram],
    intensity_trace: Option<&IntensityTrace>,
    flags: &ProjectFlags,
) -> anyhow::Result<()> {
    write_fault_schedule(output, rows)?;
    if let Some(trace) = intensity_trace {
        write_intensity_trace(output, trace)?;
    }
    if flags.contains(ProjectFlags::EMIT_ERL) {
        write_erl_programs(output, programs)?;
    }
    Ok(())
}
