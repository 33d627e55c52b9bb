use crate::core::intensity::{IntensityIntegrator, IntensityProgram};
use crate::errors::ValidationError;
use crate::run_period::RunPeriodIndex;
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct IntensityTraceRow {
    pub index: usize,
    pub month: u32,
    pub day: u32,
    pub time: String,
    /// one value per program, in program order
    pub intensities: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntensityTrace {
    pub program_names: Vec<String>,
    pub rows: Vec<IntensityTraceRow>,
}

/// Runs every program over the run period as if the run period's own timesteps were the host's,
/// giving each program its own integrator.
pub fn replay_over_run_period(
    index: &RunPeriodIndex,
    programs: &[IntensityProgram],
) -> Result<IntensityTrace, ValidationError> {
    info!(
        "Replaying {} intensity program(s) over {} timesteps",
        programs.len(),
        index.total_steps()
    );

    let mut integrators: Vec<IntensityIntegrator> = programs
        .iter()
        .cloned()
        .map(IntensityIntegrator::new)
        .collect();

    let rows = index
        .iter()
        .map(|step| {
            let intensities = integrators
                .iter_mut()
                .map(|integrator| integrator.update(&step))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(IntensityTraceRow {
                index: step.index,
                month: step.month(),
                day: step.day(),
                time: step.formatted_time(),
                intensities,
            })
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    Ok(IntensityTrace {
        program_names: programs.iter().map(|p| p.name().to_string()).collect(),
        rows,
    })
}
