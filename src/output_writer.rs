use crate::core::evaluator::TimestepRow;
use crate::core::intensity::IntensityProgram;
use crate::core::replay::IntensityTrace;
use crate::output::Output;
use csv::WriterBuilder;
use std::borrow::Cow;
use std::io::Write;
use tracing::info;

pub(crate) const FAULT_SCHEDULE_KEY: &str = "fault_schedule";
pub(crate) const INTENSITY_TRACE_KEY: &str = "intensity_trace";

/// Writes the activation table, one CSV record per timestep.
pub(crate) fn write_fault_schedule(
    output: &impl Output,
    rows: &[TimestepRow],
) -> anyhow::Result<()> {
    info!("writing out to {FAULT_SCHEDULE_KEY}");
    let writer = output.writer_for_location_key(FAULT_SCHEDULE_KEY, "csv")?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(())
}

pub(crate) fn write_intensity_trace(
    output: &impl Output,
    trace: &IntensityTrace,
) -> anyhow::Result<()> {
    info!("writing out to {INTENSITY_TRACE_KEY}");
    let writer = output.writer_for_location_key(INTENSITY_TRACE_KEY, "csv")?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut headings: Vec<Cow<str>> = vec![
        "Timestep".into(),
        "Month".into(),
        "Day".into(),
        "Time".into(),
    ];
    headings.extend(trace.program_names.iter().map(|name| name.as_str().into()));
    writer.write_record(headings.iter().map(|heading| heading.as_ref()))?;

    for row in &trace.rows {
        let mut record = vec![
            row.index.to_string(),
            row.month.to_string(),
            row.day.to_string(),
            row.time.clone(),
        ];
        record.extend(row.intensities.iter().map(|value| value.to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes one EMS program file per intensity program, keyed by its Erl identifier.
pub(crate) fn write_erl_programs(
    output: &impl Output,
    programs: &[IntensityProgram],
) -> anyhow::Result<()> {
    for program in programs {
        let erl = program.to_erl();
        info!("writing out to {}", erl.identifier());
        let mut writer = output.writer_for_location_key(erl.identifier(), "idf")?;
        write!(writer, "{erl}")?;
        writer.flush()?;
    }
    Ok(())
}
