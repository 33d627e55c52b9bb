use crate::core::calendar::{parse_month_name, DayOfWeek};
use crate::core::fault_window::FaultWindowRule;
use crate::core::intensity::{IntensityProgram, WindowInstant};
use crate::errors::ValidationError;
use crate::run_period::RunPeriod;
use indexmap::IndexMap;
use itertools::izip;
use serde::Deserialize;
use std::io::{BufReader, Read};
use std::str::FromStr;

pub fn ingest(json: impl Read) -> Result<Input, anyhow::Error> {
    let reader = BufReader::new(json);

    let input: Input = serde_json::from_reader(reader)?;

    Ok(input)
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Input {
    pub run_period: RunPeriod,
    pub fault_windows: Option<FaultWindowsInput>,
    #[serde(default)]
    pub intensity_programs: IntensityProgramsInput,
}

impl Input {
    pub fn fault_window_rules(&self) -> Result<Vec<FaultWindowRule>, ValidationError> {
        match &self.fault_windows {
            Some(fault_windows) => fault_windows.to_rules(),
            None => Ok(vec![]),
        }
    }

    pub fn intensity_programs(&self) -> Result<Vec<IntensityProgram>, ValidationError> {
        self.intensity_programs
            .iter()
            .map(|(name, program)| {
                IntensityProgram::new(
                    name.as_str(),
                    program.start,
                    program.end,
                    program.time_constant,
                )
            })
            .collect()
    }
}

/// Fault windows in the parallel-array form used by the fault measures: entry `i` of every array
/// describes window `i`.
#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct FaultWindowsInput {
    pub names: Option<Vec<String>>,
    pub months: Vec<Vec<MonthInput>>,
    pub days: Vec<Vec<u32>>,
    pub weekdays: Vec<Vec<String>>,
    pub start_hours: Vec<u32>,
    pub end_hours: Vec<u32>,
}

#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum MonthInput {
    Number(u32),
    Name(String),
}

fn check_length(field: &'static str, expected: usize, found: usize) -> Result<(), ValidationError> {
    if expected != found {
        return Err(ValidationError::MismatchedRuleArrays {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

impl FaultWindowsInput {
    pub fn to_rules(&self) -> Result<Vec<FaultWindowRule>, ValidationError> {
        let expected = self.months.len();
        check_length("days", expected, self.days.len())?;
        check_length("weekdays", expected, self.weekdays.len())?;
        check_length("start_hours", expected, self.start_hours.len())?;
        check_length("end_hours", expected, self.end_hours.len())?;

        let names = match &self.names {
            Some(names) => {
                check_length("names", expected, names.len())?;
                names.clone()
            }
            None => (1..=expected)
                .map(|i| format!("fault_window_{i}"))
                .collect(),
        };

        izip!(
            names,
            &self.months,
            &self.days,
            &self.weekdays,
            &self.start_hours,
            &self.end_hours
        )
        .map(|(name, months, days, weekdays, &min_hour, &max_hour)| {
            let months = months
                .iter()
                .map(|month| match month {
                    MonthInput::Number(number) => Ok(*number),
                    MonthInput::Name(month_name) => {
                        parse_month_name(month_name).ok_or_else(|| ValidationError::UnknownMonth {
                            rule: name.clone(),
                            name: month_name.clone(),
                        })
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            let weekdays = weekdays
                .iter()
                .map(|weekday| {
                    DayOfWeek::from_str(weekday).map_err(|_| ValidationError::UnknownDayOfWeek {
                        rule: name.clone(),
                        name: weekday.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            FaultWindowRule::new(
                name,
                months,
                days.iter().copied(),
                weekdays,
                min_hour,
                max_hour,
            )
        })
        .collect()
    }
}

pub type IntensityProgramsInput = IndexMap<String, IntensityProgramInput>;

#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct IntensityProgramInput {
    pub start: WindowInstant,
    pub end: WindowInstant,
    /// ramp time constant, in hours
    pub time_constant: f64,
}
