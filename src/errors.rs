use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaultScheduleError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(anyhow::Error),
    #[error("Invalid fault schedule configuration: {0}")]
    InvalidConfiguration(#[from] ValidationError),
    #[error("Error while writing outputs: {0}")]
    ErrorInOutput(#[from] OutputError),
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct OutputError {
    error: anyhow::Error,
}

impl OutputError {
    pub(crate) fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}

/// A caller contract violation, detected before any row, trace value or program is produced.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Timesteps per hour must be positive, got {0}")]
    NonPositiveTimestepsPerHour(u32),
    #[error("Timesteps per hour ({0}) must divide an hour into a whole number of seconds")]
    TimestepNotWholeSeconds(u32),
    #[error("Month {month}, day {day} is not a valid date in the reference year")]
    InvalidDate { month: u32, day: u32 },
    #[error("Run period ends ({end_month}/{end_day}) before it begins ({begin_month}/{begin_day})")]
    EndBeforeBegin {
        begin_month: u32,
        begin_day: u32,
        end_month: u32,
        end_day: u32,
    },
    #[error("Reference year {0} is a leap year")]
    LeapReferenceYear(i32),
    #[error("Fault window array '{field}' has {found} entries but {expected} were expected")]
    MismatchedRuleArrays {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Fault window '{rule}' has month {month} outside 1-12")]
    MonthOutOfRange { rule: String, month: u32 },
    #[error("Fault window '{rule}' has unknown month '{name}'")]
    UnknownMonth { rule: String, name: String },
    #[error("Fault window '{rule}' has day of month {day} outside 1-31")]
    DayOfMonthOutOfRange { rule: String, day: u32 },
    #[error("Fault window '{rule}' has unknown day of week '{name}'")]
    UnknownDayOfWeek { rule: String, name: String },
    #[error("Fault window '{rule}' has hour {hour} outside 0-24")]
    HourOutOfRange { rule: String, hour: u32 },
    #[error("Fault window '{rule}' has start hour {min_hour} after end hour {max_hour}")]
    InvertedHourRange {
        rule: String,
        min_hour: u32,
        max_hour: u32,
    },
    #[error("Unknown start day of week '{0}'")]
    UnknownStartDayOfWeek(String),
    #[error("Intensity program '{program}' has invalid time constant {value}")]
    InvalidTimeConstant { program: String, value: f64 },
    #[error("Intensity program '{program}' has invalid window bound {month}/{day} {hour}h")]
    InvalidWindowInstant {
        program: String,
        month: u32,
        day: u32,
        hour: u32,
    },
    #[error("Intensity program '{program}' has a window that ends before it starts")]
    WindowEndBeforeStart { program: String },
    #[error("Host timestep must be positive and finite, got {0}")]
    NonPositiveHostTimestep(f64),
}
