use crate::core::calendar::DayOfWeek;
use crate::core::units::{HOURS_PER_DAY, MAX_DAYS_IN_MONTH, MONTHS_PER_YEAR};
use crate::errors::ValidationError;
use crate::run_period::RunPeriodStep;
use std::collections::BTreeSet;

/// A single named calendar window during which a fault is considered active.
///
/// A timestep matches when its month, day of month and weekday are all in the rule's sets and its
/// stamp hour lies in the inclusive range `[min_hour, max_hour]`, trimmed at both ends:
/// * the stamp exactly on `min_hour` (minute 0) closes the interval before the fault starts, so it
///   does not match
/// * within `max_hour` only the top-of-hour stamp matches
#[derive(Clone, Debug, PartialEq)]
pub struct FaultWindowRule {
    name: String,
    months: BTreeSet<u32>,
    days: BTreeSet<u32>,
    weekdays: BTreeSet<DayOfWeek>,
    min_hour: u32,
    max_hour: u32,
}

impl FaultWindowRule {
    pub fn new(
        name: impl Into<String>,
        months: impl IntoIterator<Item = u32>,
        days: impl IntoIterator<Item = u32>,
        weekdays: impl IntoIterator<Item = DayOfWeek>,
        min_hour: u32,
        max_hour: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let months: BTreeSet<u32> = months.into_iter().collect();
        let days: BTreeSet<u32> = days.into_iter().collect();

        if let Some(&month) = months
            .iter()
            .find(|&&month| month == 0 || month > MONTHS_PER_YEAR)
        {
            return Err(ValidationError::MonthOutOfRange { rule: name, month });
        }
        if let Some(&day) = days
            .iter()
            .find(|&&day| day == 0 || day > MAX_DAYS_IN_MONTH)
        {
            return Err(ValidationError::DayOfMonthOutOfRange { rule: name, day });
        }
        if let Some(hour) = [min_hour, max_hour]
            .into_iter()
            .find(|&hour| hour > HOURS_PER_DAY)
        {
            return Err(ValidationError::HourOutOfRange { rule: name, hour });
        }
        if min_hour > max_hour {
            return Err(ValidationError::InvertedHourRange {
                rule: name,
                min_hour,
                max_hour,
            });
        }

        Ok(Self {
            name,
            months,
            days,
            weekdays: weekdays.into_iter().collect(),
            min_hour,
            max_hour,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hour_range(&self) -> (u32, u32) {
        (self.min_hour, self.max_hour)
    }

    /// False when no timestep can ever satisfy this rule.
    pub fn can_match(&self) -> bool {
        !(self.months.is_empty()
            || self.days.is_empty()
            || self.weekdays.is_empty()
            || self.min_hour == self.max_hour)
    }

    pub fn matches(
        &self,
        month: u32,
        day: u32,
        day_of_week: DayOfWeek,
        hour: u32,
        minute: u32,
    ) -> bool {
        if !(self.months.contains(&month)
            && self.days.contains(&day)
            && self.weekdays.contains(&day_of_week))
        {
            return false;
        }
        if hour < self.min_hour || hour > self.max_hour {
            return false;
        }
        if hour == self.min_hour && minute == 0 {
            return false;
        }
        if hour == self.max_hour && minute != 0 {
            return false;
        }
        true
    }

    pub(crate) fn matches_step(&self, step: &RunPeriodStep) -> bool {
        self.matches(
            step.month(),
            step.day(),
            step.day_of_week,
            step.stamp_hour(),
            step.stamp_minute(),
        )
    }
}
