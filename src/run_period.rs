use crate::core::calendar::DayOfWeek;
use crate::core::units::{
    is_leap_year, DAYS_PER_WEEK, EPOCH_ALIGNMENT_HOURS, HOURS_PER_DAY, REFERENCE_YEAR,
    SECONDS_PER_HOUR,
};
use crate::errors::ValidationError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::Deserialize;

fn default_reference_year() -> i32 {
    REFERENCE_YEAR
}

/// The simulated calendar span and its sampling resolution.
#[derive(Clone, Debug, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct RunPeriod {
    pub begin_month: u32,
    pub begin_day: u32,
    pub end_month: u32,
    pub end_day: u32,
    pub start_day_of_week: DayOfWeek,
    pub timesteps_per_hour: u32,
    #[serde(default = "default_reference_year")]
    pub reference_year: i32,
}

impl RunPeriod {
    pub fn new(
        begin: (u32, u32),
        end: (u32, u32),
        start_day_of_week: DayOfWeek,
        timesteps_per_hour: u32,
    ) -> Self {
        Self {
            begin_month: begin.0,
            begin_day: begin.1,
            end_month: end.0,
            end_day: end.1,
            start_day_of_week,
            timesteps_per_hour,
            reference_year: REFERENCE_YEAR,
        }
    }

    fn date(&self, month: u32, day: u32) -> Result<NaiveDate, ValidationError> {
        NaiveDate::from_ymd_opt(self.reference_year, month, day)
            .ok_or(ValidationError::InvalidDate { month, day })
    }
}

/// Calendar index over a run period: knows the weekday of every simulated day and walks the
/// period one timestep at a time.
#[derive(Clone, Debug)]
pub struct RunPeriodIndex {
    begin: NaiveDateTime,
    step: TimeDelta,
    timestep: f64,
    days: usize,
    steps_per_day: usize,
    rotated_week: [DayOfWeek; DAYS_PER_WEEK],
}

impl RunPeriodIndex {
    pub fn new(run_period: &RunPeriod) -> Result<Self, ValidationError> {
        let timesteps_per_hour = run_period.timesteps_per_hour;
        if timesteps_per_hour == 0 {
            return Err(ValidationError::NonPositiveTimestepsPerHour(
                timesteps_per_hour,
            ));
        }
        if SECONDS_PER_HOUR % timesteps_per_hour != 0 {
            return Err(ValidationError::TimestepNotWholeSeconds(timesteps_per_hour));
        }
        if is_leap_year(run_period.reference_year) {
            return Err(ValidationError::LeapReferenceYear(
                run_period.reference_year,
            ));
        }

        let begin = run_period.date(run_period.begin_month, run_period.begin_day)?;
        let end = run_period.date(run_period.end_month, run_period.end_day)?;
        if end < begin {
            return Err(ValidationError::EndBeforeBegin {
                begin_month: run_period.begin_month,
                begin_day: run_period.begin_day,
                end_month: run_period.end_month,
                end_day: run_period.end_day,
            });
        }

        Ok(Self {
            begin: begin.and_time(NaiveTime::MIN),
            step: TimeDelta::seconds((SECONDS_PER_HOUR / timesteps_per_hour) as i64),
            timestep: 1. / timesteps_per_hour as f64,
            days: ((end - begin).num_days() + 1) as usize,
            steps_per_day: (HOURS_PER_DAY * timesteps_per_hour) as usize,
            rotated_week: run_period.start_day_of_week.rotated_week(),
        })
    }

    /// Weekday of the day `day_offset` days after the first simulated day.
    pub fn day_of_week(&self, day_offset: usize) -> DayOfWeek {
        self.rotated_week[day_offset % DAYS_PER_WEEK]
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn steps_per_day(&self) -> usize {
        self.steps_per_day
    }

    pub fn total_steps(&self) -> usize {
        self.days * self.steps_per_day
    }

    /// Timestep length in hours.
    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    pub fn iter(&self) -> RunPeriodIterator {
        RunPeriodIterator {
            index: self.clone(),
            current_index: 0,
            day_counter: 0,
            steps_into_day: 0,
            current_time: self.begin,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RunPeriodIterator {
    index: RunPeriodIndex,
    current_index: usize,
    /// weekday position within the rotated week, wraps at 7
    day_counter: usize,
    steps_into_day: usize,
    current_time: NaiveDateTime,
}

impl Iterator for RunPeriodIterator {
    type Item = RunPeriodStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.index.total_steps() {
            return None;
        }

        let interval_start = self.current_time;
        self.current_time += self.index.step;

        let step = RunPeriodStep {
            index: self.current_index,
            day_index: self.current_index / self.index.steps_per_day,
            day_of_week: self.index.rotated_week[self.day_counter],
            interval_start,
            interval_end: self.current_time,
            timestep: self.index.timestep,
        };

        self.current_index += 1;
        self.steps_into_day += 1;
        if self.steps_into_day == self.index.steps_per_day {
            self.steps_into_day = 0;
            self.day_counter = (self.day_counter + 1) % DAYS_PER_WEEK;
        }

        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.index.total_steps() - self.current_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RunPeriodIterator {}

/// One timestep of a run period. The step stands for the interval just completed: it is stamped
/// with the interval's closing instant, while its calendar day is that of the opening instant, so
/// the closing midnight of a day reads as 24:00:00 of that day.
#[derive(Clone, Debug, PartialEq)]
pub struct RunPeriodStep {
    pub index: usize,
    /// whole days elapsed since the start of the run period
    pub day_index: usize,
    pub day_of_week: DayOfWeek,
    interval_start: NaiveDateTime,
    interval_end: NaiveDateTime,
    /// in hours
    pub timestep: f64,
}

impl RunPeriodStep {
    fn closes_day(&self) -> bool {
        self.interval_end.num_seconds_from_midnight() == 0
    }

    pub fn month(&self) -> u32 {
        self.interval_start.month()
    }

    pub fn day(&self) -> u32 {
        self.interval_start.day()
    }

    /// Hour of the stamp, 24 for the row closing a day.
    pub fn stamp_hour(&self) -> u32 {
        if self.closes_day() {
            HOURS_PER_DAY
        } else {
            self.interval_end.hour()
        }
    }

    pub fn stamp_minute(&self) -> u32 {
        self.interval_end.minute()
    }

    pub fn formatted_time(&self) -> String {
        if self.closes_day() {
            format!("{HOURS_PER_DAY}:00:00")
        } else {
            self.interval_end.format("%H:%M:%S").to_string()
        }
    }

    /// Hour of day (0-23) in which the interval starts.
    pub fn hour_of_day(&self) -> u32 {
        self.interval_start.hour()
    }

    /// Unix seconds of the stamp after the fixed UTC alignment shift.
    pub fn epoch_time(&self) -> i64 {
        (self.interval_end + TimeDelta::hours(EPOCH_ALIGNMENT_HOURS))
            .and_utc()
            .timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    pub fn run_period() -> RunPeriod {
        RunPeriod::new((1, 30), (2, 1), DayOfWeek::Wednesday, 2)
    }

    #[rstest]
    fn should_count_days_and_steps(run_period: RunPeriod) {
        let index = RunPeriodIndex::new(&run_period).unwrap();
        assert_eq!(index.days(), 3);
        assert_eq!(index.steps_per_day(), 48);
        assert_eq!(index.total_steps(), 144);
        assert_eq!(index.iter().count(), 144);
        assert_eq!(index.timestep(), 0.5);
    }

    #[rstest]
    fn should_label_first_step_with_start_weekday(run_period: RunPeriod) {
        let first = RunPeriodIndex::new(&run_period)
            .unwrap()
            .iter()
            .next()
            .unwrap();
        assert_eq!(first.day_of_week, DayOfWeek::Wednesday);
        assert_eq!(first.formatted_time(), "00:30:00");
        assert_eq!((first.month(), first.day()), (1, 30));
    }

    #[rstest]
    fn should_attribute_midnight_to_previous_day(run_period: RunPeriod) {
        let steps = RunPeriodIndex::new(&run_period).unwrap().iter().collect_vec();

        let closing = &steps[47];
        assert_eq!(closing.formatted_time(), "24:00:00");
        assert_eq!((closing.month(), closing.day()), (1, 30));
        assert_eq!(closing.day_of_week, DayOfWeek::Wednesday);
        assert_eq!((closing.stamp_hour(), closing.stamp_minute()), (24, 0));

        let opening = &steps[48];
        assert_eq!(opening.formatted_time(), "00:30:00");
        assert_eq!((opening.month(), opening.day()), (1, 31));
        assert_eq!(opening.day_of_week, DayOfWeek::Thursday);

        // month rollover
        let last = steps.last().unwrap();
        assert_eq!((last.month(), last.day()), (2, 1));
        assert_eq!(last.formatted_time(), "24:00:00");
        assert_eq!(last.day_of_week, DayOfWeek::Friday);
    }

    #[rstest]
    fn should_have_fixed_number_of_rows_per_calendar_day(run_period: RunPeriod) {
        let index = RunPeriodIndex::new(&run_period).unwrap();
        let rows_per_day = index
            .iter()
            .chunk_by(|step| (step.month(), step.day()))
            .into_iter()
            .map(|(_, steps)| steps.count())
            .collect_vec();
        assert_eq!(rows_per_day, vec![48, 48, 48]);
    }

    #[test]
    fn should_repeat_weekday_after_seven_days() {
        let run_period = RunPeriod::new((3, 1), (3, 20), DayOfWeek::Wednesday, 1);
        let index = RunPeriodIndex::new(&run_period).unwrap();
        let daily_labels = index
            .iter()
            .step_by(index.steps_per_day())
            .map(|step| step.day_of_week)
            .collect_vec();

        assert_eq!(daily_labels[0], DayOfWeek::Wednesday);
        assert_eq!(daily_labels[7], daily_labels[0]);
        assert_eq!(daily_labels[14], daily_labels[0]);
        assert_eq!(daily_labels[3], DayOfWeek::Saturday);
        for (day_offset, label) in daily_labels.iter().enumerate() {
            assert_eq!(*label, index.day_of_week(day_offset));
        }
    }

    #[test]
    fn should_apply_epoch_alignment_offset() {
        let run_period = RunPeriod::new((1, 1), (1, 1), DayOfWeek::Thursday, 1);
        let first = RunPeriodIndex::new(&run_period)
            .unwrap()
            .iter()
            .next()
            .unwrap();
        // 2009-01-01 01:00 shifted by 7 hours = 2009-01-01 08:00 UTC
        assert_eq!(first.epoch_time(), 1_230_796_800);
    }

    #[rstest]
    #[case(0, ValidationError::NonPositiveTimestepsPerHour(0))]
    #[case(7, ValidationError::TimestepNotWholeSeconds(7))]
    fn should_reject_bad_timesteps_per_hour(
        #[case] timesteps_per_hour: u32,
        #[case] expected: ValidationError,
    ) {
        let run_period = RunPeriod::new((1, 1), (1, 2), DayOfWeek::Sunday, timesteps_per_hour);
        assert_eq!(RunPeriodIndex::new(&run_period).unwrap_err(), expected);
    }

    #[test]
    fn should_reject_end_before_begin() {
        let run_period = RunPeriod::new((3, 2), (3, 1), DayOfWeek::Sunday, 4);
        assert!(matches!(
            RunPeriodIndex::new(&run_period),
            Err(ValidationError::EndBeforeBegin { .. })
        ));
    }

    #[test]
    fn should_reject_impossible_date() {
        let run_period = RunPeriod::new((2, 29), (3, 1), DayOfWeek::Sunday, 4);
        assert_eq!(
            RunPeriodIndex::new(&run_period).unwrap_err(),
            ValidationError::InvalidDate { month: 2, day: 29 }
        );
    }

    #[test]
    fn should_reject_leap_reference_year() {
        let mut run_period = RunPeriod::new((1, 1), (1, 2), DayOfWeek::Sunday, 4);
        run_period.reference_year = 2012;
        assert_eq!(
            RunPeriodIndex::new(&run_period).unwrap_err(),
            ValidationError::LeapReferenceYear(2012)
        );
    }
}
