// Walks a run period one timestep at a time and labels every timestep with the fault activation
// flag resulting from a set of calendar window rules.

use crate::core::calendar::DayOfWeek;
use crate::core::fault_window::FaultWindowRule;
use crate::errors::ValidationError;
use crate::run_period::{RunPeriod, RunPeriodIndex, RunPeriodStep};
use serde::{Serialize, Serializer};
use tracing::{info, warn};

fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

/// One row of the activation table, in the column layout consumed by export tooling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimestepRow {
    #[serde(rename = "Faulted", serialize_with = "serialize_flag")]
    pub faulted: bool,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "Day")]
    pub day: u32,
    /// HH:MM:SS, with 24:00:00 closing each day
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "DayOfWeek")]
    pub day_of_week: DayOfWeek,
    pub epoch_time: i64,
}

#[derive(Clone, Debug)]
pub struct CalendarWindowEvaluator {
    index: RunPeriodIndex,
    rules: Vec<FaultWindowRule>,
}

impl CalendarWindowEvaluator {
    pub fn new(
        run_period: &RunPeriod,
        rules: Vec<FaultWindowRule>,
    ) -> Result<Self, ValidationError> {
        let index = RunPeriodIndex::new(run_period)?;

        for rule in rules.iter().filter(|rule| !rule.can_match()) {
            warn!(
                "Fault window '{}' can never match (hours {:?})",
                rule.name(),
                rule.hour_range()
            );
        }

        Ok(Self { index, rules })
    }

    pub fn index(&self) -> &RunPeriodIndex {
        &self.index
    }

    /// Whether any rule matches the step. Rules combine with OR.
    pub fn is_active(&self, step: &RunPeriodStep) -> bool {
        self.rules.iter().any(|rule| rule.matches_step(step))
    }

    pub fn row_for(&self, step: &RunPeriodStep) -> TimestepRow {
        TimestepRow {
            faulted: self.is_active(step),
            month: step.month(),
            day: step.day(),
            time: step.formatted_time(),
            day_of_week: step.day_of_week,
            epoch_time: step.epoch_time(),
        }
    }

    /// One row per timestep of the run period, in chronological order.
    pub fn evaluate(&self) -> Vec<TimestepRow> {
        info!(
            "Evaluating {} fault window(s) over {} timesteps",
            self.rules.len(),
            self.index.total_steps()
        );
        self.index.iter().map(|step| self.row_for(&step)).collect()
    }
}

pub fn evaluate(
    run_period: &RunPeriod,
    rules: &[FaultWindowRule],
) -> Result<Vec<TimestepRow>, ValidationError> {
    Ok(CalendarWindowEvaluator::new(run_period, rules.to_vec())?.evaluate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn minute_resolution_monday() -> RunPeriod {
        RunPeriod::new((1, 5), (1, 5), DayOfWeek::Monday, 60)
    }

    #[fixture]
    fn office_hours() -> FaultWindowRule {
        FaultWindowRule::new("office_hours", [1], [5], [DayOfWeek::Monday], 9, 17).unwrap()
    }

    fn faulted_at(rows: &[TimestepRow], time: &str) -> bool {
        rows.iter()
            .find(|row| row.time == time)
            .map(|row| row.faulted)
            .unwrap_or_else(|| panic!("no row stamped {time}"))
    }

    #[rstest]
    fn should_trim_window_boundaries(
        minute_resolution_monday: RunPeriod,
        office_hours: FaultWindowRule,
    ) {
        let rows = evaluate(&minute_resolution_monday, &[office_hours]).unwrap();

        assert!(!faulted_at(&rows, "08:59:00"));
        assert!(!faulted_at(&rows, "09:00:00"));
        assert!(faulted_at(&rows, "09:01:00"));
        assert!(faulted_at(&rows, "12:30:00"));
        assert!(faulted_at(&rows, "16:59:00"));
        assert!(faulted_at(&rows, "17:00:00"));
        assert!(!faulted_at(&rows, "17:01:00"));

        // 09:01..=17:00
        assert_eq!(rows.iter().filter(|row| row.faulted).count(), 8 * 60);
    }

    #[rstest]
    fn should_emit_one_row_per_timestep(minute_resolution_monday: RunPeriod) {
        let rows = evaluate(&minute_resolution_monday, &[]).unwrap();
        assert_eq!(rows.len(), 24 * 60);
        assert_eq!(rows.first().unwrap().time, "00:01:00");
        assert_eq!(rows.last().unwrap().time, "24:00:00");
        assert!(rows.iter().all(|row| (row.month, row.day) == (1, 5)));
    }

    #[test]
    fn should_emit_all_zero_flags_without_rules() {
        let run_period = RunPeriod::new((6, 1), (6, 3), DayOfWeek::Saturday, 4);
        let rows = evaluate(&run_period, &[]).unwrap();
        assert_eq!(rows.len(), 3 * 24 * 4);
        assert!(rows.iter().all(|row| !row.faulted));
    }

    #[test]
    fn should_combine_rules_with_or() {
        let run_period = RunPeriod::new((1, 1), (1, 7), DayOfWeek::Thursday, 4);
        let morning = FaultWindowRule::new(
            "morning",
            [1],
            1..=7,
            [DayOfWeek::Thursday, DayOfWeek::Friday],
            6,
            9,
        )
        .unwrap();
        let weekend = FaultWindowRule::new(
            "weekend",
            [1],
            1..=7,
            [DayOfWeek::Saturday, DayOfWeek::Sunday],
            0,
            24,
        )
        .unwrap();
        let never = FaultWindowRule::new("never", [7], [1], [DayOfWeek::Monday], 0, 24).unwrap();
        let rules = vec![morning.clone(), never, weekend.clone()];

        let evaluator = CalendarWindowEvaluator::new(&run_period, rules.clone()).unwrap();
        for step in evaluator.index().iter() {
            let expected = rules.iter().any(|rule| rule.matches_step(&step));
            assert_eq!(evaluator.is_active(&step), expected);
        }

        let rows = evaluator.evaluate();
        let per_rule = |rule: &FaultWindowRule| {
            evaluate(&run_period, std::slice::from_ref(rule))
                .unwrap()
                .into_iter()
                .map(|row| row.faulted)
                .collect_vec()
        };
        let morning_flags = per_rule(&morning);
        let weekend_flags = per_rule(&weekend);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.faulted, morning_flags[i] || weekend_flags[i]);
        }
        assert!(rows.iter().any(|row| row.faulted));
        assert!(rows.iter().any(|row| !row.faulted));
    }

    #[test]
    fn should_label_weekdays_from_start_day() {
        let run_period = RunPeriod::new((4, 1), (4, 10), DayOfWeek::Wednesday, 2);
        let rows = evaluate(&run_period, &[]).unwrap();

        assert_eq!(rows[0].day_of_week, DayOfWeek::Wednesday);
        let day_1 = &rows[0];
        let day_8 = &rows[7 * 48];
        assert_eq!(day_8.day, 8);
        assert_eq!(day_8.day_of_week, day_1.day_of_week);
        // closing midnight of day 1 stays on Wednesday
        assert_eq!(rows[47].time, "24:00:00");
        assert_eq!(rows[47].day_of_week, DayOfWeek::Wednesday);
        assert_eq!(rows[48].day_of_week, DayOfWeek::Thursday);
    }

    #[test]
    fn should_produce_identical_rows_on_repeated_runs() {
        let run_period = RunPeriod::new((2, 20), (3, 5), DayOfWeek::Tuesday, 6);
        let rule = FaultWindowRule::new(
            "repeat",
            [2, 3],
            [1, 2, 25, 28],
            [DayOfWeek::Tuesday, DayOfWeek::Friday],
            7,
            19,
        )
        .unwrap();

        let first = evaluate(&run_period, std::slice::from_ref(&rule)).unwrap();
        let second = evaluate(&run_period, std::slice::from_ref(&rule)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn should_increase_epoch_by_timestep() {
        let run_period = RunPeriod::new((1, 1), (1, 2), DayOfWeek::Thursday, 4);
        let rows = evaluate(&run_period, &[]).unwrap();
        for (previous, next) in rows.iter().tuple_windows() {
            assert_eq!(next.epoch_time - previous.epoch_time, 900);
        }
    }

    #[test]
    fn should_fail_before_emitting_rows_for_invalid_run_period() {
        let run_period = RunPeriod::new((1, 1), (1, 2), DayOfWeek::Thursday, 0);
        assert_eq!(
            evaluate(&run_period, &[]).unwrap_err(),
            ValidationError::NonPositiveTimestepsPerHour(0)
        );
    }
}
