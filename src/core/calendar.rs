// Weekday labels and month name handling shared by the run period index and the fault window rules.

use crate::core::units::{DAYS_PER_WEEK, MONTHS_PER_YEAR};
use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumString,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(try_from = "String")]
#[strum(ascii_case_insensitive)]
pub enum DayOfWeek {
    #[strum(to_string = "Sunday", serialize = "Sun")]
    Sunday,
    #[strum(to_string = "Monday", serialize = "Mon")]
    Monday,
    #[strum(to_string = "Tuesday", serialize = "Tue")]
    Tuesday,
    #[strum(to_string = "Wednesday", serialize = "Wed")]
    Wednesday,
    #[strum(to_string = "Thursday", serialize = "Thu")]
    Thursday,
    #[strum(to_string = "Friday", serialize = "Fri")]
    Friday,
    #[strum(to_string = "Saturday", serialize = "Sat")]
    Saturday,
}

impl TryFrom<String> for DayOfWeek {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DayOfWeek::from_str(&value).map_err(|_| ValidationError::UnknownStartDayOfWeek(value))
    }
}

/// Fixed canonical ordering of the week, starting on Sunday.
pub const CANONICAL_WEEK: [DayOfWeek; DAYS_PER_WEEK] = [
    DayOfWeek::Sunday,
    DayOfWeek::Monday,
    DayOfWeek::Tuesday,
    DayOfWeek::Wednesday,
    DayOfWeek::Thursday,
    DayOfWeek::Friday,
    DayOfWeek::Saturday,
];

impl DayOfWeek {
    /// Position of this day within [`CANONICAL_WEEK`].
    pub fn canonical_index(&self) -> usize {
        *self as usize
    }

    /// Canonical week rotated so that index 0 is this day.
    pub fn rotated_week(&self) -> [DayOfWeek; DAYS_PER_WEEK] {
        let offset = self.canonical_index();
        std::array::from_fn(|i| CANONICAL_WEEK[(i + offset) % DAYS_PER_WEEK])
    }
}

/// Parses a month given either as a number (1-12, possibly as a string) or as an English name or
/// abbreviation. Returns the month number.
pub(crate) fn parse_month_name(name: &str) -> Option<u32> {
    let trimmed = name.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        return (1..=MONTHS_PER_YEAR).contains(&number).then_some(number);
    }
    chrono::Month::from_str(trimmed)
        .ok()
        .map(|month| month.number_from_month())
}
