pub const SECONDS_PER_HOUR: u32 = 3_600;
pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_WEEK: usize = 7;
pub const MONTHS_PER_YEAR: u32 = 12;
pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
pub const MAX_DAYS_IN_MONTH: u32 = 31;

/// Year used purely for calendar arithmetic (must not be a leap year).
pub const REFERENCE_YEAR: i32 = 2009;

/// Fixed UTC alignment (7/24 of a day) applied before encoding epoch seconds.
pub const EPOCH_ALIGNMENT_HOURS: i64 = 7;

pub(crate) fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(2009, false)]
    #[case(2012, true)]
    #[case(1900, false)]
    #[case(2000, true)]
    fn should_identify_leap_years(#[case] year: i32, #[case] expected: bool) {
        assert_eq!(is_leap_year(year), expected);
    }

    #[test]
    fn should_have_365_days_in_reference_months() {
        assert_eq!(DAYS_IN_MONTH.iter().sum::<u32>(), 365);
        assert!(!is_leap_year(REFERENCE_YEAR));
    }
}
