use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// French month names, indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 9999;

pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "",
    }
}

/// A reporting period: a whole year, or one month of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Period {
    pub year: i32,
    pub month: Option<u32>,
}

impl Period {
    pub fn year(year: i32) -> Result<Self, ServiceError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ServiceError::InvalidInput(format!(
                "Year {year} is out of range"
            )));
        }
        Ok(Self { year, month: None })
    }

    pub fn month(year: i32, month: u32) -> Result<Self, ServiceError> {
        if !(1..=12).contains(&month) {
            return Err(ServiceError::InvalidInput(format!(
                "Month {month} must be between 1 and 12"
            )));
        }
        let period = Self::year(year)?;
        Ok(Self {
            month: Some(month),
            ..period
        })
    }

    /// Half-open date range `[start, end)` covered by the period.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        match self.month {
            Some(month) => {
                let start = first_of_month(self.year, month);
                let end = if month == 12 {
                    first_of_month(self.year + 1, 1)
                } else {
                    first_of_month(self.year, month + 1)
                };
                (start, end)
            }
            None => (first_of_month(self.year, 1), first_of_month(self.year + 1, 1)),
        }
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Inputs are range-checked by the constructors, so the fallback is unreachable.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[rstest]
    #[case(2024, 3, "2024-03-01", "2024-04-01")]
    #[case(2024, 12, "2024-12-01", "2025-01-01")]
    #[case(2023, 2, "2023-02-01", "2023-03-01")]
    fn month_range_is_half_open(
        #[case] year: i32,
        #[case] month: u32,
        #[case] start: &str,
        #[case] end: &str,
    ) {
        let (s, e) = Period::month(year, month).unwrap().date_range();
        assert_eq!(s.to_string(), start);
        assert_eq!(e.to_string(), end);
    }

    #[test]
    fn year_range_spans_whole_year() {
        let (s, e) = Period::year(2024).unwrap().date_range();
        assert_eq!(s, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(e, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn invalid_month_is_rejected(#[case] month: u32) {
        assert_matches!(
            Period::month(2024, month),
            Err(ServiceError::InvalidInput(_))
        );
    }

    #[test]
    fn month_names_are_french() {
        assert_eq!(month_name(1), "Janvier");
        assert_eq!(month_name(8), "Août");
        assert_eq!(month_name(12), "Décembre");
        assert_eq!(month_name(13), "");
    }
}
