//! Pay period scheme configuration.
//!
//! This module defines the [`PeriodScheme`] tagged union describing how a
//! tenant's recurring pay period is anchored to the calendar. The scheme is
//! immutable per-tenant configuration; changing it does not retroactively
//! alter previously generated periods.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Describes how a recurring pay period is anchored to the calendar.
///
/// Each variant carries exactly the fields that scheme requires, so a
/// fortnightly scheme without an anchor date cannot be constructed. Field
/// ranges are checked by [`PeriodScheme::validate`], which callers invoke
/// before computing boundaries.
///
/// # Example
///
/// ```
/// use payrun_engine::models::PeriodScheme;
/// use chrono::Weekday;
///
/// let scheme = PeriodScheme::Weekly {
///     start_day_of_week: Weekday::Mon,
/// };
/// assert!(scheme.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeriodScheme {
    /// A seven-day period starting on a fixed day of the week.
    Weekly {
        /// The day of the week on which each period begins.
        start_day_of_week: Weekday,
    },
    /// A fourteen-day period anchored to a known period start date.
    Fortnightly {
        /// A date on which some period began; every other boundary is a
        /// whole number of fortnights away from it.
        reference_start_date: NaiveDate,
    },
    /// Two periods per month: `[1st, first_half_end_day]` and the remainder.
    SemiMonthly {
        /// The last day of the first half (1..=27 so the second half is
        /// never empty, February included).
        first_half_end_day: u32,
    },
    /// One period per month starting on a nominal day of the month.
    Monthly {
        /// The nominal start day (1..=31), clamped per month to the number
        /// of days that month actually has.
        start_day_of_month: u32,
    },
}

impl PeriodScheme {
    /// Checks the scheme's fields are within their valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] naming the offending field when a
    /// day number is out of range.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            PeriodScheme::Weekly { .. } | PeriodScheme::Fortnightly { .. } => Ok(()),
            PeriodScheme::SemiMonthly { first_half_end_day } => {
                if (1..=27).contains(first_half_end_day) {
                    Ok(())
                } else {
                    Err(EngineError::validation(
                        "first_half_end_day",
                        format!("must be between 1 and 27, got {}", first_half_end_day),
                    ))
                }
            }
            PeriodScheme::Monthly { start_day_of_month } => {
                if (1..=31).contains(start_day_of_month) {
                    Ok(())
                } else {
                    Err(EngineError::validation(
                        "start_day_of_month",
                        format!("must be between 1 and 31, got {}", start_day_of_month),
                    ))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_validates() {
        let scheme = PeriodScheme::Weekly {
            start_day_of_week: Weekday::Mon,
        };
        assert!(scheme.validate().is_ok());
    }

    #[test]
    fn test_semi_monthly_rejects_day_28() {
        let scheme = PeriodScheme::SemiMonthly {
            first_half_end_day: 28,
        };
        let err = scheme.validate().unwrap_err();
        assert!(err.to_string().contains("first_half_end_day"));
    }

    #[test]
    fn test_semi_monthly_rejects_day_zero() {
        let scheme = PeriodScheme::SemiMonthly {
            first_half_end_day: 0,
        };
        assert!(scheme.validate().is_err());
    }

    #[test]
    fn test_monthly_accepts_day_31() {
        let scheme = PeriodScheme::Monthly {
            start_day_of_month: 31,
        };
        assert!(scheme.validate().is_ok());
    }

    #[test]
    fn test_monthly_rejects_day_32() {
        let scheme = PeriodScheme::Monthly {
            start_day_of_month: 32,
        };
        assert!(scheme.validate().is_err());
    }

    #[test]
    fn test_deserialize_weekly() {
        let json = r#"{"type": "weekly", "start_day_of_week": "monday"}"#;
        let scheme: PeriodScheme = serde_json::from_str(json).unwrap();
        assert_eq!(
            scheme,
            PeriodScheme::Weekly {
                start_day_of_week: Weekday::Mon
            }
        );
    }

    #[test]
    fn test_deserialize_fortnightly() {
        let json = r#"{"type": "fortnightly", "reference_start_date": "2024-01-01"}"#;
        let scheme: PeriodScheme = serde_json::from_str(json).unwrap();
        assert_eq!(
            scheme,
            PeriodScheme::Fortnightly {
                reference_start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
            }
        );
    }

    #[test]
    fn test_deserialize_fortnightly_without_anchor_fails() {
        let json = r#"{"type": "fortnightly"}"#;
        let result = serde_json::from_str::<PeriodScheme>(json);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("reference_start_date")
        );
    }

    #[test]
    fn test_deserialize_unknown_scheme_fails() {
        let json = r#"{"type": "quarterly"}"#;
        assert!(serde_json::from_str::<PeriodScheme>(json).is_err());
    }

    #[test]
    fn test_scheme_round_trip() {
        let scheme = PeriodScheme::SemiMonthly {
            first_half_end_day: 15,
        };
        let json = serde_json::to_string(&scheme).unwrap();
        let back: PeriodScheme = serde_json::from_str(&json).unwrap();
        assert_eq!(scheme, back);
        assert!(json.contains("\"type\":\"semi_monthly\""));
    }
}
