//! Pay period boundary computation.
//!
//! This module computes the half-open `[start, end)` boundary of the pay
//! period containing a reference instant, for every supported scheme. The
//! algorithm is the same for all schemes: convert the reference instant to a
//! wall-clock date in the employer's timezone, do pure calendar arithmetic
//! on dates, then convert each boundary date back to an absolute instant at
//! local midnight. Start and end are converted independently so DST
//! transitions are resolved by the timezone's offset at each boundary, never
//! by adding a fixed 24-hour or 14-day duration to an instant.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, PeriodScheme};

/// Computes the pay period containing `reference` under `scheme`.
///
/// # Arguments
///
/// * `reference` - Any instant inside the desired period
/// * `scheme` - The tenant's period scheme configuration
/// * `timezone` - IANA timezone name the boundaries are anchored in
///
/// # Errors
///
/// Returns [`EngineError::Validation`] for an unknown timezone name or an
/// out-of-range scheme field.
///
/// # Examples
///
/// ```
/// use payrun_engine::calculation::compute_pay_period;
/// use payrun_engine::models::PeriodScheme;
/// use chrono::{TimeZone, Utc, Weekday};
///
/// let scheme = PeriodScheme::Weekly { start_day_of_week: Weekday::Mon };
/// let reference = Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap();
/// let period = compute_pay_period(reference, &scheme, "UTC").unwrap();
///
/// assert_eq!(period.start, Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap());
/// assert_eq!(period.end, Utc.with_ymd_and_hms(2024, 3, 18, 0, 0, 0).unwrap());
/// ```
pub fn compute_pay_period(
    reference: DateTime<Utc>,
    scheme: &PeriodScheme,
    timezone: &str,
) -> EngineResult<PayPeriod> {
    scheme.validate()?;
    let tz = parse_timezone(timezone)?;
    let local_date = reference.with_timezone(&tz).date_naive();

    let (start_date, end_date) = match scheme {
        PeriodScheme::Weekly { start_day_of_week } => {
            weekly_bounds(local_date, *start_day_of_week)
        }
        PeriodScheme::Fortnightly {
            reference_start_date,
        } => fortnightly_bounds(local_date, *reference_start_date),
        PeriodScheme::SemiMonthly { first_half_end_day } => {
            semi_monthly_bounds(local_date, *first_half_end_day)?
        }
        PeriodScheme::Monthly { start_day_of_month } => {
            monthly_bounds(local_date, *start_day_of_month)?
        }
    };

    Ok(PayPeriod {
        start: local_midnight(start_date, tz),
        end: local_midnight(end_date, tz),
    })
}

/// Parses an IANA timezone name.
///
/// # Errors
///
/// Returns [`EngineError::Validation`] naming the `timezone` field when the
/// name is empty or unknown.
pub fn parse_timezone(name: &str) -> EngineResult<Tz> {
    name.parse::<Tz>().map_err(|_| {
        EngineError::validation("timezone", format!("unknown IANA timezone '{}'", name))
    })
}

/// Converts a calendar date to the UTC instant of its local midnight.
///
/// An ambiguous midnight (clocks fell back across it) takes the earlier
/// offset. A midnight skipped by a DST gap resolves to the first instant the
/// local clock actually shows that day.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.with_timezone(&Utc);
    }
    let shifted = naive + Duration::hours(1);
    tz.from_local_datetime(&shifted)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Start = most recent occurrence of `start_day` on or before the date.
fn weekly_bounds(local_date: NaiveDate, start_day: Weekday) -> (NaiveDate, NaiveDate) {
    let days_back = (local_date.weekday().num_days_from_monday() + 7
        - start_day.num_days_from_monday())
        % 7;
    let start = local_date - Duration::days(i64::from(days_back));
    (start, start + Duration::days(7))
}

/// Whole fortnights are counted as calendar days from the anchor, not as a
/// millisecond division, so a DST transition inside the window cannot shift
/// the boundary by a day.
fn fortnightly_bounds(local_date: NaiveDate, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_since = local_date.signed_duration_since(anchor).num_days();
    let periods_elapsed = days_since.div_euclid(14);
    let start = anchor + Duration::days(periods_elapsed * 14);
    (start, start + Duration::days(14))
}

fn semi_monthly_bounds(
    local_date: NaiveDate,
    first_half_end_day: u32,
) -> EngineResult<(NaiveDate, NaiveDate)> {
    let year = local_date.year();
    let month = local_date.month();
    if local_date.day() <= first_half_end_day {
        Ok((
            date_of(year, month, 1)?,
            date_of(year, month, first_half_end_day + 1)?,
        ))
    } else {
        let (next_year, next_month) = month_after(year, month);
        Ok((
            date_of(year, month, first_half_end_day + 1)?,
            date_of(next_year, next_month, 1)?,
        ))
    }
}

/// The nominal start day is clamped independently to each month's length, so
/// a "starts on the 31st" scheme degrades gracefully every short month
/// without drifting.
fn monthly_bounds(
    local_date: NaiveDate,
    start_day_of_month: u32,
) -> EngineResult<(NaiveDate, NaiveDate)> {
    let year = local_date.year();
    let month = local_date.month();
    let clamped_here = start_day_of_month.min(days_in_month(year, month));

    let (start_year, start_month) = if local_date.day() >= clamped_here {
        (year, month)
    } else {
        month_before(year, month)
    };
    let start_day = start_day_of_month.min(days_in_month(start_year, start_month));
    let start = date_of(start_year, start_month, start_day)?;

    let (end_year, end_month) = month_after(start_year, start_month);
    let end_day = start_day_of_month.min(days_in_month(end_year, end_month));
    let end = date_of(end_year, end_month, end_day)?;

    Ok((start, end))
}

fn date_of(year: i32, month: u32, day: u32) -> EngineResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        EngineError::validation(
            "reference_date",
            format!("computed boundary {:04}-{:02}-{:02} is not a valid date", year, month, day),
        )
    })
}

fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn month_before(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = month_after(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
