//! Regular/overtime hour splitting.
//!
//! Splits an employee's aggregated hours for the period into regular and
//! overtime portions under their overtime policy, and derives the overtime
//! rate. Single-threshold model: one contracted-hours cutoff per period.

use rust_decimal::Decimal;

use crate::models::{OvertimePolicy, OvertimeRule};

/// The result of splitting aggregated hours under an overtime policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvertimeSplit {
    /// Hours paid at the base rate.
    pub regular_hours: Decimal,
    /// Hours paid at the overtime rate.
    pub overtime_hours: Decimal,
    /// The overtime hourly rate; zero when no overtime applies.
    pub overtime_rate: Decimal,
}

/// Splits `total_hours` into regular and overtime portions.
///
/// With the policy disabled, or no positive contracted-hours threshold, all
/// hours are regular and the overtime rate is zero. Otherwise hours up to
/// the threshold are regular and the excess is overtime, paid at
/// `base_rate × multiplier` or `base_rate + flat_extra` depending on the
/// rule. A missing rule parameter degrades to the base rate.
///
/// # Examples
///
/// ```
/// use payrun_engine::calculation::split_overtime;
/// use payrun_engine::models::{OvertimePolicy, OvertimeRule};
/// use rust_decimal::Decimal;
///
/// let policy = OvertimePolicy {
///     enabled: true,
///     contracted_weekly_hours: Some(Decimal::new(40, 0)),
///     rule_type: OvertimeRule::Multiplier,
///     multiplier: Some(Decimal::new(15, 1)),
///     flat_extra: None,
/// };
/// let split = split_overtime(Decimal::new(45, 0), &policy, Decimal::new(20, 0));
///
/// assert_eq!(split.regular_hours, Decimal::new(40, 0));
/// assert_eq!(split.overtime_hours, Decimal::new(5, 0));
/// assert_eq!(split.overtime_rate, Decimal::new(30, 0));
/// ```
pub fn split_overtime(
    total_hours: Decimal,
    policy: &OvertimePolicy,
    base_rate: Decimal,
) -> OvertimeSplit {
    let Some(threshold) = policy.threshold() else {
        return OvertimeSplit {
            regular_hours: total_hours,
            overtime_hours: Decimal::ZERO,
            overtime_rate: Decimal::ZERO,
        };
    };

    let regular_hours = total_hours.min(threshold);
    let overtime_hours = (total_hours - threshold).max(Decimal::ZERO);
    let overtime_rate = match policy.rule_type {
        OvertimeRule::Multiplier => base_rate * policy.multiplier.unwrap_or(Decimal::ONE),
        OvertimeRule::FlatExtra => base_rate + policy.flat_extra.unwrap_or(Decimal::ZERO),
    };

    OvertimeSplit {
        regular_hours,
        overtime_hours,
        overtime_rate,
    }
}
