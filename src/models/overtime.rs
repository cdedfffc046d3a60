//! Per-employee overtime policy.
//!
//! This module defines the [`OvertimePolicy`] struct and [`OvertimeRule`]
//! enum governing how an employee's aggregated hours are split into regular
//! and overtime portions for a period.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the overtime rate is derived from the base rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeRule {
    /// Overtime rate = base rate × multiplier.
    Multiplier,
    /// Overtime rate = base rate + flat extra amount per hour.
    FlatExtra,
}

/// An employee's overtime arrangement for one pay period.
///
/// This is a single-threshold model: hours beyond the contracted weekly
/// hours are overtime, everything under is regular. Tiered schemes such as
/// combined daily and weekly thresholds are out of scope. When the policy is
/// disabled or no positive contracted-hours figure exists, every hour is
/// regular and the overtime rate is zero.
///
/// # Example
///
/// ```
/// use payrun_engine::models::{OvertimePolicy, OvertimeRule};
/// use rust_decimal::Decimal;
///
/// let policy = OvertimePolicy {
///     enabled: true,
///     contracted_weekly_hours: Some(Decimal::new(38, 0)),
///     rule_type: OvertimeRule::Multiplier,
///     multiplier: Some(Decimal::new(15, 1)), // 1.5
///     flat_extra: None,
/// };
/// assert!(policy.threshold().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePolicy {
    /// Whether overtime applies to this employee at all.
    pub enabled: bool,
    /// The contracted weekly hours; the single overtime threshold.
    #[serde(default)]
    pub contracted_weekly_hours: Option<Decimal>,
    /// Which rule derives the overtime rate.
    pub rule_type: OvertimeRule,
    /// The multiplier for [`OvertimeRule::Multiplier`].
    #[serde(default)]
    pub multiplier: Option<Decimal>,
    /// The per-hour uplift for [`OvertimeRule::FlatExtra`].
    #[serde(default)]
    pub flat_extra: Option<Decimal>,
}

impl OvertimePolicy {
    /// A policy under which all hours are regular.
    pub fn disabled() -> Self {
        OvertimePolicy {
            enabled: false,
            contracted_weekly_hours: None,
            rule_type: OvertimeRule::Multiplier,
            multiplier: None,
            flat_extra: None,
        }
    }

    /// The effective overtime threshold, if the policy is active.
    ///
    /// Returns `None` when the policy is disabled or the contracted hours
    /// are absent or non-positive.
    pub fn threshold(&self) -> Option<Decimal> {
        if !self.enabled {
            return None;
        }
        self.contracted_weekly_hours
            .filter(|hours| *hours > Decimal::ZERO)
    }
}
