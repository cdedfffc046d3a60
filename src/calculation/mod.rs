//! Pure calculation core of the pay-run engine.
//!
//! This module contains the zero-I/O functions: pay period boundary
//! computation, per-shift worked-hours arithmetic with conflict detection,
//! and the regular/overtime split. Everything here is safe to call
//! repeatedly and from concurrent requests without synchronization.

mod hours;
mod overtime;
mod period;

pub use hours::{ShiftConflict, find_schedule_conflicts, round2, shift_worked_hours};
pub use overtime::{OvertimeSplit, split_overtime};
pub use period::{compute_pay_period, local_midnight, parse_timezone};
