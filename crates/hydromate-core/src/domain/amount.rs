use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use super::prefs::LiquidUnit;

/// A non-negative amount of liquid, stored internally in milliliters.
///
/// All hydration math happens on this type; the display unit is a user
/// preference applied only when formatting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Milliliters(pub u32);

impl Milliliters {
    pub const ZERO: Milliliters = Milliliters(0);
    pub const DAILY_GOAL_DEFAULT: Milliliters = Milliliters(2000);

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Format in the given display unit, e.g. `"500 ml"` or `"16.9 oz"`.
    pub fn format(self, unit: LiquidUnit) -> String {
        match unit {
            LiquidUnit::Milliliters => format!("{} ml", self.0),
            LiquidUnit::Ounces => format!("{:.1} oz", self.0 as f64 / ML_PER_FL_OZ),
        }
    }
}

/// One US fluid ounce in milliliters.
const ML_PER_FL_OZ: f64 = 29.5735;

impl Add for Milliliters {
    type Output = Milliliters;

    fn add(self, rhs: Milliliters) -> Milliliters {
        Milliliters(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Milliliters {
    fn add_assign(&mut self, rhs: Milliliters) {
        *self = *self + rhs;
    }
}

impl Sum for Milliliters {
    fn sum<I: Iterator<Item = Milliliters>>(iter: I) -> Milliliters {
        iter.fold(Milliliters::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Milliliters> for Milliliters {
    fn sum<I: Iterator<Item = &'a Milliliters>>(iter: I) -> Milliliters {
        iter.copied().sum()
    }
}

/// Progress toward the daily goal as a ratio.
///
/// Unclamped above 1.0: the goal is reached when `value() >= 1.0` and the
/// ratio keeps growing past it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(f32);

impl Percent {
    /// Ratio of `total` to `goal`.
    ///
    /// A zero goal would divide by zero; it is guarded here and reported
    /// as zero progress. Goal edits reject zero before it ever reaches
    /// persisted state, so this branch only covers corrupt input.
    pub fn of(total: Milliliters, goal: Milliliters) -> Percent {
        if goal.is_zero() {
            return Percent(0.0);
        }
        Percent(total.value() as f32 / goal.value() as f32)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn is_goal_reached(self) -> bool {
        self.0 >= 1.0
    }

    /// Format as a whole percentage, e.g. `"40%"`.
    pub fn format(self) -> String {
        format!("{}%", (self.0 * 100.0).round() as i64)
    }
}
