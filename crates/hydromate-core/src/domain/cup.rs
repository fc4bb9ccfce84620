use serde::{Deserialize, Serialize};

use super::amount::Milliliters;
use super::prefs::LiquidUnit;

/// A quick-add cup size.
///
/// Cups order by their amount so merged default/selected lists stay
/// sorted smallest-first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Cup {
    pub milliliters: Milliliters,
}

impl Cup {
    pub fn new(milliliters: Milliliters) -> Cup {
        Cup { milliliters }
    }

    pub fn format(self, unit: LiquidUnit) -> String {
        self.milliliters.format(unit)
    }
}

/// The built-in cup sizes offered for the given display unit.
///
/// Metric users get round-milliliter cups; ounce users get cups that land
/// on whole fluid ounces.
pub fn default_cups(unit: LiquidUnit) -> Vec<Cup> {
    let sizes: &[u32] = match unit {
        LiquidUnit::Milliliters => &[100, 150, 200, 250, 300, 330, 400, 500],
        // 4, 6, 8, 10, 12 and 16 fl oz
        LiquidUnit::Ounces => &[118, 177, 237, 296, 355, 473],
    };
    sizes.iter().map(|&ml| Cup::new(Milliliters(ml))).collect()
}

/// The cups pre-selected for the reminder notification's quick-add
/// actions when the user has not picked any.
pub fn default_selected_cups(unit: LiquidUnit) -> Vec<Cup> {
    let sizes: &[u32] = match unit {
        LiquidUnit::Milliliters => &[200, 300, 500],
        LiquidUnit::Ounces => &[237, 355, 473],
    };
    sizes.iter().map(|&ml| Cup::new(Milliliters(ml))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sorted() {
        for unit in [LiquidUnit::Milliliters, LiquidUnit::Ounces] {
            let cups = default_cups(unit);
            let mut sorted = cups.clone();
            sorted.sort();
            assert_eq!(cups, sorted);
        }
    }

    #[test]
    fn selected_defaults_are_a_subset_of_defaults() {
        for unit in [LiquidUnit::Milliliters, LiquidUnit::Ounces] {
            let all = default_cups(unit);
            for cup in default_selected_cups(unit) {
                assert!(all.contains(&cup));
            }
        }
    }
}
