//! Reminder notification content.
//!
//! Delivery is the platform's job (see [`crate::ports::ReminderNotifier`]);
//! this module owns the message copy so every notifier shows the same
//! text for the same progress.

use crate::domain::Milliliters;

/// The reminder headline for the amount drunk so far today.
///
/// Steps through a fresh message every 100 ml so repeated reminders
/// don't read identically over the day.
pub fn reminder_message(today: Milliliters) -> &'static str {
    match today.value() {
        0..=199 => "Time to Hydrate! Take a Sip of Water and Stay Refreshed.",
        200..=299 => "Stay Hydrated! Your Body Needs Water. Take a Break and Drink Up!",
        300..=399 => "Hydration Alert! Grab a Glass of Water and Rehydrate.",
        400..=499 => "Don't Forget to Drink Water! Your Body Thanks You.",
        500..=599 => "Quench Your Thirst! It's Hydration O'Clock.",
        600..=699 => "Stay Healthy and Hydrated! Time for a Water Break.",
        700..=799 => "Water Time! Hydrate Yourself for Optimal Wellness.",
        800..=899 => "Hydration Check: Have You Had Your Glass of Water Yet?",
        900..=999 => "A Little H2O Never Hurt! Stay Hydrated for a Productive Day.",
        1000..=1099 => "Refill Your Cup! Hydration Is the Key to Feeling Great.",
        1100..=1199 => "Stay Hydrated! Another Glass of Water Brings You Closer to Wellness.",
        1200..=1299 => "Hydration Alert! Keep Sipping Water for a Healthy You.",
        1300..=1399 => "Don't Forget to Stay Hydrated! Your Body Loves Water.",
        1400..=1499 => "Quench Your Thirst! It's Time for More Hydration.",
        1500..=1599 => "Stay Healthy and Hydrated! Keep Up the Water Intake.",
        1600..=1699 => "Water Time! Hydrate to Energize Your Body.",
        1700..=1799 => "Hydration Check: Keep the Water Coming for a Productive Day.",
        1800..=1899 => "Stay Hydrated! Your Body Will Thank You.",
        1900..=1999 => "A Little H2O Never Hurt! Keep Hydrating for Optimal Wellness.",
        _ => "Keep Hydrating! Your Body Will Thank You.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_changes_with_progress() {
        let early = reminder_message(Milliliters(50));
        let late = reminder_message(Milliliters(1850));
        assert_ne!(early, late);
    }

    #[test]
    fn past_goal_uses_catch_all() {
        assert_eq!(
            reminder_message(Milliliters(2400)),
            reminder_message(Milliliters(9000))
        );
    }
}
