//! Integration tests for the state store: action ordering, persistence
//! round-trips, stream folding and reminder programming.

mod common;

use common::{date, start_store, time, wait_for_state};
use hydromate_core::{
    AppAction, Cup, HydrationHistory, LiquidUnit, Milliliters, PreferenceStore, Reminder, Theme,
};

#[tokio::test]
async fn add_hydration_accumulates_and_persists() {
    let h = start_store(date(2024, 5, 1), true);

    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(500),
    });
    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(300),
    });
    h.store.settled().await;

    let state = h.store.current_state();
    assert_eq!(state.today_hydration, Milliliters(800));
    assert!((state.hydration_progress().value() - 0.40).abs() < 1e-6);
    assert!(!state.daily_goal_reached());

    let stored = h.history.day(date(2024, 5, 1)).borrow().clone().unwrap();
    assert_eq!(stored.hydration.len(), 2);
    assert_eq!(stored.goal, Milliliters::DAILY_GOAL_DEFAULT);

    // Crossing the goal leaves the ratio unclamped.
    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(1300),
    });
    h.store.settled().await;
    let state = h.store.current_state();
    assert!((state.hydration_progress().value() - 1.05).abs() < 1e-6);
    assert!(state.daily_goal_reached());
}

#[tokio::test]
async fn rapid_adds_are_applied_in_order_without_loss() {
    let h = start_store(date(2024, 5, 1), true);

    for _ in 0..10 {
        h.store.dispatch(AppAction::AddHydration {
            value: Milliliters(100),
        });
    }
    h.store.settled().await;

    assert_eq!(h.store.current_state().today_hydration, Milliliters(1000));
    let stored = h.history.day(date(2024, 5, 1)).borrow().clone().unwrap();
    assert_eq!(stored.hydration.len(), 10);
}

#[tokio::test]
async fn remove_last_event_keeps_the_day_record() {
    let h = start_store(date(2024, 5, 1), true);
    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(500),
    });
    h.store.dispatch(AppAction::RemoveHydration);
    h.store.settled().await;

    assert_eq!(h.store.current_state().today_hydration, Milliliters::ZERO);
    let stored = h.history.day(date(2024, 5, 1)).borrow().clone().unwrap();
    assert!(stored.hydration.is_empty());
    assert_eq!(stored.goal, Milliliters::DAILY_GOAL_DEFAULT);
}

#[tokio::test]
async fn remove_on_empty_history_is_a_no_op() {
    let h = start_store(date(2024, 5, 1), true);
    h.store.dispatch(AppAction::RemoveHydration);
    h.store.settled().await;
    assert!(h.history.day(date(2024, 5, 1)).borrow().is_none());
}

#[tokio::test]
async fn reset_today_clears_events_and_keeps_goal() {
    let h = start_store(date(2024, 5, 1), true);
    h.store.dispatch(AppAction::SetDailyGoal {
        value: Milliliters(2500),
    });
    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(400),
    });
    h.store.dispatch(AppAction::ResetToday);
    h.store.settled().await;

    assert_eq!(h.store.current_state().today_hydration, Milliliters::ZERO);
    let stored = h.history.day(date(2024, 5, 1)).borrow().clone().unwrap();
    assert!(stored.hydration.is_empty());
    assert_eq!(stored.goal, Milliliters(2500));
}

#[tokio::test]
async fn set_goal_persists_and_refreshes_todays_snapshot() {
    let h = start_store(date(2024, 5, 1), true);
    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(200),
    });
    h.store.dispatch(AppAction::SetDailyGoal {
        value: Milliliters(3000),
    });
    h.store.settled().await;

    assert_eq!(h.store.current_state().daily_goal, Milliliters(3000));
    assert_eq!(*h.preferences.daily_goal().borrow(), Some(Milliliters(3000)));
    let stored = h.history.day(date(2024, 5, 1)).borrow().clone().unwrap();
    assert_eq!(stored.goal, Milliliters(3000));
}

#[tokio::test]
async fn zero_goal_is_rejected() {
    let h = start_store(date(2024, 5, 1), true);
    h.store.dispatch(AppAction::SetDailyGoal {
        value: Milliliters::ZERO,
    });
    h.store.settled().await;

    assert_eq!(
        h.store.current_state().daily_goal,
        Milliliters::DAILY_GOAL_DEFAULT
    );
    assert!(h.preferences.daily_goal().borrow().is_none());
}

#[tokio::test]
async fn set_reminder_installs_alarms_and_persists() {
    let h = start_store(date(2024, 5, 1), true);
    let reminder = Reminder::new(time(8, 0), time(22, 0), 90).unwrap();

    h.store.dispatch(AppAction::SetReminder {
        value: Some(reminder),
    });
    h.store.settled().await;

    assert_eq!(h.store.current_state().reminder, Some(reminder));
    assert_eq!(*h.preferences.reminder().borrow(), Some(reminder));
    let times = h.alarms.installed_times();
    assert_eq!(times.len(), 10);
    assert_eq!(times[0], time(8, 0));
    assert_eq!(times[9], time(21, 30));
}

#[tokio::test]
async fn reprogramming_the_same_reminder_is_idempotent() {
    let h = start_store(date(2024, 5, 1), true);
    let reminder = Reminder::new(time(9, 0), time(12, 0), 60).unwrap();

    h.store.dispatch(AppAction::SetReminder {
        value: Some(reminder),
    });
    h.store.dispatch(AppAction::SetReminder {
        value: Some(reminder),
    });
    h.store.settled().await;

    let times = h.alarms.installed_times();
    assert_eq!(times.len(), 4);
}

#[tokio::test]
async fn clearing_the_reminder_cancels_every_installed_alarm() {
    let h = start_store(date(2024, 5, 1), true);
    let reminder = Reminder::new(time(9, 0), time(11, 0), 60).unwrap();

    h.store.dispatch(AppAction::SetReminder {
        value: Some(reminder),
    });
    h.store.dispatch(AppAction::SetReminder { value: None });
    h.store.settled().await;

    assert!(h.store.current_state().reminder.is_none());
    assert!(h.preferences.reminder().borrow().is_none());
    assert!(h.alarms.installed_times().is_empty());
    assert!(h.alarms.cancelled().contains(&time(9, 0)));
}

#[tokio::test]
async fn missing_permission_skips_installation_but_keeps_preference() {
    let h = start_store(date(2024, 5, 1), false);
    let reminder = Reminder::new(time(8, 0), time(10, 0), 60).unwrap();

    h.store.dispatch(AppAction::SetReminder {
        value: Some(reminder),
    });
    h.store.settled().await;

    assert!(!h.store.current_state().can_schedule_alarms);
    assert!(h.alarms.installed_times().is_empty());
    assert_eq!(*h.preferences.reminder().borrow(), Some(reminder));
}

#[tokio::test]
async fn restart_reminder_reinstalls_from_preferences() {
    let h = start_store(date(2024, 5, 1), true);
    let reminder = Reminder::new(time(8, 0), time(10, 0), 60).unwrap();
    h.preferences.set_reminder(Some(reminder)).await.unwrap();

    h.store.dispatch(AppAction::RestartReminder);
    h.store.settled().await;

    assert_eq!(h.alarms.installed_times().len(), 3);
}

#[tokio::test]
async fn notification_respects_the_trigger_gate() {
    let h = start_store(date(2024, 5, 1), true);

    // Neither forced nor hot nor active: nothing shows.
    h.store
        .dispatch(AppAction::ShowReminderNotification { forced: false });
    h.store.settled().await;
    assert!(h.notifier.shown().is_empty());

    h.store
        .dispatch(AppAction::ShowReminderNotification { forced: true });
    h.store.settled().await;
    assert_eq!(h.notifier.shown().len(), 1);

    h.store.dispatch(AppAction::SetTemperature { value: 25.0 });
    h.store
        .dispatch(AppAction::ShowReminderNotification { forced: false });
    h.store.settled().await;
    assert_eq!(h.notifier.shown().len(), 2);

    h.store.dispatch(AppAction::SetTemperature { value: 10.0 });
    h.store.dispatch(AppAction::SetStepsRecord { value: 2500 });
    h.store
        .dispatch(AppAction::ShowReminderNotification { forced: false });
    h.store.settled().await;
    assert_eq!(h.notifier.shown().len(), 3);
}

#[tokio::test]
async fn notification_reports_todays_total() {
    let h = start_store(date(2024, 5, 1), true);
    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(600),
    });
    h.store
        .dispatch(AppAction::ShowReminderNotification { forced: true });
    h.store.settled().await;

    let shown = h.notifier.shown();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0, Milliliters(600));
    assert!((shown[0].1 - 0.3).abs() < 1e-6);
    // Logging a drink dismisses the pending notification.
    assert_eq!(h.notifier.cancelled_count(), 1);
}

#[tokio::test]
async fn external_preference_changes_fold_into_state() {
    let h = start_store(date(2024, 5, 1), true);

    h.preferences.set_theme(Theme::Dark).await.unwrap();
    wait_for_state(&h.store, |s| s.theme == Theme::Dark).await;

    h.preferences
        .set_liquid_unit(LiquidUnit::Ounces)
        .await
        .unwrap();
    wait_for_state(&h.store, |s| s.liquid_unit == LiquidUnit::Ounces).await;

    // Unit switch also swaps the default cup sets.
    let state = h.store.current_state();
    assert!(state
        .default_cups
        .contains(&Cup::new(Milliliters(237))));
}

#[tokio::test]
async fn all_cups_merges_defaults_with_custom_selection() {
    let h = start_store(date(2024, 5, 1), true);
    h.store.dispatch(AppAction::SetSelectedCups {
        value: vec![Cup::new(Milliliters(250)), Cup::new(Milliliters(750))],
    });
    h.store.settled().await;

    let cups = h.store.current_state().all_cups();
    // 250 ml is already a built-in size; the merged list stays deduplicated.
    let count_250 = cups
        .iter()
        .filter(|c| c.milliliters == Milliliters(250))
        .count();
    assert_eq!(count_250, 1);
    assert!(cups.contains(&Cup::new(Milliliters(750))));
    let mut sorted = cups.clone();
    sorted.sort();
    assert_eq!(cups, sorted);
}

#[tokio::test]
async fn permission_stream_updates_the_flag() {
    let h = start_store(date(2024, 5, 1), true);
    assert!(h.store.current_state().can_schedule_alarms);

    h.alarms.set_can_schedule(false);
    wait_for_state(&h.store, |s| !s.can_schedule_alarms).await;
}

#[tokio::test]
async fn day_rollover_resets_the_running_total() {
    let h = start_store(date(2024, 5, 1), true);
    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(800),
    });
    h.store.settled().await;
    assert_eq!(h.store.current_state().today_hydration, Milliliters(800));

    h.date_tx.send_replace(date(2024, 5, 2));
    wait_for_state(&h.store, |s| s.today_hydration == Milliliters::ZERO).await;

    // New drinks land on the new date; yesterday is untouched.
    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(250),
    });
    h.store.settled().await;
    let yesterday = h.history.day(date(2024, 5, 1)).borrow().clone().unwrap();
    assert_eq!(yesterday.total(), Milliliters(800));
    let today = h.history.day(date(2024, 5, 2)).borrow().clone().unwrap();
    assert_eq!(today.total(), Milliliters(250));
}

#[tokio::test]
async fn delete_all_resets_state_and_collaborators() {
    let h = start_store(date(2024, 5, 1), true);
    let reminder = Reminder::new(time(8, 0), time(10, 0), 60).unwrap();
    h.store.dispatch(AppAction::SetDailyGoal {
        value: Milliliters(2500),
    });
    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(500),
    });
    h.store.dispatch(AppAction::SetReminder {
        value: Some(reminder),
    });
    h.store.dispatch(AppAction::DeleteAll);
    h.store.settled().await;

    let state = h.store.current_state();
    assert_eq!(state.daily_goal, Milliliters::DAILY_GOAL_DEFAULT);
    assert_eq!(state.today_hydration, Milliliters::ZERO);
    assert!(state.reminder.is_none());
    assert!(h.history.day(date(2024, 5, 1)).borrow().is_none());
    assert!(h.preferences.reminder().borrow().is_none());
    assert!(h.alarms.installed_times().is_empty());
    assert_eq!(h.notifier.cleared_count(), 1);
}

#[tokio::test]
async fn subscription_starts_with_the_current_snapshot() {
    let h = start_store(date(2024, 5, 1), true);
    h.store.dispatch(AppAction::AddHydration {
        value: Milliliters(300),
    });
    h.store.settled().await;

    let rx = h.store.subscribe();
    assert_eq!(rx.borrow().today_hydration, Milliliters(300));
}
