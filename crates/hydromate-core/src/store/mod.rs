//! The reactive application state store.
//!
//! A single `AppState` snapshot plus a dispatch function. Actions enter
//! as messages on a mailbox and are folded by one worker task in arrival
//! order, so read-modify-write cycles against a day record never race.
//! Preference streams, the day-rollover signal and the alarm permission
//! stream fold into the same worker between actions -- never mid-action.
//!
//! Persistence is optimistic and best-effort: a failed write is reported
//! and the in-memory state stands; the durable stores remain the source
//! of truth on the next load.

use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot, watch};

use crate::domain::{
    default_cups, default_selected_cups, epoch_day, Cup, Day, HydrationEntry, LiquidUnit,
    Milliliters, Percent, Reminder, Theme,
};
use crate::error::Result;
use crate::ports::{AlarmService, HydrationHistory, PreferenceStore, ReminderNotifier};
use crate::scheduler::ReminderScheduler;
use crate::stats::{aggregate, range_bounds, ChartPoint, DateRangeType, RANGE_QUERY_LIMIT};

/// The single reactive snapshot consumed by all presentation layers.
///
/// Every field is derivable from persisted state plus "now"; the store
/// caches the last computation but holds no authority of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub daily_goal: Milliliters,
    pub today_hydration: Milliliters,
    pub reminder: Option<Reminder>,
    pub theme: Theme,
    pub can_schedule_alarms: bool,
    pub default_cups: Vec<Cup>,
    pub selected_cups: Vec<Cup>,
    pub app_in_foreground: bool,
    pub liquid_unit: LiquidUnit,
    pub temperature: Option<f64>,
    pub steps_record: u32,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub hydration_chart_data: Vec<ChartPoint>,
}

impl AppState {
    /// Ratio of today's intake to the daily goal, unclamped above 1.0.
    pub fn hydration_progress(&self) -> Percent {
        Percent::of(self.today_hydration, self.daily_goal)
    }

    pub fn daily_goal_reached(&self) -> bool {
        self.hydration_progress().is_goal_reached()
    }

    /// Built-in and user-selected cups merged, deduplicated and sorted.
    pub fn all_cups(&self) -> Vec<Cup> {
        let mut cups = self.default_cups.clone();
        cups.extend(self.selected_cups.iter().copied());
        cups.sort();
        cups.dedup();
        cups
    }
}

/// The closed action vocabulary. This is the entire externally visible
/// command surface; no other mutation path exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AppAction {
    SetDailyGoal { value: Milliliters },
    AddHydration { value: Milliliters },
    RemoveHydration,
    SetReminder { value: Option<Reminder> },
    RestartReminder,
    ShowReminderNotification { forced: bool },
    SetTheme { value: Theme },
    SetSelectedCups { value: Vec<Cup> },
    SetLiquidUnit { value: LiquidUnit },
    SetAppInForeground { value: bool },
    SetTemperature { value: f64 },
    SetStepsRecord { value: u32 },
    SetHeight { value: String },
    SetWeight { value: String },
    DeleteAll,
    ResetToday,
    LoadChartData { range: DateRangeType },
}

/// Everything the store is composed from. Construct once at process
/// start and pass the [`AppStore`] handle through every entry point.
pub struct StoreDeps {
    pub history: Arc<dyn HydrationHistory>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub alarms: Arc<dyn AlarmService>,
    pub notifier: Arc<dyn ReminderNotifier>,
    /// Day-rollover signal; see [`crate::rollover::spawn_midnight_watcher`].
    /// The sending side must outlive the store.
    pub date_changed: watch::Receiver<NaiveDate>,
}

enum Msg {
    Action(AppAction),
    Flush(oneshot::Sender<()>),
}

/// Handle to the running store.
///
/// Cheap to clone; dropping every handle shuts the worker down.
#[derive(Clone)]
pub struct AppStore {
    mailbox: mpsc::UnboundedSender<Msg>,
    state: watch::Receiver<AppState>,
}

impl AppStore {
    /// Build the initial snapshot from the ports' current values and
    /// spawn the worker. Must be called within a tokio runtime.
    pub fn start(deps: StoreDeps) -> AppStore {
        let today = *deps.date_changed.borrow();
        let today_day = deps.history.day(today);

        let liquid_unit = *deps.preferences.liquid_unit().borrow();
        let selected_cups = deps.preferences.selected_cups().borrow().clone();
        let initial = AppState {
            daily_goal: deps
                .preferences
                .daily_goal()
                .borrow()
                .unwrap_or(Milliliters::DAILY_GOAL_DEFAULT),
            today_hydration: today_day
                .borrow()
                .as_ref()
                .map(Day::total)
                .unwrap_or(Milliliters::ZERO),
            reminder: *deps.preferences.reminder().borrow(),
            theme: *deps.preferences.theme().borrow(),
            can_schedule_alarms: *deps.alarms.can_schedule().borrow(),
            default_cups: default_cups(liquid_unit),
            selected_cups: normalize_cups(selected_cups, liquid_unit),
            app_in_foreground: true,
            liquid_unit,
            temperature: None,
            steps_record: 0,
            height: deps.preferences.height().borrow().clone(),
            weight: deps.preferences.weight().borrow().clone(),
            hydration_chart_data: Vec::new(),
        };

        let (state_tx, state_rx) = watch::channel(initial);
        let (mailbox_tx, mailbox_rx) = mpsc::unbounded_channel();

        let worker = Worker {
            scheduler: ReminderScheduler::new(deps.alarms.clone(), deps.preferences.clone()),
            daily_goal_rx: deps.preferences.daily_goal(),
            reminder_rx: deps.preferences.reminder(),
            theme_rx: deps.preferences.theme(),
            liquid_unit_rx: deps.preferences.liquid_unit(),
            selected_cups_rx: deps.preferences.selected_cups(),
            height_rx: deps.preferences.height(),
            weight_rx: deps.preferences.weight(),
            can_schedule_rx: deps.alarms.can_schedule(),
            date_rx: deps.date_changed,
            history: deps.history,
            preferences: deps.preferences,
            notifier: deps.notifier,
            state: state_tx,
            mailbox: mailbox_rx,
            today,
            today_day,
        };
        tokio::spawn(worker.run());

        AppStore {
            mailbox: mailbox_tx,
            state: state_rx,
        }
    }

    /// Latest fully-applied snapshot. Never blocks, never partial.
    pub fn current_state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Live snapshot stream. Starts at the current snapshot, skips
    /// intermediate values a slow subscriber missed, and stays open for
    /// the store's lifetime.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.clone()
    }

    /// Enqueue `action` and return immediately. Actions are processed
    /// strictly in arrival order.
    pub fn dispatch(&self, action: AppAction) {
        let _ = self.mailbox.send(Msg::Action(action));
    }

    /// Resolve once every action dispatched before this call has been
    /// fully applied.
    pub async fn settled(&self) {
        let (tx, rx) = oneshot::channel();
        if self.mailbox.send(Msg::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }
}

fn normalize_cups(mut cups: Vec<Cup>, unit: LiquidUnit) -> Vec<Cup> {
    if cups.is_empty() {
        return default_selected_cups(unit);
    }
    cups.sort();
    cups
}

fn best_effort<T>(result: Result<T>, what: &str) {
    if let Err(e) = result {
        log::warn!("{what} failed: {e}");
    }
}

/// The single logical writer. Owns the state channel; everything that
/// mutates `AppState` goes through this task.
struct Worker {
    history: Arc<dyn HydrationHistory>,
    preferences: Arc<dyn PreferenceStore>,
    notifier: Arc<dyn ReminderNotifier>,
    scheduler: ReminderScheduler,
    state: watch::Sender<AppState>,
    mailbox: mpsc::UnboundedReceiver<Msg>,
    today: NaiveDate,
    today_day: watch::Receiver<Option<Day>>,
    daily_goal_rx: watch::Receiver<Option<Milliliters>>,
    reminder_rx: watch::Receiver<Option<Reminder>>,
    theme_rx: watch::Receiver<Theme>,
    liquid_unit_rx: watch::Receiver<LiquidUnit>,
    selected_cups_rx: watch::Receiver<Vec<Cup>>,
    height_rx: watch::Receiver<Option<String>>,
    weight_rx: watch::Receiver<Option<String>>,
    can_schedule_rx: watch::Receiver<bool>,
    date_rx: watch::Receiver<NaiveDate>,
}

/// Wait for a watch change; parks forever once the channel closes so a
/// dead stream never spins the select loop.
async fn changed_or_park<T>(rx: &mut watch::Receiver<T>) {
    if rx.changed().await.is_err() {
        std::future::pending::<()>().await;
    }
}

impl Worker {
    async fn run(mut self) {
        loop {
            tokio::select! {
                msg = self.mailbox.recv() => match msg {
                    Some(Msg::Action(action)) => self.apply(action).await,
                    Some(Msg::Flush(ack)) => {
                        let _ = ack.send(());
                    }
                    None => break,
                },
                _ = changed_or_park(&mut self.daily_goal_rx) => {
                    let goal = self
                        .daily_goal_rx
                        .borrow_and_update()
                        .unwrap_or(Milliliters::DAILY_GOAL_DEFAULT);
                    self.update(|s| s.daily_goal = goal);
                }
                _ = changed_or_park(&mut self.reminder_rx) => {
                    let reminder = *self.reminder_rx.borrow_and_update();
                    self.update(|s| s.reminder = reminder);
                }
                _ = changed_or_park(&mut self.theme_rx) => {
                    let theme = *self.theme_rx.borrow_and_update();
                    self.update(|s| s.theme = theme);
                }
                _ = changed_or_park(&mut self.liquid_unit_rx) => {
                    self.refresh_cups();
                }
                _ = changed_or_park(&mut self.selected_cups_rx) => {
                    self.refresh_cups();
                }
                _ = changed_or_park(&mut self.height_rx) => {
                    let height = self.height_rx.borrow_and_update().clone();
                    self.update(|s| s.height = height);
                }
                _ = changed_or_park(&mut self.weight_rx) => {
                    let weight = self.weight_rx.borrow_and_update().clone();
                    self.update(|s| s.weight = weight);
                }
                _ = changed_or_park(&mut self.can_schedule_rx) => {
                    let can = *self.can_schedule_rx.borrow_and_update();
                    self.update(|s| s.can_schedule_alarms = can);
                }
                _ = changed_or_park(&mut self.date_rx) => {
                    let date = *self.date_rx.borrow_and_update();
                    self.on_rollover(date);
                }
                _ = changed_or_park(&mut self.today_day) => {
                    let total = self
                        .today_day
                        .borrow_and_update()
                        .as_ref()
                        .map(Day::total)
                        .unwrap_or(Milliliters::ZERO);
                    self.update(|s| s.today_hydration = total);
                }
            }
        }
    }

    /// Replace-if-changed so subscribers only wake for real transitions.
    fn update(&self, f: impl FnOnce(&mut AppState)) {
        self.state.send_if_modified(|s| {
            let before = s.clone();
            f(s);
            *s != before
        });
    }

    fn refresh_cups(&self) {
        let unit = *self.liquid_unit_rx.borrow();
        let selected = self.selected_cups_rx.borrow().clone();
        self.update(|s| {
            s.liquid_unit = unit;
            s.default_cups = default_cups(unit);
            s.selected_cups = normalize_cups(selected, unit);
        });
    }

    /// Re-derive "today" after a date change: swap the live day stream
    /// to the new date and recompute the running total.
    fn on_rollover(&mut self, date: NaiveDate) {
        self.today = date;
        self.today_day = self.history.day(date);
        let total = self
            .today_day
            .borrow_and_update()
            .as_ref()
            .map(Day::total)
            .unwrap_or(Milliliters::ZERO);
        self.update(|s| s.today_hydration = total);
    }

    /// The single reducer site. Adding an action extends this match;
    /// exhaustiveness is compiler-checked.
    async fn apply(&mut self, action: AppAction) {
        match action {
            AppAction::SetDailyGoal { value } => {
                if value.is_zero() {
                    log::warn!("ignoring zero daily goal");
                    return;
                }
                self.update(|s| s.daily_goal = value);
                best_effort(
                    self.preferences.set_daily_goal(value).await,
                    "persisting daily goal",
                );
                // Refresh today's goal snapshot so the record reflects
                // the goal it is being measured against.
                let stored = self.today_day.borrow().clone();
                if let Some(mut day) = stored {
                    day.goal = value;
                    best_effort(
                        self.history.set_day(day).await,
                        "updating today's goal snapshot",
                    );
                }
            }

            AppAction::AddHydration { value } => {
                best_effort(
                    self.notifier.cancel_reminder().await,
                    "dismissing reminder notification",
                );
                let goal = self.state.borrow().daily_goal;
                let mut day = self
                    .today_day
                    .borrow()
                    .clone()
                    .unwrap_or_else(|| Day::new(self.today, goal));
                day.goal = goal;
                day.push_entry(HydrationEntry::new(value, Utc::now()));
                let total = day.total();
                best_effort(self.history.set_day(day).await, "persisting hydration");
                self.update(|s| s.today_hydration = total);
            }

            AppAction::RemoveHydration => {
                let stored = self.today_day.borrow().clone();
                let Some(mut day) = stored else {
                    return;
                };
                day.pop_latest();
                let total = day.total();
                let goal = day.goal;
                best_effort(self.history.set_day(day).await, "removing last hydration");
                self.update(|s| {
                    s.today_hydration = total;
                    // The stored goal snapshot wins after an undo.
                    s.daily_goal = goal;
                });
            }

            AppAction::SetReminder { value } => {
                match &value {
                    Some(reminder) => {
                        if let Err(e) = self.scheduler.set_alarm(reminder, Local::now()).await {
                            log::warn!("programming reminder alarms failed: {e}");
                        }
                    }
                    None => {
                        best_effort(self.scheduler.clear().await, "cancelling reminder alarms");
                    }
                }
                best_effort(
                    self.preferences.set_reminder(value).await,
                    "persisting reminder",
                );
                self.update(|s| s.reminder = value);
            }

            AppAction::RestartReminder => {
                let reminder = { *self.preferences.reminder().borrow() };
                if let Some(reminder) = reminder {
                    if let Err(e) = self.scheduler.set_alarm(&reminder, Local::now()).await {
                        log::warn!("restoring reminder alarms failed: {e}");
                    }
                }
            }

            AppAction::ShowReminderNotification { forced } => {
                let snapshot = self.state.borrow().clone();
                let warm = snapshot.temperature.unwrap_or(0.0) > 20.0;
                let active = snapshot.steps_record >= 2000;
                if !(forced || warm || active) {
                    return;
                }
                let today = self
                    .today_day
                    .borrow()
                    .as_ref()
                    .map(Day::total)
                    .unwrap_or(Milliliters::ZERO);
                let progress = Percent::of(today, snapshot.daily_goal);
                best_effort(
                    self.notifier
                        .show_reminder(
                            today,
                            progress,
                            &snapshot.selected_cups,
                            snapshot.liquid_unit,
                        )
                        .await,
                    "showing reminder notification",
                );
            }

            AppAction::SetTheme { value } => {
                best_effort(self.preferences.set_theme(value).await, "persisting theme");
                self.update(|s| s.theme = value);
            }

            AppAction::SetSelectedCups { value } => {
                best_effort(
                    self.preferences.set_selected_cups(value.clone()).await,
                    "persisting selected cups",
                );
                let unit = self.state.borrow().liquid_unit;
                self.update(|s| s.selected_cups = normalize_cups(value, unit));
            }

            AppAction::SetLiquidUnit { value } => {
                best_effort(
                    self.preferences.set_liquid_unit(value).await,
                    "persisting liquid unit",
                );
                self.refresh_cups();
            }

            AppAction::SetAppInForeground { value } => {
                self.update(|s| s.app_in_foreground = value);
            }

            AppAction::SetTemperature { value } => {
                self.update(|s| s.temperature = Some(value));
            }

            AppAction::SetStepsRecord { value } => {
                self.update(|s| s.steps_record = value);
            }

            AppAction::SetHeight { value } => {
                best_effort(
                    self.preferences.set_height(value.clone()).await,
                    "persisting height",
                );
                self.update(|s| s.height = Some(value));
            }

            AppAction::SetWeight { value } => {
                best_effort(
                    self.preferences.set_weight(value.clone()).await,
                    "persisting weight",
                );
                self.update(|s| s.weight = Some(value));
            }

            AppAction::DeleteAll => {
                // Cancel alarms while the reminder preference still
                // exists; clearing preferences first would orphan them.
                best_effort(self.scheduler.clear().await, "cancelling reminder alarms");
                best_effort(self.preferences.clear().await, "clearing preferences");
                best_effort(self.history.clear().await, "clearing hydration history");
                best_effort(self.notifier.clear().await, "clearing notifications");
                self.update(|s| {
                    s.daily_goal = Milliliters::DAILY_GOAL_DEFAULT;
                    s.today_hydration = Milliliters::ZERO;
                    s.reminder = None;
                    s.theme = Theme::default();
                    s.liquid_unit = LiquidUnit::default();
                    s.default_cups = default_cups(LiquidUnit::default());
                    s.selected_cups = default_selected_cups(LiquidUnit::default());
                    s.height = None;
                    s.weight = None;
                    s.hydration_chart_data.clear();
                });
            }

            AppAction::ResetToday => {
                let stored = self.today_day.borrow().clone();
                let Some(mut day) = stored else {
                    return;
                };
                day.clear_entries();
                best_effort(self.history.set_day(day).await, "resetting today");
                self.update(|s| s.today_hydration = Milliliters::ZERO);
            }

            AppAction::LoadChartData { range } => {
                let reference = Local::now().date_naive();
                let (start, end) = range_bounds(range, reference);
                match self
                    .history
                    .days_in_range(epoch_day(start), epoch_day(end), RANGE_QUERY_LIMIT)
                    .await
                {
                    Ok(days) => {
                        let series = aggregate(range, reference, &days);
                        self.update(|s| s.hydration_chart_data = series);
                    }
                    Err(e) => log::warn!("loading chart data failed: {e}"),
                }
            }
        }
    }
}
