/*
Planner reducer and derived-field recomputation.
Module is independent from HTTP / Axum and from the filesystem so every
transition can be tested with a fixed clock.
*/

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::models::{NewTask, PlannerState, Task, WeeklyProgress};
use crate::views::level_for;

// Number of days (ending today) inspected when computing the streak
pub const STREAK_WINDOW_DAYS: i64 = 30;

// One mutation of the planner state
#[derive(Debug, Clone)]
pub enum Command {
    AddTask(NewTask),
    UpdateTask(Task),
    DeleteTask(String),
    ToggleTaskCompletion(String),
}

// Side effects a UI wants to react to (reward toast, medal celebration)
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    #[serde(rename_all = "camelCase")]
    TaskAdded { task_id: String },
    #[serde(rename_all = "camelCase")]
    TaskCompleted { task_id: String, points: u32 },
    #[serde(rename_all = "camelCase")]
    MedalUnlocked { medal_id: String, title: String },
    #[serde(rename_all = "camelCase")]
    LevelUp { from: u32, to: u32, title: String },
}

// Result of applying one command
#[derive(Debug, Clone)]
pub struct Outcome {
    pub state: PlannerState,
    pub changed: bool,      // false when the command targeted an unknown id
    pub events: Vec<Event>,
}

/// Apply a command and, if anything changed, recompute weekly progress and
/// the streak as of `now`.
///
/// Operations on unknown ids return the state untouched with `changed = false`.
pub fn apply(state: PlannerState, command: Command, now: DateTime<FixedOffset>) -> Outcome {
    let mut state = state;
    let mut events = Vec::new();

    let changed = match command {
        Command::AddTask(new_task) => {
            let task = new_task.into_task(Uuid::new_v4().to_string());
            events.push(Event::TaskAdded { task_id: task.id.clone() });
            state.tasks.push(task);
            true
        }
        Command::UpdateTask(task) => match state.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => {
                *existing = task;
                true
            }
            None => false,
        },
        Command::DeleteTask(id) => {
            // Points of a completed task stay credited.
            let before = state.tasks.len();
            state.tasks.retain(|t| t.id != id);
            state.tasks.len() != before
        }
        Command::ToggleTaskCompletion(id) => toggle_completion(&mut state, &id, now, &mut events),
    };

    if changed {
        recompute_derived(&mut state, now);
    }

    Outcome { state, changed, events }
}

// Flip `completed`, adjust total points, then unlock medals.
fn toggle_completion(
    state: &mut PlannerState,
    id: &str,
    now: DateTime<FixedOffset>,
    events: &mut Vec<Event>,
) -> bool {
    let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
        return false;
    };
    let level_before = level_for(state.total_points).level;

    task.completed = !task.completed;
    if task.completed {
        state.total_points = state.total_points.saturating_add(task.points);
        events.push(Event::TaskCompleted {
            task_id: task.id.clone(),
            points: task.points,
        });
    } else {
        // clamp at 0
        state.total_points = state.total_points.saturating_sub(task.points);
    }

    unlock_medals(state, now.with_timezone(&Utc), events);

    // Only a rise is celebrated; dropping back a band is silent.
    let level = level_for(state.total_points);
    if level.level > level_before {
        events.push(Event::LevelUp {
            from: level_before,
            to: level.level,
            title: level.title.to_string(),
        });
    }
    true
}

// Unlocks are one-way: medals already unlocked are never looked at again.
fn unlock_medals(state: &mut PlannerState, at: DateTime<Utc>, events: &mut Vec<Event>) {
    let total = state.total_points;
    for medal in state.medals.iter_mut().filter(|m| !m.unlocked) {
        if medal.required_points <= total {
            medal.unlocked = true;
            medal.unlocked_date = Some(at);
            debug!(target: "planner", medal = %medal.id, total, "medal unlocked");
            events.push(Event::MedalUnlocked {
                medal_id: medal.id.clone(),
                title: medal.title.clone(),
            });
        }
    }
}

pub fn recompute_derived(state: &mut PlannerState, now: DateTime<FixedOffset>) {
    let today = now.date_naive();
    update_weekly_progress(state, today);
    update_streak(state, today);
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

// Aggregate tasks scheduled in [start, start + 7 days)
pub fn week_progress(tasks: &[Task], start: NaiveDate) -> WeeklyProgress {
    let end = start + Duration::days(7);
    let mut wp = WeeklyProgress {
        week_start_date: start,
        tasks_completed: 0,
        total_tasks: 0,
        points_earned: 0,
    };

    for t in tasks.iter().filter(|t| {
        let d = t.date.date();
        d >= start && d < end
    }) {
        wp.total_tasks = wp.total_tasks.saturating_add(1);
        if t.completed {
            wp.tasks_completed = wp.tasks_completed.saturating_add(1);
            wp.points_earned = wp.points_earned.saturating_add(t.points);
        }
    }

    wp
}

// Upsert the entry for the current week
fn update_weekly_progress(state: &mut PlannerState, today: NaiveDate) {
    let current = week_progress(&state.tasks, week_start(today));

    match state
        .weekly_progress
        .iter_mut()
        .find(|p| p.week_start_date == current.week_start_date)
    {
        Some(existing) => *existing = current,
        None => state.weekly_progress.push(current),
    }
}

/// Count consecutive days with at least one completed task, walking back
/// from `today`.
///
/// A missing day at offset 0 is skipped rather than ending the streak, so a
/// run that ended yesterday is still reported until the day is over.
pub fn current_streak(tasks: &[Task], today: NaiveDate) -> u32 {
    let mut streak = 0;

    for offset in 0..STREAK_WINDOW_DAYS {
        let day = today - Duration::days(offset);
        let has_completed = tasks.iter().any(|t| t.completed && t.date.date() == day);

        if has_completed {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }

    streak
}

fn update_streak(state: &mut PlannerState, today: NaiveDate) {
    state.current_streak = current_streak(&state.tasks, today);
    state.best_streak = state.best_streak.max(state.current_streak);
}
