// --------------------------------------------------
// Handles read-only API endpoints built from the snapshot.
//
// Responsibilities:
// - Weekly / daily progress, level and daily challenges
// - Medal progress grouped by tier
// - Agenda split into past / today / upcoming
// -------------------------------------------------

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::store::{now_fixed_offset, SharedStore};
use crate::views::{
    self, Agenda, DailyChallenge, DayProgress, LevelProgress, MedalSummary, Overview, WeekSummary,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub now: String,
    pub week: WeekSummary,
    pub days: Vec<DayProgress>,
    pub level: LevelProgress,
    pub challenges: Vec<DailyChallenge>,
    pub overview: Overview,
}

// -----------------------------
// GET /api/progress
// Current week, level and dashboard challenges
// -----------------------------
#[instrument(level = "debug", skip_all)]
pub async fn get_progress(State(store): State<SharedStore>) -> impl IntoResponse {
    let now = now_fixed_offset();
    let today = now.date_naive();
    let store = store.lock().await;
    let state = store.state();

    let level = views::level_for(state.total_points);
    debug!(target: "http", level = level.level, total_points = state.total_points, "progress served");

    Json(ProgressResponse {
        now: now.to_rfc3339(),
        week: views::week_summary(&state.tasks, today),
        days: views::daily_breakdown(&state.tasks, today),
        level,
        challenges: views::daily_challenges(state),
        overview: views::overview(state),
    })
}

// -----------------------------
// GET /api/medals
// Per-medal progress, tiers and the next medal to unlock
// -----------------------------
#[instrument(level = "debug", skip_all)]
pub async fn get_medals(State(store): State<SharedStore>) -> impl IntoResponse {
    let store = store.lock().await;
    let summary: MedalSummary = views::medal_summary(store.state());
    Json(summary)
}

// -----------------------------
// GET /api/agenda
// Tasks sorted by date, bucketed around today
// -----------------------------
#[instrument(level = "debug", skip_all)]
pub async fn get_agenda(State(store): State<SharedStore>) -> impl IntoResponse {
    let today = now_fixed_offset().date_naive();
    let store = store.lock().await;
    let agenda: Agenda = views::agenda(&store.state().tasks, today);
    debug!(target: "http", %today, "agenda served");
    Json(agenda)
}
