// --------------------------------------------------
// Handles API endpoints that read or mutate the planner state.
//
// Responsibilities:
// - Return the current snapshot
// - Create / update / delete tasks
// - Toggle task completion (points + medals)
//
// Operations on unknown ids are not errors: the unchanged
// snapshot is returned with no events.
// -------------------------------------------------

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::logic::{Command, Event};
use crate::models::{NewTask, PlannerState, Task, TaskType};
use crate::store::SharedStore;

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub state: PlannerState,
    pub events: Vec<Event>,
}

async fn run(store: &SharedStore, command: Command) -> MutationResponse {
    let mut store = store.lock().await;
    let events = store.dispatch(command);
    MutationResponse {
        state: store.state().clone(),
        events,
    }
}

// -----------------------------
// GET /api/state
// Returns the whole planner snapshot
// -----------------------------
#[instrument(level = "debug", skip_all)]
pub async fn get_state(State(store): State<SharedStore>) -> impl IntoResponse {
    let store = store.lock().await;
    Json(store.state().clone())
}

// -----------------------------
// POST /api/tasks
// Creates a task; points default from its type
// -----------------------------
#[instrument(level = "info", skip_all, fields(title = %input.title))]
pub async fn create_task(
    State(store): State<SharedStore>,
    Json(input): Json<NewTask>,
) -> impl IntoResponse {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let resp = run(&store, Command::AddTask(input)).await;
    info!(target: "http", tasks = resp.state.tasks.len(), "task created");
    Json(resp).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDateTime,
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub completed: bool,
    pub points: u32,
    #[serde(default)]
    pub color: Option<String>,
}

// -----------------------------
// PUT /api/tasks/:id
// Replaces an existing task in place
// -----------------------------
#[instrument(level = "info", skip(store, input))]
pub async fn update_task(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTaskInput>,
) -> impl IntoResponse {
    if input.title.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "title required").into_response();
    }

    let task = Task {
        id,
        title: input.title,
        description: input.description,
        date: input.date,
        kind: input.kind,
        completed: input.completed,
        points: input.points,
        color: input.color.or_else(|| Some(input.kind.color().to_string())),
    };

    Json(run(&store, Command::UpdateTask(task)).await).into_response()
}

// -----------------------------
// DELETE /api/tasks/:id
// Removes a task; credited points are kept
// -----------------------------
#[instrument(level = "info", skip(store))]
pub async fn delete_task(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    Json(run(&store, Command::DeleteTask(id)).await)
}

// -----------------------------
// POST /api/tasks/:id/toggle
// Flips completion and reports rewards / unlocked medals
// -----------------------------
#[instrument(level = "info", skip(store))]
pub async fn toggle_task(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let resp = run(&store, Command::ToggleTaskCompletion(id.clone())).await;
    info!(
        target: "http",
        completed = resp.state.task(&id).map(|t| t.completed),
        total_points = resp.state.total_points,
        events = resp.events.len(),
        "task toggled"
    );
    Json(resp)
}
