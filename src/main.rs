// Define data modules
mod config;          // Server configuration (TOML + env)
mod error;           // Store / config error types
mod logic;           // Planner reducer and derived fields
mod models;          // Data structures (Task, Medal, PlannerState, etc.)
mod routes_progress; // HTTP handlers for progress / medals / agenda views
mod routes_tasks;    // HTTP handlers for state & task mutations
mod store;           // Snapshot persistence and the owning store
mod telemetry;       // Tracing subscriber setup
mod views;           // Read-only views over a snapshot

use std::{path::Path, sync::Arc};

// Import axum routing utilities and Router
use axum::{
    routing::{get, post, put}, // HTTP method helpers
    Router,                    // Main router type
};
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::store::{snapshot_path, PlannerStore, SharedStore};

pub fn build_router(store: SharedStore, static_dir: &Path) -> Router {
    let api = Router::new()
        // snapshot
        .route("/state", get(routes_tasks::get_state))
        // tasks
        .route("/tasks", post(routes_tasks::create_task))
        .route("/tasks/:id", put(routes_tasks::update_task).delete(routes_tasks::delete_task))
        .route("/tasks/:id/toggle", post(routes_tasks::toggle_task))
        // read-only views
        .route("/progress", get(routes_progress::get_progress))
        .route("/medals", get(routes_progress::get_medals))
        .route("/agenda", get(routes_progress::get_agenda))
        .with_state(store);

    Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let cfg = Config::load()?;
    let addr = cfg.socket_addr()?;

    let mut store = PlannerStore::open(snapshot_path(&cfg.data_dir));
    // streak and weekly progress depend on today's date
    store.refresh();
    info!(target: "uniplanner", path = %store.path().display(), "planner store ready");

    let app = build_router(Arc::new(Mutex::new(store)), &cfg.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(target: "uniplanner", %addr, static_dir = %cfg.static_dir.display(), "server running");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(dir: &tempfile::TempDir) -> Router {
        let store = PlannerStore::open(snapshot_path(dir.path()));
        build_router(Arc::new(Mutex::new(store)), dir.path())
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn create_then_toggle_awards_points_and_medal() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (status, body) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Quiz", "date": "2025-03-12T09:00:00", "type": "task" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["events"][0]["kind"], "task_added");
        let id = body["state"]["tasks"][0]["id"].as_str().unwrap().to_string();
        assert_eq!(body["state"]["tasks"][0]["points"], 10);

        let (status, body) = send(&app, "POST", &format!("/api/tasks/{id}/toggle"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["totalPoints"], 10);
        assert_eq!(body["state"]["medals"][0]["unlocked"], true);
        let kinds: Vec<_> = body["events"].as_array().unwrap().iter().map(|e| e["kind"].clone()).collect();
        assert_eq!(kinds, vec![json!("task_completed"), json!("medal_unlocked")]);
        assert_eq!(body["events"][0]["points"], 10);

        let (_, medals) = send(&app, "GET", "/api/medals", None).await;
        assert_eq!(medals["unlocked"], 1);
        assert_eq!(medals["next"]["pointsNeeded"], 40);
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (status, _) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({ "title": "  ", "date": "2025-03-12T09:00:00", "type": "exam" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, state) = send(&app, "GET", "/api/state", None).await;
        assert_eq!(state["tasks"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unknown_id_returns_unchanged_state() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (status, body) = send(&app, "POST", "/api/tasks/nope/toggle", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["totalPoints"], 0);
        assert_eq!(body["events"].as_array().unwrap().len(), 0);

        let (status, body) = send(&app, "DELETE", "/api/tasks/nope", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["tasks"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn update_uses_path_id() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (_, body) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Ensayo", "date": "2025-03-12T09:00:00", "type": "assignment" })),
        )
        .await;
        let id = body["state"]["tasks"][0]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/tasks/{id}"),
            Some(json!({
                "title": "Ensayo final",
                "date": "2025-03-14T10:30:00",
                "type": "exam",
                "completed": false,
                "points": 30
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let task = &body["state"]["tasks"][0];
        assert_eq!(task["id"], id.as_str());
        assert_eq!(task["title"], "Ensayo final");
        assert_eq!(task["points"], 30);
        assert_eq!(task["color"], "#ef4444");
    }

    #[tokio::test]
    async fn progress_view_reports_level() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (status, body) = send(&app, "GET", "/api/progress", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["level"]["level"], 1);
        assert_eq!(body["days"].as_array().unwrap().len(), 7);
        assert_eq!(body["overview"]["totalPoints"], 0);
        assert_eq!(body["challenges"].as_array().unwrap().len(), 3);
        assert_eq!(body["challenges"][0]["title"], "Completa 3 tareas");

        let (_, medals) = send(&app, "GET", "/api/medals", None).await;
        assert_eq!(medals["tiers"][0]["name"], "Bronce");
        assert_eq!(medals["tiers"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_unknown_id_returns_unchanged_state() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (_, created) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Lectura", "date": "2025-03-12T09:00:00", "type": "task" })),
        )
        .await;

        let (status, body) = send(
            &app,
            "PUT",
            "/api/tasks/does-not-exist",
            Some(json!({
                "title": "Otra",
                "date": "2025-03-13T09:00:00",
                "type": "exam",
                "completed": true,
                "points": 50
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["events"].as_array().unwrap().len(), 0);
        assert_eq!(body["state"], created["state"]);

        let (_, state) = send(&app, "GET", "/api/state", None).await;
        assert_eq!(state, created["state"]);
    }

    #[tokio::test]
    async fn crossing_a_level_band_reports_level_up() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);

        let (_, body) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({ "title": "Final", "date": "2025-03-12T09:00:00", "type": "exam", "points": 120 })),
        )
        .await;
        let id = body["state"]["tasks"][0]["id"].as_str().unwrap().to_string();

        let (_, body) = send(&app, "POST", &format!("/api/tasks/{id}/toggle"), None).await;
        let level_up = body["events"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["kind"] == "level_up")
            .cloned()
            .unwrap();
        assert_eq!(level_up["from"], 1);
        assert_eq!(level_up["to"], 2);
        assert_eq!(level_up["title"], "Aprendiz");
    }
}
