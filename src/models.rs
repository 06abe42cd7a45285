use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Task,
    Exam,
    Assignment,
}

impl TaskType {
    // Reward used when the caller does not pick one
    pub fn default_points(self) -> u32 {
        match self {
            TaskType::Exam => 50,
            TaskType::Assignment => 30,
            TaskType::Task => 10,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TaskType::Exam => "#ef4444",
            TaskType::Assignment => "#f59e0b",
            TaskType::Task => "#3b82f6",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDateTime, // local time, no offset
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub completed: bool,
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

// Task payload before an id is assigned
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDateTime,
    #[serde(rename = "type")]
    pub kind: TaskType,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub points: Option<u32>, // defaults from `kind`
    #[serde(default)]
    pub color: Option<String>,
}

impl NewTask {
    pub fn into_task(self, id: String) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            kind: self.kind,
            completed: self.completed,
            points: self.points.unwrap_or_else(|| self.kind.default_points()),
            color: self.color.or_else(|| Some(self.kind.color().to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Medal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub required_points: u32,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub week_start_date: NaiveDate,
    pub tasks_completed: u32,
    pub total_tasks: u32,
    pub points_earned: u32,
}

/// Whole planner snapshot. This is exactly what gets persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlannerState {
    pub tasks: Vec<Task>,
    pub medals: Vec<Medal>,
    pub total_points: u32,
    pub weekly_progress: Vec<WeeklyProgress>,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl Default for PlannerState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            medals: initial_medals(),
            total_points: 0,
            weekly_progress: Vec::new(),
            current_streak: 0,
            best_streak: 0,
        }
    }
}

impl PlannerState {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// The fixed medal catalog, in display order.
pub fn initial_medals() -> Vec<Medal> {
    const CATALOG: [(&str, &str, &str, &str, u32); 6] = [
        ("1", "Primer Paso", "Completa tu primera tarea", "🎯", 10),
        ("2", "Semana Productiva", "Completa 5 tareas en una semana", "📅", 50),
        ("3", "Estudiante Dedicado", "Mantén una racha de 7 días", "🔥", 100),
        ("4", "Maestro del Tiempo", "Completa 20 tareas", "⏰", 200),
        ("5", "Excelencia Académica", "Completa 10 exámenes", "🏆", 500),
        ("6", "Leyenda UniPlanner", "Alcanza 1000 puntos", "👑", 1000),
    ];

    CATALOG
        .iter()
        .map(|(id, title, description, icon, required)| Medal {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            required_points: *required,
            unlocked: false,
            unlocked_date: None,
        })
        .collect()
}
