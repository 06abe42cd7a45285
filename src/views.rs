// --------------------------------------------------
// Read-only views over a planner snapshot.
//
// These back the agenda, progress and medal screens; none of them
// mutates state.
// --------------------------------------------------

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::logic::{week_progress, week_start};
use crate::models::{Medal, PlannerState, Task};

// (level, title, min points); each band ends where the next begins
const LEVELS: [(u32, &str, u32); 6] = [
    (1, "Novato", 0),
    (2, "Aprendiz", 100),
    (3, "Estudiante", 250),
    (4, "Académico", 500),
    (5, "Maestro", 1000),
    (6, "Leyenda", 2000),
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    pub title: &'static str,
    pub min_points: u32,
    pub next_level_points: Option<u32>, // None at the top level
    pub points_to_next: Option<u32>,
    pub progress_pct: f64, // 0..=100 within the current band
}

pub fn level_for(points: u32) -> LevelProgress {
    let idx = LEVELS
        .iter()
        .rposition(|(_, _, min)| points >= *min)
        .unwrap_or(0);
    let (level, title, min_points) = LEVELS[idx];

    match LEVELS.get(idx + 1) {
        Some(&(_, _, next_min)) => LevelProgress {
            level,
            title,
            min_points,
            next_level_points: Some(next_min),
            points_to_next: Some(next_min - points),
            progress_pct: (points - min_points) as f64 / (next_min - min_points) as f64 * 100.0,
        },
        None => LevelProgress {
            level,
            title,
            min_points,
            next_level_points: None,
            points_to_next: None,
            progress_pct: 100.0,
        },
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayProgress {
    pub date: NaiveDate,
    pub total: u32,
    pub completed: u32,
    pub points: u32,
}

// Monday..Sunday of the week containing `today`
pub fn daily_breakdown(tasks: &[Task], today: NaiveDate) -> Vec<DayProgress> {
    let start = week_start(today);

    (0..7)
        .map(|i| {
            let date = start + Duration::days(i);
            let mut day = DayProgress { date, total: 0, completed: 0, points: 0 };
            for t in tasks.iter().filter(|t| t.date.date() == date) {
                day.total = day.total.saturating_add(1);
                if t.completed {
                    day.completed = day.completed.saturating_add(1);
                    day.points = day.points.saturating_add(t.points);
                }
            }
            day
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub week_start_date: NaiveDate,
    pub total_tasks: u32,
    pub tasks_completed: u32,
    pub completion_pct: f64,
    pub points_earned: u32,
}

pub fn week_summary(tasks: &[Task], today: NaiveDate) -> WeekSummary {
    let wp = week_progress(tasks, week_start(today));
    let completion_pct = if wp.total_tasks > 0 {
        wp.tasks_completed as f64 / wp.total_tasks as f64 * 100.0
    } else {
        0.0
    };

    WeekSummary {
        week_start_date: wp.week_start_date,
        total_tasks: wp.total_tasks,
        tasks_completed: wp.tasks_completed,
        completion_pct,
        points_earned: wp.points_earned,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedalProgress {
    #[serde(flatten)]
    pub medal: Medal,
    pub progress_pct: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NextMedal {
    pub id: String,
    pub title: String,
    pub points_needed: u32,
}

// Catalog order, two medals per tier
const MEDAL_TIERS: [&str; 3] = ["Bronce", "Plata", "Oro"];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MedalTier {
    pub name: &'static str,
    pub medal_ids: Vec<String>,
    pub unlocked: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedalSummary {
    pub unlocked: usize,
    pub total: usize,
    pub medals: Vec<MedalProgress>,
    pub tiers: Vec<MedalTier>,
    pub next: Option<NextMedal>,
}

pub fn medal_tiers(medals: &[Medal]) -> Vec<MedalTier> {
    MEDAL_TIERS
        .iter()
        .zip(medals.chunks(2))
        .map(|(&name, group)| MedalTier {
            name,
            medal_ids: group.iter().map(|m| m.id.clone()).collect(),
            unlocked: group.iter().filter(|m| m.unlocked).count(),
        })
        .collect()
}

pub fn medal_summary(state: &PlannerState) -> MedalSummary {
    let points = state.total_points;

    let medals = state
        .medals
        .iter()
        .map(|m| {
            let pct = if m.required_points == 0 {
                100.0
            } else {
                (points as f64 / m.required_points as f64 * 100.0).min(100.0)
            };
            MedalProgress { medal: m.clone(), progress_pct: pct }
        })
        .collect();

    // first locked medal in catalog order
    let next = state.medals.iter().find(|m| !m.unlocked).map(|m| NextMedal {
        id: m.id.clone(),
        title: m.title.clone(),
        points_needed: m.required_points.saturating_sub(points),
    });

    MedalSummary {
        unlocked: state.medals.iter().filter(|m| m.unlocked).count(),
        total: state.medals.len(),
        medals,
        tiers: medal_tiers(&state.medals),
        next,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Agenda {
    pub past: Vec<Task>,
    pub today: Vec<Task>,
    pub upcoming: Vec<Task>,
}

/// Split tasks by calendar day relative to `today`, each bucket sorted by date.
pub fn agenda(tasks: &[Task], today: NaiveDate) -> Agenda {
    let mut sorted = tasks.to_vec();
    // stable: equal timestamps keep insertion order
    sorted.sort_by_key(|t| t.date);

    let mut agenda = Agenda { past: Vec::new(), today: Vec::new(), upcoming: Vec::new() };
    for t in sorted {
        let d = t.date.date();
        if d < today {
            agenda.past.push(t);
        } else if d == today {
            agenda.today.push(t);
        } else {
            agenda.upcoming.push(t);
        }
    }
    agenda
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_points: u32,
    pub completed_tasks: usize,
    pub unlocked_medals: usize,
    pub current_streak: u32,
    pub best_streak: u32,
}

pub fn overview(state: &PlannerState) -> Overview {
    Overview {
        total_points: state.total_points,
        completed_tasks: state.tasks.iter().filter(|t| t.completed).count(),
        unlocked_medals: state.medals.iter().filter(|m| m.unlocked).count(),
        current_streak: state.current_streak,
        best_streak: state.best_streak,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyChallenge {
    pub id: u32,
    pub title: &'static str,
    pub progress: u32,
    pub total: u32,
    pub reward: u32,
    pub completed: bool,
}

fn challenge(id: u32, title: &'static str, progress: u32, total: u32, reward: u32) -> DailyChallenge {
    let progress = progress.min(total);
    DailyChallenge { id, title, progress, total, reward, completed: progress >= total }
}

/// Challenges shown on the dashboard. Rewards are informational; they are
/// never credited to `total_points`.
pub fn daily_challenges(state: &PlannerState) -> Vec<DailyChallenge> {
    let completed = state.tasks.iter().filter(|t| t.completed).count();
    let completed = u32::try_from(completed).unwrap_or(u32::MAX);

    vec![
        challenge(1, "Completa 3 tareas", completed, 3, 50),
        // no study-time tracking yet, so this one never advances
        challenge(2, "Estudia 2 horas", 0, 2, 30),
        challenge(3, "Mantén tu racha", u32::from(state.current_streak > 0), 1, 20),
    ]
}
