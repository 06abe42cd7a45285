use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, FixedOffset};
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::logic::{self, Command, Event};
use crate::models::PlannerState;

// Fixed storage key; the snapshot file is `<data_dir>/uniplannerState.json`
pub const STATE_KEY: &str = "uniplannerState";

// Handle shared with the HTTP layer; the mutex serializes commands
pub type SharedStore = Arc<Mutex<PlannerStore>>;

pub fn snapshot_path(data_dir: &Path) -> PathBuf {
    data_dir.join(format!("{STATE_KEY}.json"))
}

pub fn load_snapshot(path: &Path) -> Result<Option<PlannerState>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    let state: PlannerState = serde_json::from_str(&text)?;
    Ok(Some(state))
}

pub fn save_snapshot(path: &Path, state: &PlannerState) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let text = serde_json::to_string_pretty(state)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&tmp_path, text)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

// Local -> FixedOffset (current system offset)
pub fn now_fixed_offset() -> DateTime<FixedOffset> {
    chrono::Local::now().fixed_offset()
}

/// Sole owner of the planner state and of its snapshot file.
///
/// Every command runs to completion, including the write, before the next one
/// is accepted. Persistence problems are logged, never returned: callers only
/// ever see the resulting state.
#[derive(Debug)]
pub struct PlannerStore {
    path: PathBuf,
    state: PlannerState,
}

impl PlannerStore {
    /// Open the store, restoring the last snapshot when one parses.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn open(path: PathBuf) -> Self {
        let state = match load_snapshot(&path) {
            Ok(Some(state)) => {
                info!(target: "store", tasks = state.tasks.len(), "restored planner snapshot");
                state
            }
            Ok(None) => PlannerState::default(),
            Err(e) => {
                error!(target: "store", error = %e, "error loading saved state, starting empty");
                PlannerState::default()
            }
        };

        Self { path, state }
    }

    pub fn state(&self) -> &PlannerState {
        &self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dispatch(&mut self, command: Command) -> Vec<Event> {
        self.dispatch_at(command, now_fixed_offset())
    }

    /// Same as [`dispatch`](Self::dispatch) with an explicit clock.
    ///
    /// The command runs against a copy; `self.state` is only replaced once
    /// `apply` has returned, so a panic inside it leaves the store intact.
    pub fn dispatch_at(&mut self, command: Command, now: DateTime<FixedOffset>) -> Vec<Event> {
        let outcome = logic::apply(self.state.clone(), command, now);
        self.state = outcome.state;

        if outcome.changed {
            self.persist();
        }
        outcome.events
    }

    // Refresh streak / weekly progress against the current date, e.g. after a
    // restore on a later day.
    pub fn refresh(&mut self) {
        logic::recompute_derived(&mut self.state, now_fixed_offset());
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = save_snapshot(&self.path, &self.state) {
            error!(target: "store", path = %self.path.display(), error = %e, "failed to save planner snapshot");
        }
    }
}
