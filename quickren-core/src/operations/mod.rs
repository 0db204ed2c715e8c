//! High-level operations that correspond to CLI commands
//!
//! Each operation owns the `.quickren/` state directory under its working
//! directory, separated from CLI concerns like argument parsing and output.

pub mod apply;
pub mod history;
pub mod list;
pub mod plan;
pub mod rename;
pub mod status;
pub mod undo;

pub use apply::apply_operation;
pub use history::history_operation;
pub use list::list_operation;
pub use plan::{plan_operation, PlanRequest};
pub use rename::{rename_operation, RenameOutcome};
pub use status::status_operation;
pub use undo::undo_operation;

use crate::apply::ApplyResult;
use crate::history::{History, HistoryEntry, MAX_HISTORY_ENTRIES};
use crate::plan::RenamePlan;
use crate::selection::{SelectionOptions, STATE_DIR_NAME};
use crate::session::Session;
use crate::undo::UndoRecord;
use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

pub(crate) fn resolve_working_dir(working_dir: Option<&Path>) -> Result<PathBuf> {
    match working_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}

/// Selection with its root resolved against the working directory
pub(crate) fn resolve_selection(selection: &SelectionOptions, working_dir: &Path) -> SelectionOptions {
    let mut selection = selection.clone();
    // `.` segments would otherwise leak into every planned path
    selection.root = working_dir
        .join(&selection.root)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    selection
}

pub fn state_dir(working_dir: &Path) -> PathBuf {
    working_dir.join(STATE_DIR_NAME)
}

pub(crate) fn undo_path(state_dir: &Path) -> PathBuf {
    state_dir.join("undo.json")
}

pub(crate) fn default_plan_path(state_dir: &Path) -> PathBuf {
    state_dir.join("plan.json")
}

/// Apply a plan, persist its undo record and append to history
pub(crate) fn execute_plan(plan: RenamePlan, state_dir: &Path) -> Result<ApplyResult> {
    let pattern = plan.pattern.to_string();
    let mut session = Session::new().with_log_dir(state_dir.join("logs"));

    let result = session.apply(plan);

    let undo_file = undo_path(state_dir);
    match session.undo_record() {
        Some(record) => record.save(&undo_file)?,
        None => UndoRecord::clear(&undo_file)?,
    }

    let mut history = History::load(state_dir)?;
    let mut entry = HistoryEntry::for_apply(pattern, &result);
    entry.id = history.unique_id(&entry.id);
    history.add_entry(entry)?;
    history.prune(MAX_HISTORY_ENTRIES)?;

    Ok(result)
}
