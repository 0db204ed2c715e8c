use super::{resolve_working_dir, state_dir};
use crate::history::History;
use crate::output::HistoryResult;
use anyhow::Result;
use std::path::Path;

/// History operation - most recent entries first
pub fn history_operation(limit: Option<usize>, working_dir: Option<&Path>) -> Result<HistoryResult> {
    let current_dir = resolve_working_dir(working_dir)?;
    let history = History::load(&state_dir(&current_dir))?;

    let entries = history
        .list_entries(limit)
        .into_iter()
        .cloned()
        .collect();

    Ok(HistoryResult { entries })
}
