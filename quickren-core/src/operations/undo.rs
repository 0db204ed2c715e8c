use super::{resolve_working_dir, state_dir, undo_path};
use crate::apply::ApplyResult;
use crate::history::{History, HistoryEntry, HistoryKind, MAX_HISTORY_ENTRIES};
use crate::session::Session;
use crate::undo::UndoRecord;
use anyhow::Result;
use std::path::Path;

/// High-level undo operation - equivalent to `quickren undo`.
///
/// Reverses the last apply. Fails with `RenameError::UndoUnavailable` when
/// there is no live record. The record is consumed either way.
pub fn undo_operation(working_dir: Option<&Path>) -> Result<ApplyResult> {
    let current_dir = resolve_working_dir(working_dir)?;
    let quickren_dir = state_dir(&current_dir);
    let undo_file = undo_path(&quickren_dir);

    let record = UndoRecord::load(&undo_file)?;
    let mut session = Session::new()
        .with_log_dir(quickren_dir.join("logs"))
        .with_undo_record(record.clone());

    let result = session.undo()?;
    UndoRecord::clear(&undo_file)?;

    if let Some(record) = record {
        let mut history = History::load(&quickren_dir)?;
        let pattern = history
            .list_entries(None)
            .into_iter()
            .find(|e| e.kind == HistoryKind::Apply && e.plan_id == record.plan_id)
            .map(|e| e.pattern.clone());
        let mut entry = HistoryEntry::for_undo(&record, &result, pattern);
        entry.id = history.unique_id(&entry.id);
        history.add_entry(entry)?;
        history.prune(MAX_HISTORY_ENTRIES)?;
    }

    Ok(result)
}
