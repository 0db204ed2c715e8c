use super::{default_plan_path, resolve_working_dir, state_dir, undo_path};
use crate::history::History;
use crate::output::{PendingPlan, StatusResult, UndoAvailable};
use crate::plan::load_plan;
use crate::undo::UndoRecord;
use anyhow::Result;
use std::path::Path;

/// Status operation - returns structured data
pub fn status_operation(working_dir: Option<&Path>) -> Result<StatusResult> {
    let current_dir = resolve_working_dir(working_dir)?;
    let quickren_dir = state_dir(&current_dir);

    let plan_path = default_plan_path(&quickren_dir);
    let pending_plan = if plan_path.exists() {
        let plan = load_plan(&plan_path)?;
        Some(PendingPlan {
            id: plan.id.clone(),
            pattern: plan.pattern.to_string(),
            created_at: plan.created_at.clone(),
            renames: plan.stats.total,
        })
    } else {
        None
    };

    let undo_available = UndoRecord::load(&undo_path(&quickren_dir))?
        .filter(|record| !record.is_empty())
        .map(|record| UndoAvailable {
            operations: record.len(),
            plan_id: record.plan_id,
            created_at: record.created_at,
        });

    let history = History::load(&quickren_dir)?;
    let last_operation = history
        .last_entry()
        .map(|e| format!("{} {} ({})", e.kind, e.plan_id, e.pattern));

    Ok(StatusResult {
        pending_plan,
        undo_available,
        history_count: history.len(),
        last_operation,
    })
}
