use crate::apply::{ApplyResult, Executor};
use crate::error::RenameError;
use crate::fs::{FileSystem, OsFileSystem};
use crate::plan::RenamePlan;
use crate::undo::UndoRecord;
use std::path::PathBuf;

/// Apply/undo state for one user session.
///
/// Holds at most one undo record. Applying a new plan replaces it, and
/// undoing consumes it.
#[derive(Debug)]
pub struct Session<F: FileSystem = OsFileSystem> {
    fs: F,
    undo: Option<UndoRecord>,
    log_dir: Option<PathBuf>,
}

impl Session<OsFileSystem> {
    pub fn new() -> Self {
        Self::with_fs(OsFileSystem)
    }
}

impl Default for Session<OsFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FileSystem> Session<F> {
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            undo: None,
            log_dir: None,
        }
    }

    /// Write `{plan_id}.log` files into `dir`
    #[must_use]
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Resume with a record saved by an earlier process
    #[must_use]
    pub fn with_undo_record(mut self, record: Option<UndoRecord>) -> Self {
        self.undo = record.filter(|r| !r.is_empty());
        self
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    pub fn undo_record(&self) -> Option<&UndoRecord> {
        self.undo.as_ref()
    }

    fn executor(&self, plan_id: &str) -> Executor<'_, F> {
        let executor = Executor::new(&self.fs);
        match &self.log_dir {
            Some(dir) => executor.with_log_file(dir.join(format!("{}.log", plan_id))),
            None => executor,
        }
    }

    /// Apply a plan, replacing any previous undo record
    pub fn apply(&mut self, plan: RenamePlan) -> ApplyResult {
        let (result, record) = self.executor(&plan.id).apply(plan);
        self.undo = if record.is_empty() { None } else { Some(record) };
        result
    }

    /// Reverse the last apply. The record is cleared even when some
    /// individual restores fail.
    pub fn undo(&mut self) -> Result<ApplyResult, RenameError> {
        let record = self.undo.take().ok_or(RenameError::UndoUnavailable)?;
        let result = self.executor(&record.plan_id).execute_undo(record);
        Ok(result)
    }
}
