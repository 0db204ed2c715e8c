use crate::error::FsErrorKind;
use crate::fs::FileSystem;
use crate::plan::{path_key, OperationStatus, RenameOperation, RenamePlan};
use crate::selection::STAGING_PREFIX;
use crate::undo::UndoRecord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use ts_rs::TS;

/// One operation that could not be carried out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApplyFailure {
    /// The path the failure is about (the source, or the occupied destination)
    #[ts(type = "string")]
    pub path: PathBuf,
    pub kind: FsErrorKind,
    pub message: String,
}

/// Outcome of applying a plan or an undo record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApplyResult {
    pub plan_id: String,
    pub applied: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<ApplyFailure>,
    /// Every operation with its final status
    pub operations: Vec<RenameOperation>,
}

impl ApplyResult {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Timestamped per-plan log file
struct ApplyLog {
    file: Option<File>,
}

impl ApplyLog {
    fn open(path: Option<&Path>) -> Self {
        let file = path.and_then(|path| {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).ok()?;
            }
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not open apply log");
                    None
                },
            }
        });
        Self { file }
    }

    fn log(&mut self, message: &str) {
        tracing::debug!("{}", message);
        if let Some(ref mut file) = self.file {
            let written = writeln!(
                file,
                "[{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                message
            )
            .and_then(|()| file.flush());
            if let Err(e) = written {
                tracing::warn!(error = %e, "could not write apply log; continuing without it");
                self.file = None;
            }
        }
    }
}

/// Performs renames through a `FileSystem`, one operation at a time.
///
/// Each operation is re-validated right before it runs. A failure is recorded
/// on that operation and the rest of the batch carries on.
pub struct Executor<'a, F: FileSystem> {
    fs: &'a F,
    log_file: Option<PathBuf>,
}

impl<'a, F: FileSystem> Executor<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self { fs, log_file: None }
    }

    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Apply a plan. Returns the result and the undo record holding the
    /// inverse of every operation that succeeded.
    pub fn apply(&self, plan: RenamePlan) -> (ApplyResult, UndoRecord) {
        let mut log = ApplyLog::open(self.log_file.as_deref());
        log.log(&format!(
            "Applying plan {} ({} operations, pattern {})",
            plan.id,
            plan.operations.len(),
            plan.pattern
        ));

        let result = self.run(&plan.id, plan.operations, plan.case_insensitive, &mut log);
        let record = UndoRecord::from_applied(&result, plan.case_insensitive);

        log.log(&format!(
            "Finished plan {}: {} applied, {} failed, {} skipped",
            result.plan_id, result.applied, result.failed, result.skipped
        ));
        (result, record)
    }

    /// Run an undo record's inverse operations
    pub fn execute_undo(&self, record: UndoRecord) -> ApplyResult {
        let mut log = ApplyLog::open(self.log_file.as_deref());
        log.log(&format!(
            "Undoing plan {} ({} operations)",
            record.plan_id,
            record.operations.len()
        ));

        let result = self.run(
            &record.plan_id,
            record.operations,
            record.case_insensitive,
            &mut log,
        );

        log.log(&format!(
            "Finished undo of {}: {} restored, {} failed",
            result.plan_id, result.applied, result.failed
        ));
        result
    }

    fn run(
        &self,
        plan_id: &str,
        mut operations: Vec<RenameOperation>,
        case_insensitive: bool,
        log: &mut ApplyLog,
    ) -> ApplyResult {
        let mut result = ApplyResult {
            plan_id: plan_id.to_string(),
            applied: 0,
            failed: 0,
            skipped: 0,
            failures: Vec::new(),
            operations: Vec::new(),
        };

        for op in &mut operations {
            if op.status != OperationStatus::Pending {
                op.status = OperationStatus::Skipped;
                result.skipped += 1;
            }
        }

        let staged = self.stage_sources(plan_id, &mut operations, case_insensitive, &mut result, log);

        for (index, op) in operations.iter_mut().enumerate() {
            if op.status != OperationStatus::Pending {
                continue;
            }

            let staged_from = staged.get(&index);
            if staged_from.is_none() && !self.fs.exists(&op.source) {
                let path = op.source.clone();
                fail(op, &mut result, log, path, FsErrorKind::SourceMissing, "source no longer exists");
                continue;
            }

            if self.fs.exists(&op.destination) {
                let mut message = "destination already exists".to_string();
                if let Some(temp) = staged_from {
                    message.push_str(&self.restore(temp, &op.source));
                }
                let path = op.destination.clone();
                fail(op, &mut result, log, path, FsErrorKind::DestinationExists, &message);
                continue;
            }

            let from = staged_from.unwrap_or(&op.source);
            match self.fs.rename(from, &op.destination) {
                Ok(()) => {
                    op.status = OperationStatus::Applied;
                    result.applied += 1;
                    log.log(&format!(
                        "Renamed {} -> {}",
                        op.source.display(),
                        op.destination.display()
                    ));
                },
                Err(e) => {
                    let mut message = e.to_string();
                    if let Some(temp) = staged_from {
                        message.push_str(&self.restore(temp, &op.source));
                    }
                    let path = op.source.clone();
                    fail(op, &mut result, log, path, FsErrorKind::from_io(&e), &message);
                },
            }
        }

        result.operations = operations;
        result
    }

    /// Move aside every source that another operation wants as its
    /// destination, plus sources of case-only renames. Returns the staged
    /// location per operation index.
    fn stage_sources(
        &self,
        plan_id: &str,
        operations: &mut [RenameOperation],
        case_insensitive: bool,
        result: &mut ApplyResult,
        log: &mut ApplyLog,
    ) -> HashMap<usize, PathBuf> {
        let destinations: HashMap<String, usize> = operations
            .iter()
            .enumerate()
            .filter(|(_, op)| op.status == OperationStatus::Pending)
            .map(|(i, op)| (path_key(&op.destination, case_insensitive), i))
            .collect();

        let mut staged = HashMap::new();
        let mut reserved = HashSet::new();

        for (index, op) in operations.iter_mut().enumerate() {
            if op.status != OperationStatus::Pending {
                continue;
            }
            let wanted_by_other = destinations
                .get(&path_key(&op.source, case_insensitive))
                .is_some_and(|&other| other != index);
            if !wanted_by_other && !op.is_case_only() {
                continue;
            }

            if !self.fs.exists(&op.source) {
                let path = op.source.clone();
                fail(op, result, log, path, FsErrorKind::SourceMissing, "source no longer exists");
                continue;
            }

            let temp = self.staging_path(&op.source, plan_id, &reserved);
            match self.fs.rename(&op.source, &temp) {
                Ok(()) => {
                    log.log(&format!(
                        "Staged {} -> {}",
                        op.source.display(),
                        temp.display()
                    ));
                    reserved.insert(temp.clone());
                    staged.insert(index, temp);
                },
                Err(e) => {
                    let path = op.source.clone();
                    fail(op, result, log, path, FsErrorKind::from_io(&e), &e.to_string());
                },
            }
        }

        staged
    }

    /// A free hidden sibling name: `.quickren-{plan_id}-{n}.tmp`. The source
    /// name is left out so staging works next to names near the length limit.
    fn staging_path(&self, source: &Path, plan_id: &str, reserved: &HashSet<PathBuf>) -> PathBuf {
        let mut n = 1;
        loop {
            let candidate =
                source.with_file_name(format!("{}{}-{}.tmp", STAGING_PREFIX, plan_id, n));
            if !reserved.contains(&candidate) && !self.fs.exists(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Put a staged file back where it came from. Returns a note for the
    /// failure message.
    fn restore(&self, temp: &Path, source: &Path) -> String {
        match self.fs.rename(temp, source) {
            Ok(()) => String::new(),
            Err(e) => format!(
                "; could not restore staged file, it remains at {} ({})",
                temp.display(),
                e
            ),
        }
    }
}

fn fail(
    op: &mut RenameOperation,
    result: &mut ApplyResult,
    log: &mut ApplyLog,
    path: PathBuf,
    kind: FsErrorKind,
    message: &str,
) {
    op.status = OperationStatus::Failed;
    op.error_kind = Some(kind);
    op.error = Some(message.to_string());
    result.failed += 1;
    log.log(&format!(
        "Failed {} -> {}: {} ({})",
        op.source.display(),
        op.destination.display(),
        kind,
        message
    ));
    tracing::warn!(path = %path.display(), %kind, "rename failed");
    result.failures.push(ApplyFailure {
        path,
        kind,
        message: message.to_string(),
    });
}
