use crate::collision::CollisionResolver;
use crate::entry::FileEntry;
use crate::error::{FsErrorKind, RenameError};
use crate::fs::{write_json_atomic, FileSystem, OsFileSystem};
use crate::pattern::{NameGenerator, PatternDescriptor};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use ts_rs::TS;

pub const PLAN_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum OperationStatus {
    Pending,
    Applied,
    Failed,
    Skipped,
}

/// One planned rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RenameOperation {
    #[ts(type = "string")]
    pub source: PathBuf,
    #[ts(type = "string")]
    pub destination: PathBuf,
    pub status: OperationStatus,
    /// The collision resolver changed the proposed name
    #[serde(default)]
    pub adjusted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error_kind: Option<FsErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub error: Option<String>,
}

impl RenameOperation {
    pub fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            status: OperationStatus::Pending,
            adjusted: false,
            error_kind: None,
            error: None,
        }
    }

    /// Source and destination differ only in letter case
    pub fn is_case_only(&self) -> bool {
        self.source != self.destination
            && self.source.to_string_lossy().to_lowercase()
                == self.destination.to_string_lossy().to_lowercase()
    }

    /// The same rename in the opposite direction, ready to run again
    pub fn inverse(&self) -> Self {
        Self::new(self.destination.clone(), self.source.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlanStats {
    /// Number of rename operations in the plan
    pub total: usize,
    /// Operations whose name got a `_N` suffix
    pub collisions_resolved: usize,
    /// Selected files that already carry their target name
    pub unchanged: usize,
}

/// A previewable batch of renames.
///
/// Built once per preview and consumed by value when applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RenamePlan {
    pub id: String,
    pub created_at: String,
    pub version: String,
    pub pattern: PatternDescriptor,
    pub operations: Vec<RenameOperation>,
    pub stats: PlanStats,
    /// Files left out of the plan because the new name equals the old one
    #[serde(default)]
    #[ts(type = "Array<string>")]
    pub unchanged: Vec<PathBuf>,
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Some destination is still occupied by another source, or a rename only
    /// changes letter case, so sources must be moved aside first
    #[serde(default)]
    pub staging_required: bool,
    #[serde(default)]
    pub case_insensitive: bool,
}

impl RenamePlan {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Comparison key for a path under this plan's case rules
    pub fn path_key(&self, path: &Path) -> String {
        path_key(path, self.case_insensitive)
    }
}

pub(crate) fn path_key(path: &Path, case_insensitive: bool) -> String {
    let s = path.to_string_lossy();
    if case_insensitive {
        s.to_lowercase()
    } else {
        s.into_owned()
    }
}

/// Builds rename plans over a metadata snapshot.
///
/// Reads directory listings through the `FileSystem` to learn which names are
/// taken, and never writes.
pub struct PlanBuilder<'a, F: FileSystem> {
    fs: &'a F,
    now: DateTime<Local>,
    case_insensitive: Option<bool>,
}

impl<'a, F: FileSystem> PlanBuilder<'a, F> {
    pub fn new(fs: &'a F) -> Self {
        Self {
            fs,
            now: Local::now(),
            case_insensitive: None,
        }
    }

    /// Fix the clock used for date and time placeholders
    #[must_use]
    pub fn with_now(mut self, now: DateTime<Local>) -> Self {
        self.now = now;
        self
    }

    /// Override file-system case detection
    #[must_use]
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = Some(case_insensitive);
        self
    }

    pub fn build(
        &self,
        selection: &[FileEntry],
        descriptor: &PatternDescriptor,
    ) -> Result<RenamePlan, RenameError> {
        let generator = NameGenerator::new(descriptor, self.now)?;

        let mut proposed = Vec::with_capacity(selection.len());
        for (position, entry) in selection.iter().enumerate() {
            let name = generator.generate(entry, position + 1)?;
            proposed.push((entry.clone(), name));
        }

        let parents: BTreeSet<PathBuf> = selection
            .iter()
            .map(|entry| entry.parent().to_path_buf())
            .collect();
        let case_insensitive = self.case_insensitive.unwrap_or_else(|| {
            selection
                .first()
                .is_some_and(|entry| self.fs.is_case_insensitive(&entry.path))
        });

        let selected: HashSet<String> = selection
            .iter()
            .map(|entry| path_key(&entry.path, case_insensitive))
            .collect();

        let mut existing_untouched = Vec::new();
        for dir in &parents {
            let listing = self
                .fs
                .list_dir(dir)
                .map_err(|e| RenameError::from_io(dir, &e))?;
            existing_untouched.extend(
                listing
                    .into_iter()
                    .filter(|path| !selected.contains(&path_key(path, case_insensitive))),
            );
        }

        let mut resolver = CollisionResolver::new(existing_untouched, case_insensitive);
        let resolved = resolver.resolve(proposed)?;

        let mut operations = Vec::new();
        let mut unchanged = Vec::new();
        let mut collisions_resolved = 0;

        for item in resolved {
            let destination = item.destination();
            if destination == item.entry.path {
                unchanged.push(item.entry.path);
                continue;
            }
            if item.was_adjusted {
                collisions_resolved += 1;
            }
            let mut operation = RenameOperation::new(item.entry.path, destination);
            operation.adjusted = item.was_adjusted;
            operations.push(operation);
        }

        let sources: HashSet<String> = operations
            .iter()
            .map(|op| path_key(&op.source, case_insensitive))
            .collect();
        let staging_required = operations.iter().any(|op| {
            op.is_case_only() || sources.contains(&path_key(&op.destination, case_insensitive))
        });

        let stats = PlanStats {
            total: operations.len(),
            collisions_resolved,
            unchanged: unchanged.len(),
        };

        tracing::debug!(
            total = stats.total,
            collisions = stats.collisions_resolved,
            unchanged = stats.unchanged,
            "built rename plan"
        );

        Ok(RenamePlan {
            id: generate_plan_id(descriptor, selection, &self.now),
            created_at: self.now.to_rfc3339(),
            version: PLAN_VERSION.to_string(),
            pattern: descriptor.clone(),
            operations,
            stats,
            unchanged,
            warnings: generator.warnings().to_vec(),
            staging_required,
            case_insensitive,
        })
    }
}

/// Build a plan against the real file system using the current time
pub fn build_plan(
    selection: &[FileEntry],
    descriptor: &PatternDescriptor,
) -> Result<RenamePlan, RenameError> {
    PlanBuilder::new(&OsFileSystem).build(selection, descriptor)
}

fn generate_plan_id(
    descriptor: &PatternDescriptor,
    selection: &[FileEntry],
    now: &DateTime<Local>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{:?}", descriptor).as_bytes());
    for entry in selection {
        hasher.update(entry.path.to_string_lossy().as_bytes());
    }
    hasher.update(now.to_rfc3339().as_bytes());
    hasher.update(Local::now().timestamp_nanos_opt().unwrap_or_default().to_string().as_bytes());
    format!("{:x}", hasher.finalize())[..16].to_string()
}

pub fn write_plan(plan: &RenamePlan, path: &Path) -> Result<()> {
    write_json_atomic(plan, path)
        .with_context(|| format!("Failed to write plan file: {}", path.display()))
}

pub fn load_plan(path: &Path) -> Result<RenamePlan> {
    let file =
        File::open(path).with_context(|| format!("Failed to read plan from {}", path.display()))?;
    let plan = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse plan from {}", path.display()))?;
    Ok(plan)
}
