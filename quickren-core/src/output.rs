use crate::apply::{ApplyFailure, ApplyResult};
use crate::entry::{FileCategory, FileEntry};
use crate::history::HistoryEntry;
use crate::plan::RenamePlan;
use pluralizer::pluralize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

fn count(n: usize, word: &str) -> String {
    pluralize(word, isize::try_from(n).unwrap_or(isize::MAX), true)
}

fn write_failures(output: &mut String, failures: &[ApplyFailure]) {
    for failure in failures {
        writeln!(
            output,
            "✗ {} ({}): {}",
            failure.path.display(),
            failure.kind,
            failure.message
        )
        .unwrap();
    }
}

/// Result of a plan operation
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResult {
    pub plan_id: String,
    pub pattern: String,
    pub renames: usize,
    pub collisions_resolved: usize,
    pub unchanged: usize,
    pub warnings: Vec<String>,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<RenamePlan>,
}

impl PlanResult {
    pub fn from_plan(plan: RenamePlan, dry_run: bool, include_plan: bool) -> Self {
        Self {
            plan_id: plan.id.clone(),
            pattern: plan.pattern.to_string(),
            renames: plan.stats.total,
            collisions_resolved: plan.stats.collisions_resolved,
            unchanged: plan.stats.unchanged,
            warnings: plan.warnings.clone(),
            dry_run,
            plan: include_plan.then_some(plan),
        }
    }
}

/// Result of an apply operation
#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyReport {
    pub plan_id: String,
    pub applied: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<ApplyFailure>,
}

impl From<&ApplyResult> for ApplyReport {
    fn from(result: &ApplyResult) -> Self {
        Self {
            plan_id: result.plan_id.clone(),
            applied: result.applied,
            failed: result.failed,
            skipped: result.skipped,
            failures: result.failures.clone(),
        }
    }
}

/// Result of an undo operation
#[derive(Debug, Serialize, Deserialize)]
pub struct UndoReport {
    pub plan_id: String,
    pub restored: usize,
    pub failed: usize,
    pub failures: Vec<ApplyFailure>,
}

impl From<&ApplyResult> for UndoReport {
    fn from(result: &ApplyResult) -> Self {
        Self {
            plan_id: result.plan_id.clone(),
            restored: result.applied,
            failed: result.failed,
            failures: result.failures.clone(),
        }
    }
}

/// Result of a rename operation (plan and apply in one step)
#[derive(Debug, Serialize, Deserialize)]
pub struct RenameReport {
    pub plan_id: String,
    pub pattern: String,
    pub unchanged: usize,
    pub collisions_resolved: usize,
    pub apply: ApplyReport,
}

/// Result of a status operation
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResult {
    pub pending_plan: Option<PendingPlan>,
    pub undo_available: Option<UndoAvailable>,
    pub history_count: usize,
    pub last_operation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PendingPlan {
    pub id: String,
    pub pattern: String,
    pub created_at: String,
    pub renames: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UndoAvailable {
    pub plan_id: String,
    pub created_at: String,
    pub operations: usize,
}

/// Result of a history operation
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResult {
    pub entries: Vec<HistoryEntry>,
}

/// One file in a listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ListedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    /// Local modification time, `YYYY-MM-DDTHH:MM:SS`
    pub modified: String,
    pub category: FileCategory,
}

impl From<&FileEntry> for ListedFile {
    fn from(entry: &FileEntry) -> Self {
        Self {
            name: entry.file_name(),
            path: entry.path.clone(),
            size: entry.size,
            modified: entry.modified.format("%Y-%m-%dT%H:%M:%S").to_string(),
            category: entry.category,
        }
    }
}

/// Result of a list operation
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResult {
    pub root: PathBuf,
    /// Every file under the root, before filters
    pub total_files: usize,
    pub selected_files: usize,
    /// Combined size of the selected files
    pub total_size: u64,
    pub files: Vec<ListedFile>,
}

impl ListResult {
    /// `Total: 3 files | Selected: 2 files | Size: 1.5 KB`
    pub fn totals_line(&self) -> String {
        format!(
            "Total: {} | Selected: {} | Size: {}",
            count(self.total_files, "file"),
            count(self.selected_files, "file"),
            format_size(self.total_size)
        )
    }

    /// Selected files as CSV with a header row
    pub fn to_csv(&self) -> String {
        let mut output = String::from("Original Name,Full Path,Size,Modified\n");
        for file in &self.files {
            writeln!(
                output,
                "{},{},{},{}",
                csv_field(&file.name),
                csv_field(&file.path.to_string_lossy()),
                file.size,
                file.modified
            )
            .unwrap();
        }
        output
    }

    fn display_path<'a>(&self, path: &'a Path) -> std::borrow::Cow<'a, str> {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
    }
}

/// Quote a CSV field when it holds a comma, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Human-readable size with one decimal, e.g. `1.5 MB`
pub fn format_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if size == 0 {
        return "0 B".to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Result of a version command
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResult {
    pub name: String,
    pub version: String,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

impl OutputFormatter for PlanResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": true,
            "operation": "plan",
            "plan_id": self.plan_id,
            "pattern": self.pattern,
            "dry_run": self.dry_run,
            "summary": {
                "renames": self.renames,
                "collisions_resolved": self.collisions_resolved,
                "unchanged": self.unchanged,
            },
            "warnings": self.warnings,
            "plan": self.plan,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = format!("Quickren plan: {}\n", self.pattern);

        writeln!(
            output,
            "Renames: {}, {} renumbered, {} unchanged",
            count(self.renames, "file"),
            self.collisions_resolved,
            self.unchanged
        )
        .unwrap();

        for warning in &self.warnings {
            writeln!(output, "Warning: {}", warning).unwrap();
        }

        if !self.dry_run {
            writeln!(output, "Plan ID: {}", self.plan_id).unwrap();
        }

        output
    }
}

impl OutputFormatter for ApplyReport {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.failed == 0,
            "operation": "apply",
            "plan_id": self.plan_id,
            "summary": {
                "applied": self.applied,
                "failed": self.failed,
                "skipped": self.skipped,
            },
            "failures": self.failures,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        if self.failed == 0 {
            writeln!(output, "Changes applied successfully. Plan ID: {}", self.plan_id).unwrap();
        } else {
            writeln!(output, "Plan {} applied with errors", self.plan_id).unwrap();
        }
        writeln!(output, "✓ Renamed {}", count(self.applied, "file")).unwrap();
        if self.skipped > 0 {
            writeln!(output, "Skipped {}", count(self.skipped, "operation")).unwrap();
        }
        write_failures(&mut output, &self.failures);

        if self.applied > 0 {
            writeln!(output, "Undo with: quickren undo").unwrap();
        }

        output
    }
}

impl OutputFormatter for UndoReport {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.failed == 0,
            "operation": "undo",
            "plan_id": self.plan_id,
            "summary": {
                "restored": self.restored,
                "failed": self.failed,
            },
            "failures": self.failures,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = format!("Undid plan {}\n", self.plan_id);
        writeln!(output, "✓ Restored {}", count(self.restored, "file")).unwrap();
        write_failures(&mut output, &self.failures);
        output
    }
}

impl OutputFormatter for RenameReport {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "success": self.apply.failed == 0,
            "operation": "rename",
            "plan_id": self.plan_id,
            "pattern": self.pattern,
            "summary": {
                "applied": self.apply.applied,
                "failed": self.apply.failed,
                "skipped": self.apply.skipped,
                "collisions_resolved": self.collisions_resolved,
                "unchanged": self.unchanged,
            },
            "failures": self.apply.failures,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = format!(
            "✓ Renamed {} with {}\n",
            count(self.apply.applied, "file"),
            self.pattern
        );
        if self.unchanged > 0 {
            writeln!(output, "{} already had their target name", count(self.unchanged, "file")).unwrap();
        }
        write_failures(&mut output, &self.apply.failures);
        if self.apply.applied > 0 {
            writeln!(output, "Undo with: quickren undo").unwrap();
        }
        output
    }
}

impl OutputFormatter for StatusResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        if let Some(ref plan) = self.pending_plan {
            writeln!(
                output,
                "Pending plan: {} ({}, {})",
                plan.id,
                plan.pattern,
                count(plan.renames, "rename")
            )
            .unwrap();
            writeln!(output, "Created: {}", plan.created_at).unwrap();
        } else {
            output.push_str("No pending plan\n");
        }

        if let Some(ref undo) = self.undo_available {
            writeln!(
                output,
                "Undo available for plan {} ({})",
                undo.plan_id,
                count(undo.operations, "file")
            )
            .unwrap();
        } else {
            output.push_str("Nothing to undo\n");
        }

        writeln!(output, "History entries: {}", self.history_count).unwrap();

        if let Some(ref last_op) = self.last_operation {
            writeln!(output, "Last operation: {}", last_op).unwrap();
        }

        output
    }
}

impl OutputFormatter for HistoryResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "entries": self.entries
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.entries.is_empty() {
            return "No history entries found".to_string();
        }

        let mut output = String::new();
        for entry in &self.entries {
            writeln!(
                output,
                "{} [{}] {} ({} applied, {} failed) {}",
                entry.id, entry.kind, entry.pattern, entry.applied, entry.failed, entry.created_at
            )
            .unwrap();
        }
        output
    }
}

impl OutputFormatter for ListResult {
    fn format_json(&self) -> String {
        serde_json::to_string(&json!({
            "operation": "list",
            "root": self.root,
            "summary": {
                "total_files": self.total_files,
                "selected_files": self.selected_files,
                "total_size": self.total_size,
            },
            "files": self.files,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();
        for file in &self.files {
            writeln!(
                output,
                "{}  {}  {}",
                self.display_path(&file.path),
                format_size(file.size),
                file.modified
            )
            .unwrap();
        }
        writeln!(output, "{}", self.totals_line()).unwrap();
        output
    }
}

impl OutputFormatter for VersionResult {
    fn format_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FsErrorKind;
    use crate::history::HistoryKind;
    use std::path::PathBuf;

    fn failure() -> ApplyFailure {
        ApplyFailure {
            path: PathBuf::from("/d/b.txt"),
            kind: FsErrorKind::DestinationExists,
            message: "destination already exists".to_string(),
        }
    }

    fn plan_result(dry_run: bool) -> PlanResult {
        PlanResult {
            plan_id: "test123".to_string(),
            pattern: "file_{n:03}".to_string(),
            renames: 3,
            collisions_resolved: 1,
            unchanged: 2,
            warnings: vec![],
            dry_run,
            plan: None,
        }
    }

    #[test]
    fn test_plan_result_json_format() {
        let json = plan_result(false).format_json();
        assert!(json.contains("\"operation\":\"plan\""));
        assert!(json.contains("\"plan_id\":\"test123\""));
        assert!(json.contains("\"renames\":3"));
        assert!(json.contains("\"collisions_resolved\":1"));
        assert!(json.contains("\"unchanged\":2"));
        assert!(json.contains("\"dry_run\":false"));
    }

    #[test]
    fn test_plan_result_summary_format() {
        let summary = plan_result(false).format(OutputFormat::Summary);
        assert!(summary.contains("file_{n:03}"));
        assert!(summary.contains("3 files"));
        assert!(summary.contains("Plan ID: test123"));

        let dry = plan_result(true).format_summary();
        assert!(!dry.contains("Plan ID"));
    }

    #[test]
    fn test_apply_report_summary_with_failure() {
        let report = ApplyReport {
            plan_id: "p1".to_string(),
            applied: 1,
            failed: 1,
            skipped: 0,
            failures: vec![failure()],
        };

        let summary = report.format_summary();
        assert!(summary.contains("applied with errors"));
        assert!(summary.contains("Renamed 1 file\n"));
        assert!(summary.contains("(destination exists)"));
        assert!(summary.contains("quickren undo"));

        let json = report.format(OutputFormat::Json);
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"failed\":1"));
    }

    #[test]
    fn test_undo_report_json() {
        let report = UndoReport {
            plan_id: "p1".to_string(),
            restored: 2,
            failed: 0,
            failures: vec![],
        };
        let json = report.format_json();
        assert!(json.contains("\"operation\":\"undo\""));
        assert!(json.contains("\"restored\":2"));
        assert!(report.format_summary().contains("Restored 2 files"));
    }

    #[test]
    fn test_status_summary() {
        let status = StatusResult {
            pending_plan: None,
            undo_available: Some(UndoAvailable {
                plan_id: "abc".to_string(),
                created_at: String::new(),
                operations: 4,
            }),
            history_count: 1,
            last_operation: Some("apply abc".to_string()),
        };
        let summary = status.format_summary();
        assert!(summary.contains("No pending plan"));
        assert!(summary.contains("Undo available for plan abc (4 files)"));
        assert!(summary.contains("History entries: 1"));
    }

    #[test]
    fn test_history_result_summary() {
        let empty = HistoryResult { entries: vec![] };
        assert_eq!(empty.format_summary(), "No history entries found");

        let result = HistoryResult {
            entries: vec![HistoryEntry {
                id: "abc".to_string(),
                created_at: "2024-01-01T00:00:00+00:00".to_string(),
                kind: HistoryKind::Undo,
                plan_id: "abc".to_string(),
                pattern: "{name}_{n:02}".to_string(),
                applied: 2,
                failed: 0,
            }],
        };
        assert!(result.format_summary().contains("abc [undo] {name}_{n:02}"));
    }

    fn list_result() -> ListResult {
        ListResult {
            root: PathBuf::from("/photos"),
            total_files: 3,
            selected_files: 2,
            total_size: 1536,
            files: vec![
                ListedFile {
                    name: "beach.jpg".to_string(),
                    path: PathBuf::from("/photos/beach.jpg"),
                    size: 512,
                    modified: "2024-03-09T14:05:07".to_string(),
                    category: FileCategory::Image,
                },
                ListedFile {
                    name: "a,b.jpg".to_string(),
                    path: PathBuf::from("/photos/a,b.jpg"),
                    size: 1024,
                    modified: "2024-03-10T08:00:00".to_string(),
                    category: FileCategory::Image,
                },
            ],
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512.0 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(10 * 1024 * 1024), "10.0 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024 * 1024), "5120.0 GB");
    }

    #[test]
    fn test_list_result_csv_quotes_commas() {
        let csv = list_result().to_csv();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Original Name,Full Path,Size,Modified");
        assert_eq!(lines[1], "beach.jpg,/photos/beach.jpg,512,2024-03-09T14:05:07");
        assert_eq!(lines[2], "\"a,b.jpg\",\"/photos/a,b.jpg\",1024,2024-03-10T08:00:00");
    }

    #[test]
    fn test_list_result_summary_ends_with_totals() {
        let summary = list_result().format_summary();
        assert!(summary.contains("beach.jpg  512.0 B  2024-03-09T14:05:07"));
        assert!(summary
            .trim_end()
            .ends_with("Total: 3 files | Selected: 2 files | Size: 1.5 KB"));

        let json: serde_json::Value = serde_json::from_str(&list_result().format_json()).unwrap();
        assert_eq!(json["summary"]["selected_files"], 2);
        assert_eq!(json["files"][0]["category"], "image");
    }

    #[test]
    fn test_version_result() {
        let version = VersionResult {
            name: "quickren".to_string(),
            version: "0.1.0".to_string(),
        };
        assert_eq!(version.format_summary(), "quickren 0.1.0");
        assert!(version.format_json().contains("\"version\":\"0.1.0\""));
    }
}
