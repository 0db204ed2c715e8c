use crate::apply::ApplyResult;
use crate::fs::write_json_atomic;
use crate::plan::{OperationStatus, RenameOperation};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use ts_rs::TS;

/// The inverse of the last successful apply.
///
/// Holds only operations that actually happened, already inverted
/// (destination -> source) and ordered last-applied first so they can run as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UndoRecord {
    pub plan_id: String,
    pub created_at: String,
    #[serde(default)]
    pub case_insensitive: bool,
    pub operations: Vec<RenameOperation>,
}

impl UndoRecord {
    pub fn from_applied(result: &ApplyResult, case_insensitive: bool) -> Self {
        let operations = result
            .operations
            .iter()
            .rev()
            .filter(|op| op.status == OperationStatus::Applied)
            .map(RenameOperation::inverse)
            .collect();

        Self {
            plan_id: result.plan_id.clone(),
            created_at: chrono::Local::now().to_rfc3339(),
            case_insensitive,
            operations,
        }
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Load the record stored at `path`, if any
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(path)
            .with_context(|| format!("Failed to open undo record: {}", path.display()))?;
        let record = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse undo record: {}", path.display()))?;
        Ok(Some(record))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(self, path)
            .with_context(|| format!("Failed to write undo record: {}", path.display()))
    }

    /// Delete a stored record. Missing files are fine.
    pub fn clear(path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove undo record: {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn op(from: &str, to: &str, status: OperationStatus) -> RenameOperation {
        let mut op = RenameOperation::new(PathBuf::from(from), PathBuf::from(to));
        op.status = status;
        op
    }

    fn result_with(operations: Vec<RenameOperation>) -> ApplyResult {
        ApplyResult {
            plan_id: "abc".to_string(),
            applied: 0,
            failed: 0,
            skipped: 0,
            failures: vec![],
            operations,
        }
    }

    #[test]
    fn test_only_applied_operations_are_recorded() {
        let result = result_with(vec![
            op("/d/a", "/d/1", OperationStatus::Applied),
            op("/d/b", "/d/2", OperationStatus::Failed),
            op("/d/c", "/d/3", OperationStatus::Applied),
        ]);

        let record = UndoRecord::from_applied(&result, false);
        assert_eq!(record.len(), 2);
        // Last applied comes first, already inverted
        assert_eq!(record.operations[0].source, PathBuf::from("/d/3"));
        assert_eq!(record.operations[0].destination, PathBuf::from("/d/c"));
        assert_eq!(record.operations[1].source, PathBuf::from("/d/1"));
        assert!(record
            .operations
            .iter()
            .all(|op| op.status == OperationStatus::Pending));
    }

    #[test]
    fn test_save_load_clear() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".quickren").join("undo.json");

        assert!(UndoRecord::load(&path).unwrap().is_none());

        let record = UndoRecord::from_applied(
            &result_with(vec![op("/d/a", "/d/b", OperationStatus::Applied)]),
            true,
        );
        record.save(&path).unwrap();

        let loaded = UndoRecord::load(&path).unwrap().unwrap();
        assert_eq!(loaded, record);
        assert!(loaded.case_insensitive);

        UndoRecord::clear(&path).unwrap();
        assert!(!path.exists());
        UndoRecord::clear(&path).unwrap();
    }
}
