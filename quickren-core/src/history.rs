use crate::apply::ApplyResult;
use crate::undo::UndoRecord;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use ts_rs::TS;

/// Keep the history file from growing without bound
pub const MAX_HISTORY_ENTRIES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum HistoryKind {
    Apply,
    Undo,
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Apply => "apply",
            Self::Undo => "undo",
        })
    }
}

/// One apply or undo run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryEntry {
    pub id: String,
    pub created_at: String,
    pub kind: HistoryKind,
    /// Plan the run belongs to
    pub plan_id: String,
    /// Display form of the pattern, e.g. `file_{n:03}`
    pub pattern: String,
    pub applied: usize,
    pub failed: usize,
}

impl HistoryEntry {
    pub fn for_apply(pattern: String, result: &ApplyResult) -> Self {
        Self {
            id: result.plan_id.clone(),
            created_at: chrono::Local::now().to_rfc3339(),
            kind: HistoryKind::Apply,
            plan_id: result.plan_id.clone(),
            pattern,
            applied: result.applied,
            failed: result.failed,
        }
    }

    /// `pattern` is carried over from the apply entry when one is known
    pub fn for_undo(record: &UndoRecord, result: &ApplyResult, pattern: Option<String>) -> Self {
        Self {
            id: format!("{}-undo", record.plan_id),
            created_at: chrono::Local::now().to_rfc3339(),
            kind: HistoryKind::Undo,
            plan_id: record.plan_id.clone(),
            pattern: pattern.unwrap_or_default(),
            applied: result.applied,
            failed: result.failed,
        }
    }
}

/// The run history, oldest entry first on disk
pub struct History {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Load `history.json` from the state directory
    pub fn load(state_dir: &Path) -> Result<Self> {
        Self::load_from_path(&state_dir.join("history.json"))
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open history file: {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse history file: {}", path.display()))?
        } else {
            Vec::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("Failed to create history file: {}", self.path.display()))?;

        serde_json::to_writer_pretty(BufWriter::new(file), &self.entries)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;
        Ok(())
    }

    /// Append an entry and save
    pub fn add_entry(&mut self, entry: HistoryEntry) -> Result<()> {
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(anyhow!("History entry with ID {} already exists", entry.id));
        }

        self.entries.push(entry);
        self.save()
    }

    /// `base`, or `base-2`, `base-3`, ... if that id is already taken
    pub fn unique_id(&self, base: &str) -> String {
        let mut id = base.to_string();
        let mut n = 2;
        while self.find_entry(&id).is_some() {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        id
    }

    pub fn find_entry(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent first, optionally limited to N
    pub fn list_entries(&self, limit: Option<usize>) -> Vec<&HistoryEntry> {
        let entries = self.entries.iter().rev();
        match limit {
            Some(limit) => entries.take(limit).collect(),
            None => entries.collect(),
        }
    }

    /// Drop the oldest entries beyond `max_entries`
    pub fn prune(&mut self, max_entries: usize) -> Result<()> {
        if self.entries.len() > max_entries {
            let to_remove = self.entries.len() - max_entries;
            self.entries.drain(0..to_remove);
            self.save()?;
        }
        Ok(())
    }
}

/// Render entries as a table, or as JSON when `json` is set
pub fn format_history(entries: &[&HistoryEntry], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(entries)?);
    }

    use comfy_table::{Cell, Color, Table};

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Type").fg(Color::Cyan),
        Cell::new("Pattern").fg(Color::Cyan),
        Cell::new("Applied").fg(Color::Cyan),
        Cell::new("Failed").fg(Color::Cyan),
    ]);

    for entry in entries {
        let date = entry
            .created_at
            .split('T')
            .next()
            .unwrap_or(&entry.created_at);

        table.add_row(vec![
            &entry.plan_id[..8.min(entry.plan_id.len())],
            date,
            &entry.kind.to_string(),
            &entry.pattern,
            &entry.applied.to_string(),
            &entry.failed.to_string(),
        ]);
    }

    Ok(table.to_string())
}
