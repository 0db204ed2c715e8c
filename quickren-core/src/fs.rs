use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The only file-system primitives the engine relies on.
///
/// Planning uses `list_dir` to learn which names are already taken. Applying
/// uses `exists` to re-validate each operation and `rename` to perform it.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Paths of every entry (files and directories) directly inside `dir`
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Whether names next to the existing path `sample` compare without
    /// regard to case. Must not write anything.
    fn is_case_insensitive(&self, _sample: &Path) -> bool {
        false
    }
}

/// `FileSystem` backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        // symlink_metadata so a dangling symlink still counts as occupying the name
        fs::symlink_metadata(path).is_ok()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            paths.push(entry?.path());
        }
        Ok(paths)
    }

    fn is_case_insensitive(&self, sample: &Path) -> bool {
        detect_case_insensitive_fs(sample)
    }
}

/// Write `value` as pretty JSON to a temp file next to `path`, then move it
/// into place so a reader never sees a half-written file
pub fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

/// Check if the filesystem holding `path` is case-insensitive.
///
/// Looks up `path`, or the nearest ancestor whose name has letters, under a
/// case-swapped name and checks it resolves to the same file. Read-only.
pub fn detect_case_insensitive_fs(path: &Path) -> bool {
    for candidate in path.ancestors() {
        let Some(name) = candidate.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let swapped = swap_case(name);
        if swapped == name {
            continue;
        }

        let Ok(original) = fs::symlink_metadata(candidate) else {
            return false;
        };
        return match fs::symlink_metadata(candidate.with_file_name(&swapped)) {
            Ok(other) => same_file(&original, &other),
            Err(_) => false,
        };
    }
    false
}

fn swap_case(name: &str) -> String {
    name.chars()
        .flat_map(|c| {
            if c.is_lowercase() {
                c.to_uppercase().collect::<Vec<_>>()
            } else {
                c.to_lowercase().collect::<Vec<_>>()
            }
        })
        .collect()
}

#[cfg(unix)]
fn same_file(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    a.len() == b.len() && a.modified().ok() == b.modified().ok()
}
