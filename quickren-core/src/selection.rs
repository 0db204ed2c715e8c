use crate::entry::{FileCategory, FileEntry};
use crate::error::RenameError;
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use ts_rs::TS;
use walkdir::WalkDir;

/// Name of the per-directory state folder, never part of a selection
pub const STATE_DIR_NAME: &str = ".quickren";

/// Start of every staging name used during a two-phase apply
pub const STAGING_PREFIX: &str = ".quickren-";

const MB: u64 = 1024 * 1024;

/// Size bucket filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SizeFilter {
    #[default]
    All,
    /// Under 1 MB
    Small,
    /// 1 MB up to 10 MB
    Medium,
    /// 10 MB up to 100 MB
    Large,
    /// 100 MB and over
    Huge,
}

impl SizeFilter {
    pub fn matches(self, size: u64) -> bool {
        match self {
            Self::All => true,
            Self::Small => size < MB,
            Self::Medium => (MB..10 * MB).contains(&size),
            Self::Large => (10 * MB..100 * MB).contains(&size),
            Self::Huge => size >= 100 * MB,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Huge => "huge",
        }
    }
}

impl fmt::Display for SizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "small" | "<1mb" => Ok(Self::Small),
            "medium" | "1-10mb" => Ok(Self::Medium),
            "large" | "10-100mb" => Ok(Self::Large),
            "huge" | ">100mb" => Ok(Self::Huge),
            _ => Err(format!("unknown size filter: {}", s)),
        }
    }
}

/// Which files in a directory make up the selection
#[derive(Debug, Clone, Default)]
pub struct SelectionOptions {
    pub root: PathBuf,
    /// File-name globs such as `*.jpg`. Empty means every file,
    /// unless a preset is given.
    pub globs: Vec<String>,
    pub preset: Option<FileCategory>,
    pub recursive: bool,
    /// Keep only names containing this text
    pub search: Option<String>,
    pub case_sensitive: bool,
    pub size: SizeFilter,
}

impl SelectionOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Globs in effect: explicit ones win over the preset
    pub fn effective_globs(&self) -> Vec<String> {
        let explicit: Vec<String> = self
            .globs
            .iter()
            .flat_map(|g| g.split(','))
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect();

        if explicit.is_empty() {
            self.preset.map(FileCategory::globs).unwrap_or_default()
        } else {
            explicit
        }
    }

    /// Category that entries must belong to. A preset without extension
    /// globs, such as `other`, selects by category instead.
    fn required_category(&self) -> Option<FileCategory> {
        let preset = self.preset?;
        let has_explicit = self.globs.iter().any(|g| !g.trim().is_empty());
        (!has_explicit && preset.globs().is_empty()).then_some(preset)
    }

    fn name_matches_search(&self, file_name: &str) -> bool {
        match self.search.as_deref() {
            None | Some("") => true,
            Some(term) if self.case_sensitive => file_name.contains(term),
            Some(term) => file_name.to_lowercase().contains(&term.to_lowercase()),
        }
    }
}

fn build_name_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|e| RenameError::invalid_pattern(format!("invalid glob '{}': {}", pattern, e)))?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|e| RenameError::invalid_pattern(e.to_string()))?;
    Ok(Some(set))
}

/// Leftover staging files from an interrupted apply
fn is_staging_file(file_name: &str) -> bool {
    file_name.starts_with(STAGING_PREFIX) && file_name.ends_with(".tmp")
}

/// Scan `options.root` into an ordered selection.
///
/// Entries are sorted by lower-cased file name and numbered after filtering,
/// so ordinals are always `1..=len`.
pub fn select_files(options: &SelectionOptions) -> Result<Vec<FileEntry>> {
    let root = if options.root.is_absolute() {
        options.root.clone()
    } else {
        std::path::absolute(&options.root)
            .with_context(|| format!("Failed to resolve {}", options.root.display()))?
    };
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }

    let globs = build_name_globset(&options.effective_globs())?;
    let required_category = options.required_category();
    let max_depth = if options.recursive { usize::MAX } else { 1 };

    let mut found = Vec::new();
    let walker = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_entry(|e| e.file_name() != STATE_DIR_NAME);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            },
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if is_staging_file(&file_name) {
            continue;
        }
        if let Some(ref set) = globs {
            if !set.is_match(file_name.as_ref()) {
                continue;
            }
        }
        if !options.name_matches_search(&file_name) {
            continue;
        }

        let file = match FileEntry::from_path(entry.path(), 0) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping file");
                continue;
            },
        };
        if required_category.is_some_and(|category| file.category != category) {
            continue;
        }
        if options.size.matches(file.size) {
            found.push(file);
        }
    }

    found.sort_by(|a, b| {
        a.file_name()
            .to_lowercase()
            .cmp(&b.file_name().to_lowercase())
            .then_with(|| a.path.cmp(&b.path))
    });
    for (i, file) in found.iter_mut().enumerate() {
        file.ordinal = i + 1;
    }

    tracing::debug!(root = %root.display(), count = found.len(), "selected files");
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("b.JPG"), vec![0u8; 10]).unwrap();
        fs::write(root.join("a.png"), "png").unwrap();
        fs::write(root.join("notes.txt"), "notes").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("c.jpg"), "c").unwrap();
        fs::create_dir(root.join(STATE_DIR_NAME)).unwrap();
        fs::write(root.join(STATE_DIR_NAME).join("plan.json"), "{}").unwrap();
        fs::write(root.join(".quickren-abc-1.tmp"), "staged").unwrap();
        temp_dir
    }

    fn names(entries: &[FileEntry]) -> Vec<String> {
        entries.iter().map(FileEntry::file_name).collect()
    }

    #[test]
    fn test_select_everything_sorted() {
        let temp_dir = setup();
        let selection = select_files(&SelectionOptions::new(temp_dir.path())).unwrap();

        assert_eq!(names(&selection), vec!["a.png", "b.JPG", "notes.txt"]);
        let ordinals: Vec<_> = selection.iter().map(|e| e.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
    }

    #[test]
    fn test_preset_and_recursion() {
        let temp_dir = setup();
        let options = SelectionOptions {
            preset: Some(FileCategory::Image),
            recursive: true,
            ..SelectionOptions::new(temp_dir.path())
        };
        let selection = select_files(&options).unwrap();
        assert_eq!(names(&selection), vec!["a.png", "b.JPG", "c.jpg"]);
    }

    #[test]
    fn test_explicit_globs_override_preset() {
        let temp_dir = setup();
        let options = SelectionOptions {
            globs: vec!["*.txt, *.png".to_string()],
            preset: Some(FileCategory::Image),
            ..SelectionOptions::new(temp_dir.path())
        };
        let selection = select_files(&options).unwrap();
        assert_eq!(names(&selection), vec!["a.png", "notes.txt"]);
    }

    #[test]
    fn test_other_preset_selects_unknown_extensions_only() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["a.jpg", "b.txt", "c.xyz"] {
            fs::write(temp_dir.path().join(name), name).unwrap();
        }
        let options = SelectionOptions {
            preset: Some(FileCategory::Other),
            ..SelectionOptions::new(temp_dir.path())
        };
        assert_eq!(names(&select_files(&options).unwrap()), vec!["c.xyz"]);

        // Explicit globs still win over the preset
        let options = SelectionOptions {
            globs: vec!["*.txt".to_string()],
            ..options
        };
        assert_eq!(names(&select_files(&options).unwrap()), vec!["b.txt"]);
    }

    #[test]
    fn test_staging_leftovers_are_skipped() {
        assert!(is_staging_file(".quickren-0123abcd-1.tmp"));
        assert!(!is_staging_file("quickren-0123abcd-1.tmp"));
        assert!(!is_staging_file(".quickren"));
    }

    #[test]
    fn test_search_filter_case() {
        let temp_dir = setup();
        let mut options = SelectionOptions {
            search: Some("jpg".to_string()),
            ..SelectionOptions::new(temp_dir.path())
        };
        assert_eq!(names(&select_files(&options).unwrap()), vec!["b.JPG"]);

        options.case_sensitive = true;
        assert!(select_files(&options).unwrap().is_empty());
    }

    #[test]
    fn test_size_filter() {
        assert!(SizeFilter::Small.matches(0));
        assert!(!SizeFilter::Small.matches(MB));
        assert!(SizeFilter::Medium.matches(MB));
        assert!(!SizeFilter::Medium.matches(10 * MB));
        assert!(SizeFilter::Large.matches(10 * MB));
        assert!(SizeFilter::Huge.matches(100 * MB));
        assert_eq!("1-10MB".parse::<SizeFilter>().unwrap(), SizeFilter::Medium);
    }

    #[test]
    fn test_invalid_glob() {
        let temp_dir = setup();
        let options = SelectionOptions {
            globs: vec!["[".to_string()],
            ..SelectionOptions::new(temp_dir.path())
        };
        let err = select_files(&options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenameError>(),
            Some(RenameError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let result = select_files(&SelectionOptions::new(temp_dir.path().join("nope")));
        assert!(result.is_err());
    }
}
