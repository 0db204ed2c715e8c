use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use ts_rs::TS;

/// Broad file-type bucket, derived from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum FileCategory {
    Image,
    Document,
    Audio,
    Video,
    Code,
    Archive,
    Other,
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp", "svg", "ico",
];
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "txt", "rtf", "odt", "xls", "xlsx", "csv", "ppt", "pptx",
];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "wma", "aac", "opus"];
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "avi", "mov", "wmv", "flv", "mkv", "webm", "m4v", "3gp",
];
const CODE_EXTENSIONS: &[&str] = &[
    "py", "js", "html", "css", "cpp", "c", "java", "php", "rb", "go",
];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz", "bz2", "xz"];

impl FileCategory {
    pub const ALL: [Self; 7] = [
        Self::Image,
        Self::Document,
        Self::Audio,
        Self::Video,
        Self::Code,
        Self::Archive,
        Self::Other,
    ];

    /// Classify an extension (without the leading dot, any case)
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.extensions().contains(&ext.as_str()))
            .unwrap_or(Self::Other)
    }

    /// Known extensions for this category. `Other` has none.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image => IMAGE_EXTENSIONS,
            Self::Document => DOCUMENT_EXTENSIONS,
            Self::Audio => AUDIO_EXTENSIONS,
            Self::Video => VIDEO_EXTENSIONS,
            Self::Code => CODE_EXTENSIONS,
            Self::Archive => ARCHIVE_EXTENSIONS,
            Self::Other => &[],
        }
    }

    /// Glob patterns selecting this category, e.g. `*.jpg`
    pub fn globs(self) -> Vec<String> {
        self.extensions()
            .iter()
            .map(|ext| format!("*.{}", ext))
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Document => "document",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Code => "code",
            Self::Archive => "archive",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" | "images" => Ok(Self::Image),
            "document" | "documents" => Ok(Self::Document),
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            "code" => Ok(Self::Code),
            "archive" | "archives" => Ok(Self::Archive),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown file category: {}", s)),
        }
    }
}

/// One selected file, snapshotted when the selection is made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FileEntry {
    /// Absolute path of the file
    #[ts(type = "string")]
    pub path: PathBuf,
    /// File name without the extension
    pub name: String,
    /// Extension without the leading dot, empty when there is none
    pub extension: String,
    pub category: FileCategory,
    #[ts(type = "string")]
    pub modified: DateTime<Local>,
    #[ts(type = "number")]
    pub size: u64,
    /// 1-based position within the selection
    pub ordinal: usize,
}

impl FileEntry {
    /// Build an entry from a path on disk
    pub fn from_path(path: &Path, ordinal: usize) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let modified = metadata
            .modified()
            .map_or_else(|_| Local::now(), DateTime::<Local>::from);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::path::absolute(path)?
        };

        Ok(Self::new(path, modified, metadata.len(), ordinal))
    }

    /// Build an entry from already-known metadata
    pub fn new(path: PathBuf, modified: DateTime<Local>, size: u64, ordinal: usize) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let category = FileCategory::from_extension(&extension);

        Self {
            path,
            name,
            extension,
            category,
            modified,
            size,
            ordinal,
        }
    }

    /// Full file name including the extension
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `.ext`, or an empty string when the file has no extension
    pub fn dotted_extension(&self) -> String {
        if self.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.extension)
        }
    }

    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Name of the directory containing the file
    pub fn parent_name(&self) -> String {
        self.parent()
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
