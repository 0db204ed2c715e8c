use clap::ValueEnum;
use quickren_core::{FileCategory, Preview, SizeFilter};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PreviewArg {
    Table,
    Summary,
    Json,
    None,
}

impl From<PreviewArg> for Preview {
    fn from(arg: PreviewArg) -> Self {
        match arg {
            PreviewArg::Table => Self::Table,
            PreviewArg::Summary => Self::Summary,
            PreviewArg::Json => Self::Json,
            PreviewArg::None => Self::None,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

impl From<OutputFormat> for quickren_core::OutputFormat {
    fn from(arg: OutputFormat) -> Self {
        match arg {
            OutputFormat::Summary => Self::Summary,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Output of the `list` command
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListFormat {
    Summary,
    Json,
    /// name, full path, size and modified time per file
    Csv,
}

/// Naming scheme for the new names
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PatternArg {
    /// prefix + number, e.g. file_001.jpg
    Sequential,
    /// date + number, e.g. 2024-03-09_001.jpg
    Date,
    /// original name + number, e.g. holiday_01.jpg
    Original,
    /// date + time + number, e.g. 20240309_140507_01.jpg
    Timestamp,
    /// free-form --template
    Custom,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PresetArg {
    Images,
    Documents,
    Audio,
    Video,
    Code,
    Archives,
    /// anything without a known extension
    Other,
}

impl From<PresetArg> for FileCategory {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Images => Self::Image,
            PresetArg::Documents => Self::Document,
            PresetArg::Audio => Self::Audio,
            PresetArg::Video => Self::Video,
            PresetArg::Code => Self::Code,
            PresetArg::Archives => Self::Archive,
            PresetArg::Other => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SizeArg {
    All,
    /// under 1 MB
    Small,
    /// 1 to 10 MB
    Medium,
    /// 10 to 100 MB
    Large,
    /// 100 MB and over
    Huge,
}

impl From<SizeArg> for SizeFilter {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::All => Self::All,
            SizeArg::Small => Self::Small,
            SizeArg::Medium => Self::Medium,
            SizeArg::Large => Self::Large,
            SizeArg::Huge => Self::Huge,
        }
    }
}
