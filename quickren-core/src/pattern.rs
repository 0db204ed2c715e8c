use crate::entry::FileEntry;
use crate::error::RenameError;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Local};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use ts_rs::TS;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Widest zero-padding accepted; a longer number could never fit in a file name
pub const MAX_NUMBER_WIDTH: usize = 255;

/// Start value and zero-padding width of the running number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Numbering {
    #[ts(type = "number")]
    #[serde(default = "default_start")]
    pub start: u64,
    #[serde(default = "default_width")]
    pub width: usize,
}

impl Numbering {
    pub fn new(start: u64, width: usize) -> Self {
        Self { start, width }
    }

    /// Zero-padded number for a 1-based ordinal index
    pub fn format(&self, index: usize) -> String {
        format!("{:0width$}", self.number(index), width = self.width)
    }

    /// Raw number for a 1-based ordinal index
    pub fn number(&self, index: usize) -> u64 {
        self.start.saturating_add(index.saturating_sub(1) as u64)
    }
}

impl Default for Numbering {
    fn default() -> Self {
        Self {
            start: default_start(),
            width: default_width(),
        }
    }
}

fn default_start() -> u64 {
    1
}

fn default_width() -> usize {
    3
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// How new names are built for a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum PatternDescriptor {
    /// `{prefix}{number}{.ext}`
    Sequential {
        prefix: String,
        #[serde(default)]
        numbering: Numbering,
    },
    /// `{date}_{number}{.ext}`
    DatePlusSequential {
        #[serde(default = "default_date_format")]
        date_format: String,
        #[serde(default)]
        numbering: Numbering,
    },
    /// `{name}_{number}{.ext}`
    OriginalPlusNumber {
        #[serde(default)]
        numbering: Numbering,
    },
    /// `{YYYYMMDD}_{HHMMSS}_{number}{.ext}`
    Timestamp {
        #[serde(default)]
        numbering: Numbering,
    },
    /// Free-form template with `{token}` placeholders
    Custom {
        template: String,
        #[serde(default)]
        numbering: Numbering,
    },
}

impl Default for PatternDescriptor {
    fn default() -> Self {
        Self::Sequential {
            prefix: "file_".to_string(),
            numbering: Numbering::default(),
        }
    }
}

impl PatternDescriptor {
    pub fn numbering(&self) -> Numbering {
        match self {
            Self::Sequential { numbering, .. }
            | Self::DatePlusSequential { numbering, .. }
            | Self::OriginalPlusNumber { numbering }
            | Self::Timestamp { numbering }
            | Self::Custom { numbering, .. } => *numbering,
        }
    }

    /// Check the parameters without rendering anything
    pub fn validate(&self) -> Result<(), RenameError> {
        let numbering = self.numbering();
        if numbering.width == 0 {
            return Err(RenameError::invalid_pattern(
                "padding width must be at least 1",
            ));
        }
        if numbering.width > MAX_NUMBER_WIDTH {
            return Err(RenameError::invalid_pattern(format!(
                "padding width {} exceeds the maximum of {}",
                numbering.width, MAX_NUMBER_WIDTH
            )));
        }

        match self {
            Self::Sequential { prefix, .. } => check_literal("prefix", prefix),
            Self::DatePlusSequential { date_format, .. } => validate_date_format(date_format),
            Self::OriginalPlusNumber { .. } | Self::Timestamp { .. } => Ok(()),
            Self::Custom { template, .. } => {
                if template.trim().is_empty() {
                    return Err(RenameError::invalid_pattern("template is empty"));
                }
                check_literal("template", template)?;
                parse_template(template).map(|_| ())
            },
        }
    }
}

impl fmt::Display for PatternDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = |numbering: &Numbering| format!("{{n:0{}}}", numbering.width);
        match self {
            Self::Sequential { prefix, numbering } => write!(f, "{}{}", prefix, n(numbering)),
            Self::DatePlusSequential {
                date_format,
                numbering,
            } => write!(f, "{{date:{}}}_{}", date_format, n(numbering)),
            Self::OriginalPlusNumber { numbering } => write!(f, "{{name}}_{}", n(numbering)),
            Self::Timestamp { numbering } => write!(f, "{{date}}_{{time}}_{}", n(numbering)),
            Self::Custom { template, .. } => f.write_str(template),
        }
    }
}

/// Placeholders recognised inside a custom template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateToken {
    /// Original base name
    Name,
    /// Extension without the dot
    Ext,
    /// Zero-padded running number
    Index,
    /// Running number without padding
    Number,
    /// 1-based position in the selection, ignoring the start value
    Ordinal,
    /// Current date, YYYYMMDD
    Date,
    /// Current time, HHMMSS
    Time,
    Year,
    Month,
    Day,
    /// File modification date, YYYYMMDD
    FileDate,
    FileYear,
    FileMonth,
    FileDay,
    /// Name of the containing directory
    Parent,
    /// Size in bytes
    Size,
}

impl TemplateToken {
    pub fn parse(token: &str) -> Option<Self> {
        let token = match token {
            "name" => Self::Name,
            "ext" => Self::Ext,
            "index" => Self::Index,
            "n" => Self::Number,
            "i" => Self::Ordinal,
            "date" => Self::Date,
            "time" => Self::Time,
            "year" => Self::Year,
            "month" => Self::Month,
            "day" => Self::Day,
            "file_date" => Self::FileDate,
            "file_year" => Self::FileYear,
            "file_month" => Self::FileMonth,
            "file_day" => Self::FileDay,
            "parent" => Self::Parent,
            "size" => Self::Size,
            _ => return None,
        };
        Some(token)
    }

    /// Value of a numeric token, `None` for text tokens
    fn number(
        self,
        entry: &FileEntry,
        index: usize,
        numbering: Numbering,
        now: &DateTime<Local>,
    ) -> Option<u64> {
        let value = match self {
            Self::Index | Self::Number => numbering.number(index),
            Self::Ordinal => index as u64,
            Self::Year => u64::try_from(now.year()).unwrap_or_default(),
            Self::Month => u64::from(now.month()),
            Self::Day => u64::from(now.day()),
            Self::FileYear => u64::try_from(entry.modified.year()).unwrap_or_default(),
            Self::FileMonth => u64::from(entry.modified.month()),
            Self::FileDay => u64::from(entry.modified.day()),
            Self::Size => entry.size,
            Self::Name | Self::Ext | Self::Date | Self::Time | Self::FileDate | Self::Parent => {
                return None
            },
        };
        Some(value)
    }

    fn render(
        self,
        entry: &FileEntry,
        index: usize,
        numbering: Numbering,
        now: &DateTime<Local>,
        padding: Option<Padding>,
    ) -> String {
        if let Some(padding) = padding {
            if let Some(value) = self.number(entry, index, numbering, now) {
                return padding.apply(value);
            }
        }
        match self {
            Self::Name => entry.name.clone(),
            Self::Ext => entry.extension.clone(),
            Self::Index => numbering.format(index),
            Self::Number => numbering.number(index).to_string(),
            Self::Ordinal => index.to_string(),
            Self::Date => now.format("%Y%m%d").to_string(),
            Self::Time => now.format("%H%M%S").to_string(),
            Self::Year => now.year().to_string(),
            Self::Month => now.month().to_string(),
            Self::Day => now.day().to_string(),
            Self::FileDate => entry.modified.format("%Y%m%d").to_string(),
            Self::FileYear => entry.modified.year().to_string(),
            Self::FileMonth => entry.modified.month().to_string(),
            Self::FileDay => entry.modified.day().to_string(),
            Self::Parent => entry.parent_name(),
            Self::Size => entry.size.to_string(),
        }
    }
}

/// Width spec on a numeric token: `{n:03d}` pads with zeros, `{n:3d}` with spaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Padding {
    width: usize,
    zero: bool,
}

impl Padding {
    fn apply(self, value: u64) -> String {
        if self.zero {
            format!("{:0width$}", value, width = self.width)
        } else {
            format!("{:width$}", value, width = self.width)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Token(TemplateToken, Option<Padding>),
}

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(r"\{([^{}]*)\}").expect("token regex is valid"))
}

fn spec_regex() -> &'static Regex {
    static SPEC_RE: OnceLock<Regex> = OnceLock::new();
    SPEC_RE.get_or_init(|| {
        Regex::new(r"^([a-z_]+)(?::(0?)([0-9]*)d)?$").expect("spec regex is valid")
    })
}

/// Parse the inside of `{...}`. `Ok(None)` means the token is not recognised.
fn parse_token(inner: &str) -> Result<Option<(TemplateToken, Option<Padding>)>, RenameError> {
    let Some(caps) = spec_regex().captures(inner) else {
        return Ok(None);
    };
    let Some(token) = TemplateToken::parse(&caps[1]) else {
        return Ok(None);
    };

    let Some(width) = caps.get(3) else {
        return Ok(Some((token, None)));
    };
    if matches!(
        token,
        TemplateToken::Name
            | TemplateToken::Ext
            | TemplateToken::Date
            | TemplateToken::Time
            | TemplateToken::FileDate
            | TemplateToken::Parent
    ) {
        return Ok(None);
    }

    // Digits too long for usize are over the limit as well
    let width = match width.as_str() {
        "" => 0,
        digits => digits.parse::<usize>().unwrap_or(usize::MAX),
    };
    if width > MAX_NUMBER_WIDTH {
        return Err(RenameError::invalid_pattern(format!(
            "width in {{{}}} exceeds the maximum of {}",
            inner, MAX_NUMBER_WIDTH
        )));
    }
    let zero = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
    Ok(Some((token, Some(Padding { width, zero }))))
}

/// Split a template into literal text and recognised tokens.
/// Unrecognised `{...}` tokens stay literal and are returned separately.
fn parse_template(template: &str) -> Result<(Vec<Segment>, Vec<String>), RenameError> {
    let mut segments = Vec::new();
    let mut unknown = Vec::new();
    let mut last = 0;

    for caps in token_regex().captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Literal(template[last..whole.start()].to_string()));
        }

        match parse_token(&caps[1])? {
            Some((token, padding)) => segments.push(Segment::Token(token, padding)),
            None => {
                if !unknown.contains(&whole.as_str().to_string()) {
                    unknown.push(whole.as_str().to_string());
                }
                segments.push(Segment::Literal(whole.as_str().to_string()));
            },
        }
        last = whole.end();
    }

    if last < template.len() {
        segments.push(Segment::Literal(template[last..].to_string()));
    }

    Ok((segments, unknown))
}

fn validate_date_format(format: &str) -> Result<(), RenameError> {
    if format.is_empty() {
        return Err(RenameError::invalid_pattern("date format is empty"));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(RenameError::invalid_pattern(format!(
            "unparseable date format '{}'",
            format
        )));
    }
    Ok(())
}

fn has_separator(s: &str) -> bool {
    s.contains('/') || s.contains('\0') || (cfg!(windows) && s.contains('\\'))
}

fn check_literal(what: &str, value: &str) -> Result<(), RenameError> {
    if has_separator(value) {
        return Err(RenameError::invalid_pattern(format!(
            "{} '{}' contains a path separator",
            what, value
        )));
    }
    Ok(())
}

fn check_file_name(name: &str) -> Result<(), RenameError> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(RenameError::invalid_pattern(format!(
            "pattern produced an unusable file name '{}'",
            name
        )));
    }
    if has_separator(name) {
        return Err(RenameError::invalid_pattern(format!(
            "pattern produced a name containing a path separator: '{}'",
            name
        )));
    }
    Ok(())
}

/// Renders names for one batch.
///
/// The clock is captured once so every file in the batch gets the same date
/// and time, and a custom template is parsed once up front.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    descriptor: PatternDescriptor,
    now: DateTime<Local>,
    segments: Vec<Segment>,
    warnings: Vec<String>,
}

impl NameGenerator {
    pub fn new(descriptor: &PatternDescriptor, now: DateTime<Local>) -> Result<Self, RenameError> {
        descriptor.validate()?;

        let (segments, warnings) = match descriptor {
            PatternDescriptor::Custom { template, .. } => {
                let (segments, unknown) = parse_template(template)?;
                let warnings = unknown
                    .into_iter()
                    .map(|token| {
                        tracing::warn!(%token, "unrecognized template token left as-is");
                        format!("unrecognized token {} left as-is", token)
                    })
                    .collect();
                (segments, warnings)
            },
            _ => (Vec::new(), Vec::new()),
        };

        Ok(Self {
            descriptor: descriptor.clone(),
            now,
            segments,
            warnings,
        })
    }

    pub fn descriptor(&self) -> &PatternDescriptor {
        &self.descriptor
    }

    /// Non-fatal problems found in the pattern
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Proposed new file name for `entry` at 1-based position `index`
    pub fn generate(&self, entry: &FileEntry, index: usize) -> Result<String, RenameError> {
        let numbering = self.descriptor.numbering();
        let number = numbering.format(index);
        let ext = entry.dotted_extension();

        let name = match &self.descriptor {
            PatternDescriptor::Sequential { prefix, .. } => format!("{}{}{}", prefix, number, ext),
            PatternDescriptor::DatePlusSequential { date_format, .. } => {
                format!("{}_{}{}", self.now.format(date_format), number, ext)
            },
            PatternDescriptor::OriginalPlusNumber { .. } => {
                format!("{}_{}{}", entry.name, number, ext)
            },
            PatternDescriptor::Timestamp { .. } => format!(
                "{}_{}{}",
                self.now.format("%Y%m%d_%H%M%S"),
                number,
                ext
            ),
            PatternDescriptor::Custom { .. } => {
                let mut rendered = String::new();
                for segment in &self.segments {
                    match segment {
                        Segment::Literal(text) => rendered.push_str(text),
                        Segment::Token(token, padding) => {
                            rendered.push_str(&token.render(
                                entry,
                                index,
                                numbering,
                                &self.now,
                                *padding,
                            ));
                        },
                    }
                }
                // Keep the original extension unless the template already ends with it
                if !ext.is_empty() && !rendered.ends_with(&ext) {
                    rendered.push_str(&ext);
                }
                rendered
            },
        };

        check_file_name(&name)?;
        Ok(name)
    }
}

/// Proposed new name for a single entry using the current time
pub fn generate_name(
    entry: &FileEntry,
    index: usize,
    descriptor: &PatternDescriptor,
) -> Result<String, RenameError> {
    NameGenerator::new(descriptor, Local::now())?.generate(entry, index)
}
