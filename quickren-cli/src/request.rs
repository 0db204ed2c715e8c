use anyhow::Result;
use quickren_core::pattern::DEFAULT_DATE_FORMAT;
use quickren_core::{Config, PatternDescriptor, PlanRequest, Preview, SelectionOptions};
use std::path::PathBuf;
use std::str::FromStr;

use crate::cli::{FilterArgs, PatternArg, PatternArgs, PreviewArg};

/// Selection from filter flags, falling back to the configured defaults
pub fn build_selection(dir: PathBuf, filter: FilterArgs, config: &Config) -> SelectionOptions {
    SelectionOptions {
        root: dir,
        globs: if filter.glob.is_empty() {
            config.defaults.globs.clone()
        } else {
            filter.glob
        },
        preset: filter.preset.map(Into::into).or(config.defaults.preset),
        recursive: filter.recursive || config.defaults.recursive,
        search: filter.search,
        case_sensitive: filter.case_sensitive || config.defaults.case_sensitive,
        size: filter.size.into(),
    }
}

/// Merge command-line flags over the configured defaults
pub fn build_request(
    dir: PathBuf,
    filter: FilterArgs,
    pattern: &PatternArgs,
    preview: Option<PreviewArg>,
    config: &Config,
    use_color: bool,
) -> Result<PlanRequest> {
    let selection = build_selection(dir, filter, config);

    let preview = match preview {
        Some(arg) => arg.into(),
        None => Preview::from_str(&config.defaults.preview_format).map_err(anyhow::Error::msg)?,
    };

    Ok(PlanRequest {
        selection,
        pattern: build_pattern(pattern, &config.pattern),
        preview,
        use_color,
    })
}

/// Pattern from flags, falling back to `configured` for anything not given
pub fn build_pattern(args: &PatternArgs, configured: &PatternDescriptor) -> PatternDescriptor {
    let mut numbering = configured.numbering();
    if let Some(start) = args.start {
        numbering.start = start;
    }
    if let Some(width) = args.width {
        numbering.width = width;
    }

    let kind = args.pattern.unwrap_or_else(|| {
        if args.template.is_some() {
            PatternArg::Custom
        } else {
            match configured {
                PatternDescriptor::Sequential { .. } => PatternArg::Sequential,
                PatternDescriptor::DatePlusSequential { .. } => PatternArg::Date,
                PatternDescriptor::OriginalPlusNumber { .. } => PatternArg::Original,
                PatternDescriptor::Timestamp { .. } => PatternArg::Timestamp,
                PatternDescriptor::Custom { .. } => PatternArg::Custom,
            }
        }
    });

    match kind {
        PatternArg::Sequential => {
            let prefix = args.prefix.clone().unwrap_or_else(|| match configured {
                PatternDescriptor::Sequential { prefix, .. } => prefix.clone(),
                _ => "file_".to_string(),
            });
            PatternDescriptor::Sequential { prefix, numbering }
        },
        PatternArg::Date => {
            let date_format = args.date_format.clone().unwrap_or_else(|| match configured {
                PatternDescriptor::DatePlusSequential { date_format, .. } => date_format.clone(),
                _ => DEFAULT_DATE_FORMAT.to_string(),
            });
            PatternDescriptor::DatePlusSequential {
                date_format,
                numbering,
            }
        },
        PatternArg::Original => PatternDescriptor::OriginalPlusNumber { numbering },
        PatternArg::Timestamp => PatternDescriptor::Timestamp { numbering },
        PatternArg::Custom => {
            // An empty template is rejected by the pattern engine as InvalidPattern
            let template = args.template.clone().unwrap_or_else(|| match configured {
                PatternDescriptor::Custom { template, .. } => template.clone(),
                _ => String::new(),
            });
            PatternDescriptor::Custom { template, numbering }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickren_core::Numbering;

    fn args() -> PatternArgs {
        PatternArgs {
            pattern: None,
            prefix: None,
            start: None,
            width: None,
            date_format: None,
            template: None,
        }
    }

    #[test]
    fn test_defaults_come_from_config() {
        let pattern = build_pattern(&args(), &PatternDescriptor::default());
        assert_eq!(pattern, PatternDescriptor::default());
    }

    #[test]
    fn test_flags_override_numbering() {
        let mut a = args();
        a.pattern = Some(PatternArg::Original);
        a.start = Some(10);
        a.width = Some(2);
        assert_eq!(
            build_pattern(&a, &PatternDescriptor::default()),
            PatternDescriptor::OriginalPlusNumber {
                numbering: Numbering::new(10, 2)
            }
        );
    }

    #[test]
    fn test_template_implies_custom() {
        let mut a = args();
        a.template = Some("{name}-{index}".to_string());
        assert!(matches!(
            build_pattern(&a, &PatternDescriptor::default()),
            PatternDescriptor::Custom { ref template, .. } if template == "{name}-{index}"
        ));
    }

    #[test]
    fn test_date_pattern_default_format() {
        let mut a = args();
        a.pattern = Some(PatternArg::Date);
        assert!(matches!(
            build_pattern(&a, &PatternDescriptor::default()),
            PatternDescriptor::DatePlusSequential { ref date_format, .. } if date_format == "%Y-%m-%d"
        ));
    }
}
