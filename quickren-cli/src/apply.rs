use anyhow::Result;
use quickren_core::{apply_operation, ApplyReport, OutputFormatter};
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Returns the number of failed operations
pub fn handle_apply(
    plan: Option<PathBuf>,
    working_dir: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<usize> {
    let result = apply_operation(plan, Some(working_dir))?;
    let report = ApplyReport::from(&result);

    match output {
        OutputFormat::Json => {
            println!("{}", report.format_json());
        },
        OutputFormat::Summary => {
            if !quiet {
                print!("{}", report.format_summary());
            }
        },
    }

    Ok(result.failed)
}
