use anyhow::Result;
use quickren_core::{undo_operation, OutputFormatter, UndoReport};
use std::path::Path;

use crate::OutputFormat;

/// Returns the number of renames that could not be reversed
pub fn handle_undo(working_dir: &Path, output: OutputFormat, quiet: bool) -> Result<usize> {
    let result = undo_operation(Some(working_dir))?;
    let report = UndoReport::from(&result);

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
