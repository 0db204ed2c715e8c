use anyhow::Result;
use quickren_core::{format_history, history_operation, OutputFormatter};
use std::path::Path;

use crate::OutputFormat;

pub fn handle_history(
    limit: Option<usize>,
    working_dir: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let result = history_operation(limit, Some(working_dir))?;

    match output {
        OutputFormat::Json => {
            println!("{}", result.format_json());
        },
        OutputFormat::Summary => {
            if quiet {
                return Ok(());
            }
            if result.entries.is_empty() {
                println!("{}", result.format_summary());
            } else {
                let entries: Vec<_> = result.entries.iter().collect();
                println!("{}", format_history(&entries, false)?);
            }
        },
    }

    Ok(())
}
