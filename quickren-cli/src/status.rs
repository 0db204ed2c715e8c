use anyhow::Result;
use quickren_core::{status_operation, OutputFormatter};
use std::path::Path;

use crate::OutputFormat;

pub fn handle_status(working_dir: &Path, output: OutputFormat, quiet: bool) -> Result<()> {
    let result = status_operation(Some(working_dir))?;

    match output {
        OutputFormat::Json => {
            println!("{}", result.format_json());
        },
        OutputFormat::Summary => {
            if !quiet {
                print!("{}", result.format_summary());
            }
        },
    }

    Ok(())
}
