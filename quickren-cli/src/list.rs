use anyhow::Result;
use quickren_core::{list_operation, OutputFormatter, SelectionOptions};
use std::path::Path;

use crate::cli::ListFormat;

pub fn handle_list(
    selection: &SelectionOptions,
    working_dir: &Path,
    output: ListFormat,
    quiet: bool,
) -> Result<()> {
    let result = list_operation(selection, Some(working_dir))?;

    match output {
        ListFormat::Json => println!("{}", result.format_json()),
        ListFormat::Csv => print!("{}", result.to_csv()),
        ListFormat::Summary if quiet => println!("{}", result.totals_line()),
        ListFormat::Summary => print!("{}", result.format_summary()),
    }

    Ok(())
}
