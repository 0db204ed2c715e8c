use anyhow::Result;
use quickren_core::{rename_operation, OutputFormatter, PlanRequest, RenameOutcome};
use std::path::Path;

use crate::OutputFormat;

/// Returns the number of failed operations
pub fn handle_rename(
    request: &PlanRequest,
    auto_approve: bool,
    working_dir: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<usize> {
    let (outcome, preview) = rename_operation(request, auto_approve, Some(working_dir))?;

    if output == OutputFormat::Summary {
        if let Some(preview) = preview {
            println!("{}", preview);
        }
    }

    match outcome {
        RenameOutcome::NothingToDo => {
            match output {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "operation": "rename",
                        "summary": { "applied": 0, "failed": 0 },
                    })
                ),
                OutputFormat::Summary => {
                    if !quiet {
                        println!("Nothing to rename");
                    }
                },
            }
            Ok(0)
        },
        RenameOutcome::Aborted => {
            if !quiet {
                eprintln!("Aborted");
            }
            Ok(0)
        },
        RenameOutcome::Applied(applied) => {
            let (report, result) = *applied;
            match output {
                OutputFormat::Json => println!("{}", report.format_json()),
                OutputFormat::Summary => {
                    if !quiet {
                        print!("{}", report.format_summary());
                    }
                },
            }
            Ok(result.failed)
        },
    }
}
