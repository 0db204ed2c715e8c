use anyhow::Result;
use quickren_core::{plan_operation, OutputFormatter, PlanRequest};
use std::path::{Path, PathBuf};

use crate::OutputFormat;

pub fn handle_plan(
    request: &PlanRequest,
    plan_out: Option<PathBuf>,
    dry_run: bool,
    working_dir: &Path,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let (mut result, preview) = plan_operation(request, plan_out, dry_run, Some(working_dir))?;

    match output {
        OutputFormat::Json => {
            // The full plan is only embedded for dry runs; otherwise it is on disk
            if !dry_run {
                result.plan = None;
            }
            println!("{}", result.format_json());
        },
        OutputFormat::Summary => {
            if let Some(preview) = preview {
                println!("{}", preview);
            }
            if !quiet {
                print!("{}", result.format_summary());
            }
        },
    }

    Ok(())
}
