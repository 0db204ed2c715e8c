use super::{default_plan_path, execute_plan, resolve_working_dir, state_dir};
use crate::apply::ApplyResult;
use crate::plan::load_plan;
use anyhow::{anyhow, Result};
use std::fs;
use std::path::PathBuf;

/// High-level apply operation - equivalent to `quickren apply`.
///
/// Without an explicit path the pending `.quickren/plan.json` is applied and
/// then deleted, so the same plan never runs twice.
pub fn apply_operation(
    plan_path: Option<PathBuf>,
    working_dir: Option<&std::path::Path>,
) -> Result<ApplyResult> {
    let current_dir = resolve_working_dir(working_dir)?;
    let quickren_dir = state_dir(&current_dir);

    let (plan, used_default_plan_file) = match plan_path {
        Some(path) => {
            let path = if path.is_relative() {
                current_dir.join(path)
            } else {
                path
            };
            (load_plan(&path)?, None)
        },
        None => {
            let plan_file = default_plan_path(&quickren_dir);
            if !plan_file.exists() {
                return Err(anyhow!(
                    "No plan specified and no default plan found at {}",
                    plan_file.display()
                ));
            }
            (load_plan(&plan_file)?, Some(plan_file))
        },
    };

    let result = execute_plan(plan, &quickren_dir)?;

    if let Some(default_plan_path) = used_default_plan_file {
        if let Err(e) = fs::remove_file(&default_plan_path) {
            tracing::warn!(
                path = %default_plan_path.display(),
                error = %e,
                "failed to delete plan file"
            );
        }
    }

    Ok(result)
}
