use super::{default_plan_path, resolve_selection, resolve_working_dir, state_dir};
use crate::output::PlanResult;
use crate::pattern::PatternDescriptor;
use crate::plan::{build_plan, write_plan, RenamePlan};
use crate::preview::{render_plan, Preview};
use crate::selection::{select_files, SelectionOptions};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Everything needed to build a plan from a directory
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub selection: SelectionOptions,
    pub pattern: PatternDescriptor,
    pub preview: Preview,
    pub use_color: bool,
}

/// Select files and build a plan, rendering the preview if one was asked for
pub(crate) fn build_from_request(
    request: &PlanRequest,
    working_dir: &Path,
) -> Result<(RenamePlan, Option<String>)> {
    let selection_options = resolve_selection(&request.selection, working_dir);
    let selection = select_files(&selection_options)?;
    let plan = build_plan(&selection, &request.pattern)?;

    let preview = match request.preview {
        Preview::None => None,
        format => Some(render_plan(
            &plan,
            format,
            Some(request.use_color && format != Preview::Json),
            &selection_options.root,
        )),
    };

    Ok((plan, preview))
}

/// Plan operation - returns structured data and the rendered preview.
///
/// Unless `dry_run` is set, the plan is written to `plan_out`, or to
/// `.quickren/plan.json` by default.
pub fn plan_operation(
    request: &PlanRequest,
    plan_out: Option<PathBuf>,
    dry_run: bool,
    working_dir: Option<&Path>,
) -> Result<(PlanResult, Option<String>)> {
    let current_dir = resolve_working_dir(working_dir)?;
    let (plan, preview) = build_from_request(request, &current_dir)?;

    if !dry_run {
        let plan_out_path = match plan_out {
            Some(path) if path.is_relative() => current_dir.join(path),
            Some(path) => path,
            None => default_plan_path(&state_dir(&current_dir)),
        };
        write_plan(&plan, &plan_out_path)
            .with_context(|| format!("Failed to write plan to {}", plan_out_path.display()))?;
        tracing::info!(plan_id = %plan.id, path = %plan_out_path.display(), "wrote plan");
    }

    Ok((PlanResult::from_plan(plan, dry_run, true), preview))
}
