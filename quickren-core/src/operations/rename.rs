use super::plan::{build_from_request, PlanRequest};
use super::{execute_plan, resolve_working_dir, state_dir};
use crate::apply::ApplyResult;
use crate::output::{ApplyReport, RenameReport};
use anyhow::{anyhow, Context, Result};
use std::io::{self, IsTerminal, Write as IoWrite};
use std::path::Path;

/// Outcome of a rename: nothing to do, aborted at the prompt, or applied
#[derive(Debug)]
pub enum RenameOutcome {
    NothingToDo,
    Aborted,
    Applied(Box<(RenameReport, ApplyResult)>),
}

/// Rename operation - plan and apply in one step.
///
/// Prints the preview and asks for confirmation unless `auto_approve` is set.
pub fn rename_operation(
    request: &PlanRequest,
    auto_approve: bool,
    working_dir: Option<&Path>,
) -> Result<(RenameOutcome, Option<String>)> {
    let current_dir = resolve_working_dir(working_dir)?;
    let (plan, preview) = build_from_request(request, &current_dir)?;

    if plan.is_empty() {
        return Ok((RenameOutcome::NothingToDo, preview));
    }

    if !auto_approve {
        if !io::stdout().is_terminal() {
            return Err(anyhow!(
                "Cannot prompt for confirmation in non-interactive mode. Use -y to approve."
            ));
        }
        if let Some(ref preview) = preview {
            println!("{}", preview);
        }
        if !get_user_confirmation(plan.stats.total)? {
            return Ok((RenameOutcome::Aborted, None));
        }
    }

    let plan_id = plan.id.clone();
    let pattern = plan.pattern.to_string();
    let unchanged = plan.stats.unchanged;
    let collisions_resolved = plan.stats.collisions_resolved;

    let result = execute_plan(plan, &state_dir(&current_dir))?;
    let report = RenameReport {
        plan_id,
        pattern,
        unchanged,
        collisions_resolved,
        apply: ApplyReport::from(&result),
    };

    // The preview was already shown before the prompt
    let preview = if auto_approve { preview } else { None };
    Ok((RenameOutcome::Applied(Box::new((report, result))), preview))
}

fn get_user_confirmation(total: usize) -> Result<bool> {
    print!("Rename {} files? [y/N]: ", total);
    IoWrite::flush(&mut io::stdout()).context("Failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;
    let input = input.trim().to_lowercase();

    Ok(input == "y" || input == "yes")
}
