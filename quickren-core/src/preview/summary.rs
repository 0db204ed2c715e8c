use super::display_path;
use crate::plan::RenamePlan;
use nu_ansi_term::{Color as AnsiColor, Style};
use std::fmt::Write;
use std::path::Path;

/// Render plan as a plain sectioned summary
pub fn render_summary(plan: &RenamePlan, use_color: bool, base: &Path) -> String {
    let heading = |text: &str| {
        if use_color {
            AnsiColor::Yellow.bold().paint(text).to_string()
        } else {
            text.to_string()
        }
    };

    let mut output = String::new();

    writeln!(output, "{}", heading("[PLAN SUMMARY]")).unwrap();
    writeln!(output, "Pattern: {}", plan.pattern).unwrap();
    writeln!(output, "Renames: {}", plan.stats.total).unwrap();
    writeln!(output, "Renumbered: {}", plan.stats.collisions_resolved).unwrap();
    writeln!(output, "Unchanged: {}", plan.stats.unchanged).unwrap();
    if plan.staging_required {
        writeln!(output, "Staging: required").unwrap();
    }

    if !plan.operations.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "{}", heading("[RENAMES]")).unwrap();
        for op in &plan.operations {
            let from = display_path(&op.source, base);
            let to = display_path(&op.destination, base);
            if use_color {
                let to_style = if op.adjusted {
                    AnsiColor::Yellow.normal()
                } else {
                    AnsiColor::Green.normal()
                };
                writeln!(
                    output,
                    "{} {} {}",
                    from,
                    AnsiColor::DarkGray.paint("->"),
                    to_style.paint(to)
                )
                .unwrap();
            } else {
                writeln!(output, "{} -> {}", from, to).unwrap();
            }
        }
    }

    if !plan.unchanged.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "{}", heading("[UNCHANGED]")).unwrap();
        for path in &plan.unchanged {
            writeln!(output, "{}", display_path(path, base)).unwrap();
        }
    }

    if !plan.warnings.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "{}", heading("[WARNINGS]")).unwrap();
        for warning in &plan.warnings {
            if use_color {
                writeln!(output, "{}", Style::new().italic().paint(warning)).unwrap();
            } else {
                writeln!(output, "{}", warning).unwrap();
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::tests::create_test_plan;

    #[test]
    fn test_render_summary() {
        let plan = create_test_plan();
        let output = render_summary(&plan, false, Path::new("/photos"));

        assert!(output.starts_with("[PLAN SUMMARY]\n"));
        assert!(output.contains("Pattern: file_{n:03}"));
        assert!(output.contains("a.jpg -> file_001.jpg"));
        assert!(output.contains("dup.jpg -> file_002_1.jpg"));
        assert!(output.contains("[UNCHANGED]\nfile_003.jpg"));
        assert!(output.contains("[WARNINGS]"));
        assert!(!output.contains("Staging"));
    }

    #[test]
    fn test_empty_plan_summary() {
        let mut plan = create_test_plan();
        plan.operations.clear();
        plan.unchanged.clear();
        plan.warnings.clear();

        let output = render_summary(&plan, false, Path::new("/"));
        assert!(!output.contains("[RENAMES]"));
        assert!(output.contains("Renames: 2"));
    }
}
