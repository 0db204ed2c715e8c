use super::display_path;
use crate::plan::RenamePlan;
use comfy_table::{Cell, Color, ColumnConstraint, ContentArrangement, Table, Width};
use std::io::{self, IsTerminal};
use std::path::Path;

const SOURCE_WIDTH: u16 = 50;
const DEST_WIDTH: u16 = 50;
const NOTE_WIDTH: u16 = 12;

/// Render plan as a table, one row per rename plus unchanged files
pub fn render_table(plan: &RenamePlan, use_color: bool, base: &Path) -> String {
    let mut table = Table::new();

    if io::stdout().is_terminal() {
        table.set_content_arrangement(ContentArrangement::Dynamic);
    } else {
        table.set_content_arrangement(ContentArrangement::Disabled);
        table.set_constraints(vec![
            ColumnConstraint::Absolute(Width::Fixed(SOURCE_WIDTH)),
            ColumnConstraint::Absolute(Width::Fixed(DEST_WIDTH)),
            ColumnConstraint::Absolute(Width::Fixed(NOTE_WIDTH)),
        ]);
    }

    // Force styling even in non-TTY environments when colors are explicitly requested
    if use_color {
        table.enforce_styling();
        table.set_header(vec![
            Cell::new("Source").fg(Color::Cyan),
            Cell::new("Destination").fg(Color::Cyan),
            Cell::new("Note").fg(Color::Cyan),
        ]);
    } else {
        table.set_header(vec!["Source", "Destination", "Note"]);
    }

    for op in &plan.operations {
        let from = display_path(&op.source, base);
        let to = format!("→ {}", display_path(&op.destination, base));
        let note = if op.adjusted {
            "renumbered"
        } else if op.is_case_only() {
            "case only"
        } else {
            ""
        };

        if use_color {
            let dest_color = if op.adjusted { Color::Yellow } else { Color::Magenta };
            table.add_row(vec![
                Cell::new(&from),
                Cell::new(&to).fg(dest_color),
                Cell::new(note).fg(Color::Yellow),
            ]);
        } else {
            table.add_row(vec![from.as_str(), to.as_str(), note]);
        }
    }

    for path in &plan.unchanged {
        let from = display_path(path, base);
        if use_color {
            table.add_row(vec![
                Cell::new(&from).fg(Color::DarkGrey),
                Cell::new("(unchanged)").fg(Color::DarkGrey),
                Cell::new(""),
            ]);
        } else {
            table.add_row(vec![from.as_str(), "(unchanged)", ""]);
        }
    }

    let totals = format!(
        "{} renames, {} renumbered",
        plan.stats.total, plan.stats.collisions_resolved
    );
    let unchanged = format!("{} unchanged", plan.stats.unchanged);
    if use_color {
        table.add_row(vec![
            Cell::new("─────────").fg(Color::DarkGrey),
            Cell::new("─────────").fg(Color::DarkGrey),
            Cell::new("─────────").fg(Color::DarkGrey),
        ]);
        table.add_row(vec![
            Cell::new("TOTALS").fg(Color::Cyan),
            Cell::new(&totals).fg(Color::White),
            Cell::new(&unchanged).fg(Color::White),
        ]);
    } else {
        table.add_row(vec!["─────────", "─────────", "─────────"]);
        table.add_row(vec!["TOTALS", totals.as_str(), unchanged.as_str()]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::tests::create_test_plan;

    #[test]
    fn test_render_table_no_color() {
        let plan = create_test_plan();
        let output = render_table(&plan, false, Path::new("/photos"));

        assert!(output.contains("Source"));
        assert!(output.contains("a.jpg"));
        assert!(output.contains("→ file_001.jpg"));
        assert!(output.contains("renumbered"));
        assert!(output.contains("(unchanged)"));
        assert!(output.contains("2 renames, 1 renumbered"));
        assert!(!output.contains("/photos/"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_case_only_note() {
        let mut plan = create_test_plan();
        plan.operations = vec![crate::plan::RenameOperation::new(
            "/photos/A.jpg".into(),
            "/photos/a.jpg".into(),
        )];
        let output = render_table(&plan, false, Path::new("/photos"));
        assert!(output.contains("case only"));
    }
}
