use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use pain_core::{HarmoniseError, VariantOutcome};
use pain_model::DatasetVariant;
use pain_validate::Violation;

use crate::commands::RunResult;

pub fn print_summary(result: &RunResult) {
    if result.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Output: {}", result.output_dir.display());
    }
    if let Some(path) = &result.report_json {
        println!("Validation report: {}", path.display());
    }
    println!("{}", outcome_table(result));
    print_violation_table(result);

    let errors: Vec<&HarmoniseError> = result
        .summary
        .failures()
        .filter(|err| err.report().is_none())
        .collect();
    if !errors.is_empty() {
        eprintln!("Errors:");
        for error in errors {
            eprintln!("- {error}");
        }
    }
}

pub fn outcome_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variant"),
        header_cell("Status"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Dropped"),
        header_cell("Recoded"),
        header_cell("Violations"),
        header_cell("Written"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 7, CellAlignment::Center);

    let mut total_rows = 0usize;
    let mut total_violations = 0usize;
    for (name, result) in &result.summary.results {
        let row = match result {
            Ok(outcome) => {
                total_rows += outcome.rows_out;
                success_row(name, outcome)
            }
            Err(err) => {
                let violations = err.report().map(|report| report.violations.len());
                total_violations += violations.unwrap_or(0);
                failure_row(name, err, violations)
            }
        };
        table.add_row(row);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(Some(total_violations)).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

fn success_row(name: &str, outcome: &VariantOutcome) -> Vec<Cell> {
    vec![
        variant_cell(name),
        Cell::new("OK").fg(Color::Green),
        Cell::new(outcome.rows_in),
        Cell::new(outcome.rows_out),
        Cell::new(outcome.rows_dropped),
        Cell::new(outcome.cells_recoded),
        count_cell(Some(0)),
        match outcome.written {
            Some(_) => Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            None => dim_cell("-"),
        },
    ]
}

fn failure_row(name: &str, err: &HarmoniseError, violations: Option<usize>) -> Vec<Cell> {
    let rows_checked = err.report().map(|report| report.rows_checked);
    vec![
        variant_cell(name),
        Cell::new(err.stage().to_uppercase())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        rows_checked.map_or_else(|| dim_cell("-"), Cell::new),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(violations),
        dim_cell("-"),
    ]
}

fn print_violation_table(result: &RunResult) {
    let mut violations: Vec<(&str, &Violation)> = Vec::new();
    for (name, result) in &result.summary.results {
        if let Err(err) = result
            && let Some(report) = err.report()
        {
            violations.extend(report.violations.iter().map(|v| (name.as_str(), v)));
        }
    }
    if violations.is_empty() {
        return;
    }
    violations.sort_by(|a, b| {
        a.0.cmp(b.0)
            .then(a.1.rule().cmp(&b.1.rule()))
            .then(a.1.column().cmp(b.1.column()))
    });

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variant"),
        header_cell("Rule"),
        header_cell("Column"),
        header_cell("Rows"),
        header_cell("Message"),
        header_cell("Examples"),
    ]);
    apply_violation_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for (variant, violation) in violations {
        let (message, examples) = split_examples(&violation.message());
        table.add_row(vec![
            variant_cell(variant),
            rule_cell(violation),
            Cell::new(violation.column()),
            match violation.count() {
                Some(count) => Cell::new(count).fg(Color::Red),
                None => dim_cell("-"),
            },
            Cell::new(message),
            example_cell(examples),
        ]);
    }
    println!();
    println!("Violations:");
    println!("{table}");
}

/// `PN17: 9→-99; PN25: 8→-88, 9→-99`, or `-` when nothing is recoded.
pub fn describe_recode(variant: &DatasetVariant) -> String {
    if variant.recode.is_empty() {
        return "-".to_string();
    }
    variant
        .recode
        .iter()
        .map(|(basename, map)| {
            let rules: Vec<String> = map
                .rules()
                .iter()
                .map(|rule| format!("{}→{}", rule.from, rule.to))
                .collect();
            format!("{basename}: {}", rules.join(", "))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// `PN17 → PN25, PN34 (backward exempt: PN35)`, or `-` without coupling.
pub fn describe_coupling(variant: &DatasetVariant) -> String {
    let Some(coupling) = &variant.consistency else {
        return "-".to_string();
    };
    let mut text = format!("{} → {}", coupling.root, coupling.dependents.join(", "));
    let mut exemptions = Vec::new();
    if !coupling.forward_exempt.is_empty() {
        let names: Vec<&str> = coupling.forward_exempt.iter().map(String::as_str).collect();
        exemptions.push(format!("forward exempt: {}", names.join(", ")));
    }
    if !coupling.backward_exempt.is_empty() {
        let names: Vec<&str> = coupling.backward_exempt.iter().map(String::as_str).collect();
        exemptions.push(format!("backward exempt: {}", names.join(", ")));
    }
    if !exemptions.is_empty() {
        text.push_str(&format!(" ({})", exemptions.join("; ")));
    }
    text
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_violation_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(180);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(12)),
            ColumnConstraint::UpperBoundary(Width::Fixed(22)),
            ColumnConstraint::UpperBoundary(Width::Fixed(16)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn rule_cell(violation: &Violation) -> Cell {
    let cell = Cell::new(violation.rule().as_str());
    if violation.rule().is_cross_field() {
        cell.fg(Color::Magenta)
    } else {
        cell.fg(Color::Red)
    }
}

fn count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn variant_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn split_examples(message: &str) -> (String, String) {
    match message.rsplit_once(" (e.g., ") {
        Some((head, tail)) => (head.to_string(), tail.trim_end_matches(')').to_string()),
        None => (message.to_string(), "-".to_string()),
    }
}

fn example_cell(value: String) -> Cell {
    if value == "-" {
        dim_cell(value)
    } else {
        Cell::new(value)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
