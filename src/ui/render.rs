use crate::data::aggregate::{
    CorrelationMatrix, FrequencyTable, MissingValueReport, SkillRanking,
};
use crate::views::{DerivedView, NumericSeries};

// Widest bar drawn for a ranking entry.
const BAR_WIDTH: usize = 40;

// ---------------------------------------------------------------------------
// View rendering (terminal)
// ---------------------------------------------------------------------------

/// Render a derived view as plain text. The aggregator hands over shaped
/// data; everything cosmetic happens here.
pub fn render(view: &DerivedView) -> String {
    match view {
        DerivedView::Preview { columns, rows } => render_preview(columns, rows),
        DerivedView::Frequency(table) => render_frequency(table),
        DerivedView::Correlation(matrix) => render_correlation(matrix),
        DerivedView::Skills(ranking) => render_skills(ranking),
        DerivedView::Distributions(series) => render_distributions(series),
        DerivedView::MissingValues(report) => render_missing(report),
    }
}

// ---------------------------------------------------------------------------
// Dataset preview
// ---------------------------------------------------------------------------

fn render_preview(columns: &[String], rows: &[Vec<String>]) -> String {
    // Column widths: max of header and every cell.
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(col.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format_row(columns.iter().map(String::as_str), &widths));
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

// ---------------------------------------------------------------------------
// Frequency tables (top-N and industry bars)
// ---------------------------------------------------------------------------

fn render_frequency(table: &FrequencyTable) -> String {
    if table.entries.is_empty() {
        return format!("{}: no values\n", table.field);
    }

    let label_width = table
        .entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    let max_count = table.entries.iter().map(|e| e.count).max().unwrap_or(1);

    let mut out = String::new();
    for entry in &table.entries {
        out.push_str(&format!(
            "{:<label_width$}  {:>6}  {}\n",
            entry.label,
            entry.count,
            bar(entry.count as f64, max_count as f64),
        ));
    }
    out
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "#".repeat(len)
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

fn render_correlation(matrix: &CorrelationMatrix) -> String {
    let name_width = matrix
        .fields
        .iter()
        .map(|f| f.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "{:name_width$}  {:>w$}  {:>w$}\n",
        "",
        matrix.fields[0],
        matrix.fields[1],
        w = name_width.max(6),
    ));
    for (field, row) in matrix.fields.iter().zip(&matrix.cells) {
        out.push_str(&format!(
            "{field:<name_width$}  {:>w$.3}  {:>w$.3}\n",
            row[0],
            row[1],
            w = name_width.max(6),
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Skill rankings
// ---------------------------------------------------------------------------

fn render_skills(ranking: &SkillRanking) -> String {
    if ranking.matched == 0 {
        return format!(
            "No postings with {} = {:?}.\n",
            ranking.category_field, ranking.category_value
        );
    }

    let skill_width = ranking
        .entries
        .iter()
        .map(|e| e.skill.chars().count())
        .max()
        .unwrap_or(0);
    let max_total = ranking
        .entries
        .iter()
        .map(|e| e.total)
        .fold(0.0f64, f64::max);

    let mut out = format!(
        "{} postings with {} = {:?}\n",
        ranking.matched, ranking.category_field, ranking.category_value
    );
    for entry in &ranking.entries {
        out.push_str(&format!(
            "{:<skill_width$}  {:>8}  {}\n",
            entry.skill,
            entry.total,
            bar(entry.total, max_total),
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Distribution summaries
// ---------------------------------------------------------------------------

/// Summarise each numeric series. The aggregator ships raw values; the
/// binning/summary statistics are display choices made here.
fn render_distributions(series: &[NumericSeries]) -> String {
    let mut out = String::new();
    for s in series {
        out.push_str(&format!("{}:\n", s.field));
        if s.values.is_empty() {
            out.push_str("  no numeric values\n");
            continue;
        }
        let n = s.values.len() as f64;
        let min = s.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = s.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = s.values.iter().sum::<f64>() / n;
        let var = s.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        out.push_str(&format!(
            "  n = {}, min = {min}, max = {max}, mean = {mean:.2}, std = {:.2}\n",
            s.values.len(),
            var.sqrt(),
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Missing-value report
// ---------------------------------------------------------------------------

fn render_missing(report: &MissingValueReport) -> String {
    if report.entries.is_empty() {
        return "No missing values.\n".to_string();
    }
    let width = report
        .entries
        .iter()
        .map(|e| e.column.chars().count())
        .max()
        .unwrap_or(0);
    report
        .entries
        .iter()
        .map(|e| format!("{:<width$}  {:>6}\n", e.column, e.missing))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::{FrequencyEntry, MissingCount, SkillTotal};

    #[test]
    fn frequency_rows_are_ordered_with_bars() {
        let table = FrequencyTable {
            field: "Company_Name".into(),
            entries: vec![
                FrequencyEntry { label: "TechMahindra".into(), count: 8 },
                FrequencyEntry { label: "Infosys".into(), count: 2 },
            ],
        };
        let text = render_frequency(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("TechMahindra"));
        assert!(lines[0].contains(&"#".repeat(BAR_WIDTH)));
        assert!(lines[1].contains("Infosys"));
    }

    #[test]
    fn empty_skill_match_renders_a_prompt_not_a_table() {
        let ranking = SkillRanking {
            category_field: "Designation".into(),
            category_value: "Project Manager".into(),
            matched: 0,
            entries: vec![],
        };
        assert!(render_skills(&ranking).starts_with("No postings"));
    }

    #[test]
    fn skills_table_lists_totals() {
        let ranking = SkillRanking {
            category_field: "Designation".into(),
            category_value: "Team Lead".into(),
            matched: 3,
            entries: vec![SkillTotal { skill: "Python".into(), total: 2.0 }],
        };
        let text = render_skills(&ranking);
        assert!(text.contains("3 postings"));
        assert!(text.contains("Python"));
    }

    #[test]
    fn distribution_summary_has_moments() {
        let series = vec![NumericSeries {
            field: "Total_applicants".into(),
            values: vec![10.0, 20.0, 30.0],
        }];
        let text = render_distributions(&series);
        assert!(text.contains("n = 3"));
        assert!(text.contains("mean = 20.00"));
    }

    #[test]
    fn clean_dataset_reports_no_missing_values() {
        let report = MissingValueReport { entries: vec![] };
        assert_eq!(render_missing(&report), "No missing values.\n");
        let report = MissingValueReport {
            entries: vec![MissingCount { column: "SQL".into(), missing: 4 }],
        };
        assert!(render_missing(&report).contains("SQL"));
    }
}
