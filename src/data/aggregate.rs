use std::collections::HashMap;

use serde::Serialize;

use super::error::DataError;
use super::model::JobDataset;

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Top-N frequency table for one categorical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    pub field: String,
    /// Descending by count; equal counts keep first-seen order.
    pub entries: Vec<FrequencyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub label: String,
    pub count: u64,
}

/// 2×2 Pearson matrix over two numeric columns. Diagonal is exactly 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub fields: [String; 2],
    pub cells: [[f64; 2]; 2],
}

/// Skill totals for one category value, top `limit` by descending sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillRanking {
    pub category_field: String,
    pub category_value: String,
    /// How many records matched the category filter.
    pub matched: usize,
    pub entries: Vec<SkillTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillTotal {
    pub skill: String,
    pub total: f64,
}

/// Null counts per column, restricted to columns with at least one null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingValueReport {
    pub entries: Vec<MissingCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: u64,
}

// ---------------------------------------------------------------------------
// Aggregations – pure functions over an immutable dataset
// ---------------------------------------------------------------------------

/// Count occurrences of each distinct value of `field` and keep the top `n`.
///
/// Missing values count under their own `<null>` label rather than being
/// dropped. The sort is stable, so equal counts preserve the order in which
/// the labels first appear in the data.
pub fn top_n(dataset: &JobDataset, field: &str, n: usize) -> Result<FrequencyTable, DataError> {
    let idx = dataset.column_index(field)?;

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in &dataset.rows {
        let label = row[idx].to_string();
        if !counts.contains_key(&label) {
            order.push(label.clone());
        }
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut entries: Vec<FrequencyEntry> = order
        .into_iter()
        .map(|label| {
            let count = counts[&label];
            FrequencyEntry { label, count }
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(n);

    Ok(FrequencyTable {
        field: field.to_string(),
        entries,
    })
}

/// [`top_n`] under the name the industry view consumes it by (the renderer
/// draws it as ordered bars rather than a count list).
pub fn industry_frequency(
    dataset: &JobDataset,
    field: &str,
    top_k: usize,
) -> Result<FrequencyTable, DataError> {
    top_n(dataset, field, top_k)
}

/// Pearson correlation between two numeric columns, pairwise-complete-case:
/// a record contributes only when both cells are numeric.
///
/// Fewer than 2 complete pairs, or a zero-variance column, leave the
/// coefficient undefined and fail with [`DataError::InsufficientData`].
pub fn correlation(
    dataset: &JobDataset,
    field_a: &str,
    field_b: &str,
) -> Result<CorrelationMatrix, DataError> {
    let ia = dataset.column_index(field_a)?;
    let ib = dataset.column_index(field_b)?;

    let pairs: Vec<(f64, f64)> = dataset
        .rows
        .iter()
        .filter_map(|row| Some((row[ia].as_f64()?, row[ib].as_f64()?)))
        .collect();
    if pairs.len() < 2 {
        return Err(DataError::InsufficientData(pairs.len()));
    }

    let r = if ia == ib { 1.0 } else { pearson(&pairs)? };
    Ok(CorrelationMatrix {
        fields: [field_a.to_string(), field_b.to_string()],
        cells: [[1.0, r], [r, 1.0]],
    })
}

fn pearson(pairs: &[(f64, f64)]) -> Result<f64, DataError> {
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        // A constant column has no defined correlation.
        return Err(DataError::InsufficientData(pairs.len()));
    }
    // Guard the quotient against floating-point drift past ±1.
    Ok((cov / denom).clamp(-1.0, 1.0))
}

/// Sum every configured skill column over the records whose
/// `category_field` equals `category_value`; keep the top `limit` skills.
///
/// Indicator cells are read numerically (bools as 0/1); non-numeric and
/// missing cells add 0. No matching records is an empty ranking, not an
/// error.
pub fn skill_ranking(
    dataset: &JobDataset,
    category_field: &str,
    category_value: &str,
    limit: usize,
) -> Result<SkillRanking, DataError> {
    let idx = dataset.column_index(category_field)?;
    let skills = dataset.skill_indices();

    let mut totals = vec![0.0f64; skills.len()];
    let mut matched = 0usize;
    for row in &dataset.rows {
        if !row[idx].matches(category_value) {
            continue;
        }
        matched += 1;
        for (slot, &col) in totals.iter_mut().zip(skills) {
            *slot += row[col].as_f64().unwrap_or(0.0);
        }
    }

    let mut entries = Vec::new();
    if matched > 0 {
        entries = dataset
            .skill_names()
            .into_iter()
            .zip(&totals)
            .map(|(skill, &total)| SkillTotal {
                skill: skill.to_string(),
                total,
            })
            .collect();
        entries.sort_by(|a, b| b.total.total_cmp(&a.total));
        entries.truncate(limit);
    }

    Ok(SkillRanking {
        category_field: category_field.to_string(),
        category_value: category_value.to_string(),
        matched,
        entries,
    })
}

/// The raw, in-order numeric values of a column; non-numeric and missing
/// cells are excluded. Distribution binning is the renderer's job.
pub fn numeric_column(dataset: &JobDataset, field: &str) -> Result<Vec<f64>, DataError> {
    let idx = dataset.column_index(field)?;
    Ok(dataset
        .rows
        .iter()
        .filter_map(|row| row[idx].as_f64())
        .collect())
}

/// Null count per column, omitting clean columns.
pub fn missing_values(dataset: &JobDataset) -> MissingValueReport {
    let mut counts = vec![0u64; dataset.columns.len()];
    for row in &dataset.rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.is_null() {
                counts[i] += 1;
            }
        }
    }

    let entries = dataset
        .columns
        .iter()
        .zip(counts)
        .filter(|(_, missing)| *missing > 0)
        .map(|(column, missing)| MissingCount {
            column: column.clone(),
            missing,
        })
        .collect();
    MissingValueReport { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, SkillColumns};

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn i(v: i64) -> CellValue {
        CellValue::Integer(v)
    }

    fn dataset(columns: &[&str], rows: Vec<Vec<CellValue>>, skill_start: usize) -> JobDataset {
        JobDataset::from_parts(
            columns.iter().map(|c| c.to_string()).collect(),
            rows,
            &SkillColumns::StartIndex(skill_start),
        )
        .unwrap()
    }

    fn postings() -> JobDataset {
        // Columns 2.. are skill indicators.
        dataset(
            &["Designation", "Total applicants", "Python", "SQL", "Agile"],
            vec![
                vec![s("Team Lead"), i(20), i(1), i(1), i(0)],
                vec![s("Project Manager"), i(5), i(0), i(1), i(1)],
                vec![s("Team Lead"), i(40), i(1), CellValue::Null, i(1)],
                vec![s("Team Lead"), i(60), i(0), i(1), i(1)],
            ],
            2,
        )
    }

    #[test]
    fn top_n_counts_distinct_values() {
        let ds = dataset(
            &["Company"],
            vec![vec![s("A")], vec![s("A")], vec![s("B")]],
            0,
        );
        let table = top_n(&ds, "Company", 10).unwrap();
        assert_eq!(
            table.entries,
            vec![
                FrequencyEntry { label: "A".into(), count: 2 },
                FrequencyEntry { label: "B".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn top_n_is_stable_on_ties_and_caps_at_n() {
        let ds = dataset(
            &["Location"],
            vec![
                vec![s("Pune")],
                vec![s("Delhi")],
                vec![s("Pune")],
                vec![s("Delhi")],
                vec![s("Goa")],
            ],
            0,
        );
        let table = top_n(&ds, "Location", 2).unwrap();
        // Pune and Delhi tie at 2; Pune appeared first. Goa is cut.
        assert_eq!(table.entries[0].label, "Pune");
        assert_eq!(table.entries[1].label, "Delhi");
        assert_eq!(table.entries.len(), 2);
    }

    #[test]
    fn top_n_counts_missing_as_own_category() {
        let ds = dataset(
            &["Industry"],
            vec![vec![s("IT")], vec![CellValue::Null], vec![CellValue::Null]],
            0,
        );
        let table = top_n(&ds, "Industry", 10).unwrap();
        assert_eq!(table.entries[0].label, "<null>");
        assert_eq!(table.entries[0].count, 2);
    }

    #[test]
    fn top_n_on_absent_field_fails() {
        let ds = postings();
        assert!(matches!(
            top_n(&ds, "Salary", 10),
            Err(DataError::FieldNotFound(_))
        ));
    }

    #[test]
    fn self_correlation_is_exactly_one() {
        let ds = postings();
        let m = correlation(&ds, "Total_applicants", "Total_applicants").unwrap();
        assert_eq!(m.cells, [[1.0, 1.0], [1.0, 1.0]]);
    }

    #[test]
    fn correlation_stays_in_range() {
        let ds = postings();
        let m = correlation(&ds, "Total_applicants", "Python").unwrap();
        let r = m.cells[0][1];
        assert!((-1.0..=1.0).contains(&r));
        assert_eq!(m.cells[1][0], r);
        assert_eq!(m.cells[0][0], 1.0);
    }

    #[test]
    fn perfectly_linear_pairs_give_one() {
        let ds = dataset(
            &["x", "y"],
            vec![
                vec![i(1), i(2)],
                vec![i(2), i(4)],
                vec![s("n/a"), i(99)], // incomplete pair, skipped
                vec![i(3), i(6)],
            ],
            0,
        );
        let m = correlation(&ds, "x", "y").unwrap();
        assert!((m.cells[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_complete_pair_is_insufficient() {
        let ds = dataset(
            &["x", "y"],
            vec![
                vec![i(1), i(2)],
                vec![i(2), CellValue::Null],
                vec![CellValue::Null, i(3)],
            ],
            0,
        );
        assert!(matches!(
            correlation(&ds, "x", "y"),
            Err(DataError::InsufficientData(1))
        ));
    }

    #[test]
    fn constant_column_is_insufficient() {
        let ds = dataset(
            &["x", "y"],
            vec![vec![i(7), i(1)], vec![i(7), i(2)], vec![i(7), i(3)]],
            0,
        );
        assert!(matches!(
            correlation(&ds, "x", "y"),
            Err(DataError::InsufficientData(_))
        ));
    }

    #[test]
    fn skill_ranking_sums_and_ranks() {
        let ds = postings();
        let ranking = skill_ranking(&ds, "Designation", "Team Lead", 2).unwrap();
        assert_eq!(ranking.matched, 3);
        // SQL and Python both sum to 2 over the three Team Lead rows (the
        // null SQL cell adds 0); Python wins the tie by column order.
        assert_eq!(ranking.entries.len(), 2);
        assert_eq!(ranking.entries[0].skill, "Python");
        assert_eq!(ranking.entries[0].total, 2.0);
        assert_eq!(ranking.entries[1].skill, "SQL");
        assert_eq!(ranking.entries[1].total, 2.0);
    }

    #[test]
    fn skill_ranking_with_no_matches_is_empty() {
        let ds = postings();
        let ranking = skill_ranking(&ds, "Designation", "Data Engineer", 5).unwrap();
        assert_eq!(ranking.matched, 0);
        assert!(ranking.entries.is_empty());
    }

    #[test]
    fn numeric_column_drops_non_numeric() {
        let ds = dataset(
            &["Followers"],
            vec![
                vec![i(100)],
                vec![CellValue::Null],
                vec![s("unknown")],
                vec![CellValue::Float(2.5)],
            ],
            0,
        );
        assert_eq!(numeric_column(&ds, "Followers").unwrap(), vec![100.0, 2.5]);
    }

    #[test]
    fn missing_values_skips_clean_columns() {
        let ds = postings();
        let report = missing_values(&ds);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].column, "SQL");
        assert_eq!(report.entries[0].missing, 1);
    }
}
