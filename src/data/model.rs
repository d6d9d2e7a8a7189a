use std::fmt;

use super::error::DataError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the postings table
// ---------------------------------------------------------------------------

/// A dynamically-typed table cell mirroring common tabular dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric reading of the cell. Booleans are skill indicators, so they
    /// count as 0/1; strings and nulls are non-numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Equality against a user-supplied label (category filters compare
    /// against strings regardless of the underlying dtype).
    pub fn matches(&self, label: &str) -> bool {
        match self {
            CellValue::String(s) => s == label,
            other => other.to_string() == label,
        }
    }
}

// ---------------------------------------------------------------------------
// Column-name normalization
// ---------------------------------------------------------------------------

/// Replace every whitespace run with a single underscore.
///
/// Applied to the header before any column lookup; all field references in
/// the rest of the crate use normalized names. Idempotent.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_whitespace = false;
    for ch in raw.chars() {
        if ch.is_whitespace() {
            in_whitespace = true;
        } else {
            if in_whitespace {
                out.push('_');
                in_whitespace = false;
            }
            out.push(ch);
        }
    }
    if in_whitespace {
        out.push('_');
    }
    out
}

// ---------------------------------------------------------------------------
// Skill-column configuration
// ---------------------------------------------------------------------------

/// Which columns hold skill indicators. Validated when the dataset is
/// built, so a bad assumption fails at load time instead of mid-view.
#[derive(Debug, Clone, PartialEq)]
pub enum SkillColumns {
    /// Every column from this index onward is a skill indicator.
    StartIndex(usize),
    /// An explicit list of (normalized) column names.
    Named(Vec<String>),
}

// ---------------------------------------------------------------------------
// JobDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset: ordered normalized columns, row-major records,
/// and the validated skill-column positions. Immutable after load; every
/// aggregation borrows it.
#[derive(Debug, Clone)]
pub struct JobDataset {
    /// Normalized column names, in source order.
    pub columns: Vec<String>,
    /// One `Vec<CellValue>` per record, aligned with `columns`.
    pub rows: Vec<Vec<CellValue>>,
    /// Indices into `columns` for the skill-indicator columns.
    skill_indices: Vec<usize>,
}

impl JobDataset {
    /// Assemble a dataset from raw header names and rows.
    ///
    /// Normalizes the header and validates the skill configuration against
    /// it; an out-of-range start index or unknown skill name is a
    /// [`DataError::FieldNotFound`].
    pub fn from_parts(
        raw_columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
        skills: &SkillColumns,
    ) -> Result<Self, DataError> {
        let columns: Vec<String> = raw_columns.iter().map(|c| normalize_name(c)).collect();

        let skill_indices = match skills {
            SkillColumns::StartIndex(start) => {
                if *start >= columns.len() {
                    return Err(DataError::FieldNotFound(format!(
                        "skill columns from index {start} (table has {} columns)",
                        columns.len()
                    )));
                }
                (*start..columns.len()).collect()
            }
            SkillColumns::Named(names) => names
                .iter()
                .map(|name| {
                    columns
                        .iter()
                        .position(|c| c == name)
                        .ok_or_else(|| DataError::FieldNotFound(name.clone()))
                })
                .collect::<Result<Vec<usize>, DataError>>()?,
        };

        Ok(JobDataset {
            columns,
            rows,
            skill_indices,
        })
    }

    /// Position of a (normalized) column name.
    pub fn column_index(&self, field: &str) -> Result<usize, DataError> {
        self.columns
            .iter()
            .position(|c| c == field)
            .ok_or_else(|| DataError::FieldNotFound(field.to_string()))
    }

    /// Names of the configured skill columns, in table order.
    pub fn skill_names(&self) -> Vec<&str> {
        self.skill_indices
            .iter()
            .map(|&i| self.columns[i].as_str())
            .collect()
    }

    /// Indices of the configured skill columns.
    pub fn skill_indices(&self) -> &[usize] {
        &self.skill_indices
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_runs() {
        assert_eq!(normalize_name("Company Name"), "Company_Name");
        assert_eq!(normalize_name("Total \t applicants"), "Total_applicants");
        assert_eq!(normalize_name("Designation"), "Designation");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["Company Name", "LinkedIn  Followers", " padded ", "ok"] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn bool_cells_read_as_indicators() {
        assert_eq!(CellValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(CellValue::Bool(false).as_f64(), Some(0.0));
        assert_eq!(CellValue::String("yes".into()).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }

    #[test]
    fn start_index_out_of_range_is_field_not_found() {
        let err = JobDataset::from_parts(
            vec!["Company Name".into(), "Designation".into()],
            Vec::new(),
            &SkillColumns::StartIndex(2),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::FieldNotFound(_)));
    }

    #[test]
    fn named_skills_resolve_against_normalized_header() {
        let ds = JobDataset::from_parts(
            vec!["Company Name".into(), "Python".into(), "SQL".into()],
            Vec::new(),
            &SkillColumns::Named(vec!["Python".into(), "SQL".into()]),
        )
        .unwrap();
        assert_eq!(ds.skill_names(), vec!["Python", "SQL"]);
        assert_eq!(ds.column_index("Company_Name").unwrap(), 0);
    }

    #[test]
    fn unknown_named_skill_is_field_not_found() {
        let err = JobDataset::from_parts(
            vec!["Company".into()],
            Vec::new(),
            &SkillColumns::Named(vec!["Rust".into()]),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::FieldNotFound(name) if name == "Rust"));
    }
}
