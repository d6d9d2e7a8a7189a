use serde::Serialize;

use crate::data::aggregate::{
    self, CorrelationMatrix, FrequencyTable, MissingValueReport, SkillRanking,
};
use crate::data::error::DataError;
use crate::data::model::JobDataset;

// ---------------------------------------------------------------------------
// View configuration
// ---------------------------------------------------------------------------

/// Field names, limits, and spotlight roles the stock views are built from.
///
/// Everything dataset-specific lives here instead of inside the aggregator:
/// the columns to chart, how many entries each ranking keeps, and which
/// designations get a dedicated skills view.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub preview_rows: usize,
    pub top_limit: usize,
    pub industry_limit: usize,
    pub skill_limit: usize,
    pub company_field: String,
    pub designation_field: String,
    pub location_field: String,
    pub industry_field: String,
    pub follower_field: String,
    pub applicant_field: String,
    /// Designations that get a per-role skills view.
    pub roles: Vec<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            top_limit: 10,
            industry_limit: 4,
            skill_limit: 5,
            company_field: "Company_Name".into(),
            designation_field: "Designation".into(),
            location_field: "Location".into(),
            industry_field: "Industry".into(),
            follower_field: "LinkedIn_Followers".into(),
            applicant_field: "Total_applicants".into(),
            roles: vec![
                "Project Manager".into(),
                "Team Lead".into(),
                "Associate Tech Specialist".into(),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// The shaped data a renderer receives. Serializable so renderers outside
/// this process can consume it too.
#[derive(Debug, Clone, Serialize)]
pub enum DerivedView {
    Preview {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Frequency(FrequencyTable),
    Correlation(CorrelationMatrix),
    Skills(SkillRanking),
    Distributions(Vec<NumericSeries>),
    MissingValues(MissingValueReport),
}

/// Raw in-order values of one numeric column; the renderer does its own
/// summarising/binning.
#[derive(Debug, Clone, Serialize)]
pub struct NumericSeries {
    pub field: String,
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// View registry: id → pure builder
// ---------------------------------------------------------------------------

type ViewBuilder = Box<dyn Fn(&JobDataset) -> Result<DerivedView, DataError>>;

/// One selectable section: a stable id, a human title, and a pure builder
/// over the loaded dataset.
pub struct ViewDef {
    pub id: String,
    pub title: String,
    builder: ViewBuilder,
}

impl ViewDef {
    fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        builder: impl Fn(&JobDataset) -> Result<DerivedView, DataError> + 'static,
    ) -> Self {
        ViewDef {
            id: id.into(),
            title: title.into(),
            builder: Box::new(builder),
        }
    }

    pub fn build(&self, dataset: &JobDataset) -> Result<DerivedView, DataError> {
        (self.builder)(dataset)
    }
}

/// Build the ordered view list for a configuration. Selection is an id
/// lookup into this list; the aggregator knows nothing about dispatch.
pub fn view_registry(config: &ViewConfig) -> Vec<ViewDef> {
    let mut views = Vec::new();

    let preview_rows = config.preview_rows;
    views.push(ViewDef::new("preview", "Dataset Preview", move |ds| {
        Ok(preview(ds, preview_rows))
    }));

    let top = config.top_limit;
    for (id, noun, field) in [
        ("top-companies", "Companies", &config.company_field),
        ("top-designations", "Designations", &config.designation_field),
        ("top-locations", "Locations", &config.location_field),
    ] {
        let field = field.clone();
        views.push(ViewDef::new(
            id,
            format!("Top {top} {noun} with Most Job Listings"),
            move |ds| aggregate::top_n(ds, &field, top).map(DerivedView::Frequency),
        ));
    }

    let a = config.follower_field.clone();
    let b = config.applicant_field.clone();
    views.push(ViewDef::new(
        "correlation",
        format!("Correlation Between {a} and {b}"),
        move |ds| aggregate::correlation(ds, &a, &b).map(DerivedView::Correlation),
    ));

    for role in &config.roles {
        let field = config.designation_field.clone();
        let value = role.clone();
        let limit = config.skill_limit;
        views.push(ViewDef::new(
            format!("skills-{}", slug(role)),
            format!("Top {limit} Skills for {role}"),
            move |ds| {
                aggregate::skill_ranking(ds, &field, &value, limit).map(DerivedView::Skills)
            },
        ));
    }

    let industry_field = config.industry_field.clone();
    let industry_limit = config.industry_limit;
    views.push(ViewDef::new(
        "top-industries",
        format!("Top {industry_limit} Industries with Most Job Listings"),
        move |ds| {
            aggregate::industry_frequency(ds, &industry_field, industry_limit)
                .map(DerivedView::Frequency)
        },
    ));

    views.push(ViewDef::new(
        "missing-values",
        "Missing Values per Column",
        |ds| Ok(DerivedView::MissingValues(aggregate::missing_values(ds))),
    ));

    let numeric_fields = vec![config.applicant_field.clone(), config.follower_field.clone()];
    views.push(ViewDef::new(
        "distributions",
        "Outlier Distributions",
        move |ds| {
            numeric_fields
                .iter()
                .map(|field| {
                    aggregate::numeric_column(ds, field).map(|values| NumericSeries {
                        field: field.clone(),
                        values,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(DerivedView::Distributions)
        },
    ));

    views
}

fn preview(dataset: &JobDataset, limit: usize) -> DerivedView {
    DerivedView::Preview {
        columns: dataset.columns.clone(),
        rows: dataset
            .rows
            .iter()
            .take(limit)
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    }
}

fn slug(label: &str) -> String {
    label
        .split_whitespace()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
