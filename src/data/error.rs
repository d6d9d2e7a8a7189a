use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy for loading and aggregation
// ---------------------------------------------------------------------------

/// Everything that can go wrong between a source string and a derived view.
///
/// Each variant maps to one user-facing message in the app loop; none of
/// them terminate the session.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source path or URL could not be located / opened.
    #[error("source not found: {0}")]
    NotFound(String),

    /// The source was reachable but its content is not a valid table.
    #[error("could not parse dataset: {0}")]
    Parse(String),

    /// A requested column is absent from the (normalized) header.
    #[error("no such column: {0}")]
    FieldNotFound(String),

    /// Too few valid data points for the requested statistic.
    #[error("insufficient data: {0} usable records")]
    InsufficientData(usize),
}

impl DataError {
    /// Collapse an `anyhow` context chain from the loader internals into a
    /// single parse message (`{:#}` keeps the chain readable on one line).
    pub fn parse(err: anyhow::Error) -> Self {
        DataError::Parse(format!("{err:#}"))
    }
}
