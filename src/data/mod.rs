/// Data layer: core types, loading, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet / http(s) URL
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → JobDataset (normalized header,
///   └──────────┘  validated skill columns)
///        │
///        ▼
///   ┌────────────┐
///   │ JobDataset  │  ordered columns, row-major cells
///   └────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  pure functions → frequency tables, correlation,
///   └───────────┘  skill rankings, numeric series
/// ```
pub mod aggregate;
pub mod error;
pub mod loader;
pub mod model;
