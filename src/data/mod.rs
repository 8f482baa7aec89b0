/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (fails closed to an empty one)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Row>, headers, filterable columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ FilterEngine  │  selections → filtered rows + per-column options
///   └──────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
