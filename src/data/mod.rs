/// Data layer: decoded splits, Parquet shard loading, on-disk export.
///
/// Architecture:
/// ```text
///  Parquet shards (HTTP bodies)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode shard → Shard (schema + batches)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ LoadedSplit  │  concatenated batches, feature description
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  writer   │  dataset_info.json, .csv, .json, .parquet
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;
