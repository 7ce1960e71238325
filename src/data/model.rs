use std::path::{Path, PathBuf};

use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::HubError;

/// Schema metadata key under which `datasets` stores its feature definitions.
pub const HF_METADATA_KEY: &str = "huggingface";

// ---------------------------------------------------------------------------
// Shard – one decoded Parquet file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Shard {
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl Shard {
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

// ---------------------------------------------------------------------------
// LoadedSplit – a whole split held in memory
// ---------------------------------------------------------------------------

/// All rows of one dataset split, in shard order.
#[derive(Debug, Clone)]
pub struct LoadedSplit {
    pub dataset: String,
    pub split: String,
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
    /// Human-readable feature schema, written verbatim to the descriptor.
    pub features: String,
    /// Only the first part of the split was exported, so rows are missing.
    pub partial: bool,
}

impl LoadedSplit {
    /// Concatenate decoded shards. Every shard must carry the first one's columns.
    pub fn from_shards(
        dataset: &str,
        split: &str,
        shards: Vec<(String, Shard)>,
    ) -> Result<Self, HubError> {
        let mut shards = shards.into_iter();
        let Some((_, first)) = shards.next() else {
            return Err(HubError::UnknownSplit {
                dataset: dataset.to_string(),
                split: split.to_string(),
                available: "none".to_string(),
            });
        };

        let schema = first.schema;
        let mut batches = first.batches;
        for (file, shard) in shards {
            if shard.schema.fields() != schema.fields() {
                return Err(HubError::SchemaMismatch { file });
            }
            batches.extend(shard.batches);
        }

        Ok(LoadedSplit {
            dataset: dataset.to_string(),
            split: split.to_string(),
            features: features_description(&schema),
            schema,
            batches,
            partial: false,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Descriptor written next to the data files.
    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            num_rows: self.num_rows(),
            features: self.features.clone(),
            split: self.split.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetInfo – the `dataset_info.json` sidecar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub num_rows: usize,
    pub features: String,
    pub split: String,
}

/// Outcome of a finished Hugging Face download.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub dir: PathBuf,
    pub num_rows: usize,
    /// Incomplete data or formats that could not be written, one line each.
    pub warnings: Vec<String>,
}

impl DownloadReport {
    pub fn message(&self) -> String {
        let mut msg = format!(
            "Dataset downloaded successfully!\nLocation: {}\nNumber of rows: {}",
            self.dir.display(),
            self.num_rows
        );
        if !self.warnings.is_empty() {
            msg.push_str("\n\nWarnings:");
            for w in &self.warnings {
                msg.push_str("\n- ");
                msg.push_str(w);
            }
        }
        msg
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Prefer the feature definitions embedded by `datasets`, else describe the
/// Arrow columns as `{'name': DataType, ...}`.
pub fn features_description(schema: &Schema) -> String {
    if let Some(features) = schema
        .metadata()
        .get(HF_METADATA_KEY)
        .map(String::as_str)
        .and_then(embedded_features)
    {
        return features;
    }

    let columns: Vec<String> = schema
        .fields()
        .iter()
        .map(|f| format!("'{}': {}", f.name(), f.data_type()))
        .collect();
    format!("{{{}}}", columns.join(", "))
}

fn embedded_features(raw: &str) -> Option<String> {
    let meta: JsonValue = serde_json::from_str(raw).ok()?;
    let features = meta.get("info")?.get("features")?;
    Some(features.to_string())
}

/// `<save location>/<owner_name>`: slashes in the repo id become underscores.
pub fn dataset_dir(save_location: &Path, dataset: &str) -> PathBuf {
    save_location.join(dataset.replace('/', "_"))
}
