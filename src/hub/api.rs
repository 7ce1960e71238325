use serde::Deserialize;

use crate::error::HubError;

// ---------------------------------------------------------------------------
// datasets-server / Hub response payloads
// ---------------------------------------------------------------------------

/// `GET /splits?dataset=…`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SplitsResponse {
    #[serde(default)]
    pub splits: Vec<SplitEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitEntry {
    pub config: String,
    pub split: String,
}

/// `GET /parquet?dataset=…`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParquetResponse {
    #[serde(default)]
    pub parquet_files: Vec<ParquetFile>,
    /// Set when the export only covers the first part of large splits.
    #[serde(default)]
    pub partial: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParquetFile {
    pub config: String,
    pub split: String,
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub size: u64,
}

/// `GET /api/whoami-v2`
#[derive(Debug, Clone, Deserialize)]
pub struct WhoAmI {
    pub name: String,
}

/// Error bodies look like `{"error": "..."}` on both services.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) => body.trim().chars().take(200).collect(),
    }
}

// ---------------------------------------------------------------------------
// Config / split selection
// ---------------------------------------------------------------------------

/// The config a split-only request refers to: `default` when the dataset has
/// one, otherwise the first listed.
pub fn preferred_config<'a>(configs: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut first = None;
    for config in configs {
        if config == "default" {
            return Some(config);
        }
        if first.is_none() {
            first = Some(config);
        }
    }
    first
}

/// Split names of the preferred config, in listed order, without duplicates.
pub fn split_names(dataset: &str, resp: &SplitsResponse) -> Result<Vec<String>, HubError> {
    let config = preferred_config(resp.splits.iter().map(|s| s.config.as_str()))
        .ok_or_else(|| HubError::NoSplits(dataset.to_string()))?;

    let mut names: Vec<String> = Vec::new();
    for entry in resp.splits.iter().filter(|s| s.config == config) {
        if !names.contains(&entry.split) {
            names.push(entry.split.clone());
        }
    }
    Ok(names)
}

/// Parquet files making up `split` of the preferred config, sorted by filename.
pub fn split_files(
    dataset: &str,
    split: &str,
    resp: &ParquetResponse,
) -> Result<Vec<ParquetFile>, HubError> {
    let config = preferred_config(resp.parquet_files.iter().map(|f| f.config.as_str()))
        .ok_or_else(|| HubError::NoSplits(dataset.to_string()))?;

    let in_config: Vec<&ParquetFile> = resp
        .parquet_files
        .iter()
        .filter(|f| f.config == config)
        .collect();

    let mut files: Vec<ParquetFile> = in_config
        .iter()
        .filter(|f| f.split == split)
        .map(|f| (*f).clone())
        .collect();

    if files.is_empty() {
        let mut available: Vec<&str> = Vec::new();
        for file in &in_config {
            if !available.contains(&file.split.as_str()) {
                available.push(file.split.as_str());
            }
        }
        return Err(HubError::UnknownSplit {
            dataset: dataset.to_string(),
            split: split.to_string(),
            available: available.join(", "),
        });
    }

    files.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(files)
}
