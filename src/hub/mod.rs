/// Hugging Face Hub access: token handling, split listing, split download.
pub mod api;
pub mod client;
pub mod token;

#[cfg(test)]
mod test_server;

pub use client::HubClient;

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::data::model::{dataset_dir, DownloadReport};
use crate::data::writer::save_split;
use crate::error::HubError;

/// Check the token against the Hub, then store it for later sessions.
/// Returns the account name.
pub fn login(settings: &Settings, access_token: &str) -> Result<String, HubError> {
    let client = HubClient::new(settings, Some(access_token.to_string()))?;
    let user = client.whoami()?;
    token::save(&settings.token_path, access_token)?;
    log::info!("Logged in to Hugging Face as {user}");
    Ok(user)
}

/// Load `dataset[split]` and write it under `<save_location>/<dataset>`.
pub fn download(
    settings: &Settings,
    token: Option<String>,
    dataset: &str,
    split: &str,
    save_location: &Path,
) -> Result<DownloadReport> {
    let client = HubClient::new(settings, token)?;
    let loaded = client
        .load_split(dataset, split)
        .with_context(|| format!("loading {dataset}[{split}]"))?;

    let dir = dataset_dir(save_location, dataset);
    let mut warnings = Vec::new();
    if loaded.partial {
        warnings.push(format!(
            "the Parquet export of this split is partial; only the first {} rows were downloaded",
            loaded.num_rows()
        ));
    }
    warnings.extend(save_split(&loaded, &dir)?);
    Ok(DownloadReport {
        dir,
        num_rows: loaded.num_rows(),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::test_server::{self, Route};
    use super::*;
    use crate::data::writer::{CSV_FILE, INFO_FILE, JSON_FILE, PARQUET_FILE};

    fn shard_bytes(texts: &[&str], first_label: i64) -> Vec<u8> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("text", DataType::Utf8, false),
            Field::new("label", DataType::Int64, false),
        ]));
        let labels: Vec<i64> = (first_label..first_label + texts.len() as i64).collect();
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(texts.to_vec())),
                Arc::new(Int64Array::from(labels)),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(Vec::new(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.into_inner().unwrap()
    }

    /// Serves a two-shard `train` split (listed out of order) and returns the base URL.
    fn two_shard_server(partial: bool) -> String {
        let (listener, base) = test_server::bind();
        let listing = serde_json::json!({
            "parquet_files": [
                {"dataset": "org/reviews", "config": "default", "split": "train",
                 "url": format!("{base}/shards/0001.parquet"), "filename": "0001.parquet", "size": 1},
                {"dataset": "org/reviews", "config": "default", "split": "train",
                 "url": format!("{base}/shards/0000.parquet"), "filename": "0000.parquet", "size": 1}
            ],
            "pending": [],
            "failed": [],
            "partial": partial
        });
        let routes: Vec<Route> = vec![
            ("/parquet".into(), 200, listing.to_string().into_bytes()),
            ("/shards/0000.parquet".into(), 200, shard_bytes(&["a", "b"], 0)),
            ("/shards/0001.parquet".into(), 200, shard_bytes(&["c"], 2)),
        ];
        test_server::serve(listener, routes);
        base
    }

    #[test]
    fn download_writes_every_shard_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let base = two_shard_server(false);
        let settings = test_server::settings(&base, &tmp.path().join("token"));

        let report = download(&settings, None, "org/reviews", "train", tmp.path()).unwrap();
        assert_eq!(report.num_rows, 3);
        assert_eq!(report.dir, tmp.path().join("org_reviews"));
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        for name in [INFO_FILE, CSV_FILE, JSON_FILE, PARQUET_FILE] {
            assert!(report.dir.join(name).is_file(), "{name} missing");
        }

        let mut reader = csv::Reader::from_path(report.dir.join(CSV_FILE)).unwrap();
        let texts: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn partial_export_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let base = two_shard_server(true);
        let settings = test_server::settings(&base, &tmp.path().join("token"));

        let report = download(&settings, None, "org/reviews", "train", tmp.path()).unwrap();
        assert_eq!(report.num_rows, 3);
        assert_eq!(
            report.warnings,
            ["the Parquet export of this split is partial; only the first 3 rows were downloaded"]
        );
        assert!(report.message().contains("\n\nWarnings:\n- the Parquet export"));
    }

    #[test]
    fn unknown_split_fails_without_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let base = two_shard_server(false);
        let settings = test_server::settings(&base, &tmp.path().join("token"));

        let err = download(&settings, None, "org/reviews", "test", tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("split 'test' not found"), "{err:#}");
        assert!(!tmp.path().join("org_reviews").exists());
    }

    #[test]
    fn rejected_token_is_not_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let (listener, base) = test_server::bind();
        test_server::serve(
            listener,
            vec![(
                "/api/whoami-v2".into(),
                401,
                br#"{"error": "Invalid credentials in Authorization header"}"#.to_vec(),
            )],
        );
        let token_path = tmp.path().join("token");
        let settings = test_server::settings(&base, &token_path);

        let err = login(&settings, "hf_bad").unwrap_err();
        assert!(matches!(err, HubError::Unauthorized(_)), "{err}");
        assert!(!token_path.exists());
    }

    #[test]
    fn accepted_token_is_saved() {
        let tmp = tempfile::tempdir().unwrap();
        let (listener, base) = test_server::bind();
        test_server::serve(
            listener,
            vec![("/api/whoami-v2".into(), 200, br#"{"name": "ada"}"#.to_vec())],
        );
        let token_path = tmp.path().join("token");
        let settings = test_server::settings(&base, &token_path);

        assert_eq!(login(&settings, "hf_good").unwrap(), "ada");
        assert_eq!(std::fs::read_to_string(&token_path).unwrap().trim(), "hf_good");
    }
}
