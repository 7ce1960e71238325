use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::api::{self, ParquetResponse, SplitsResponse, WhoAmI};
use crate::config::Settings;
use crate::data::loader::read_parquet;
use crate::data::model::LoadedSplit;
use crate::error::HubError;

const USER_AGENT: &str = concat!("dataset-fetcher/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Blocking Hub client (runs on a worker thread)
// ---------------------------------------------------------------------------

/// Talks to the Hub and datasets-server, with an optional bearer token.
pub struct HubClient {
    http: Client,
    hub_endpoint: String,
    datasets_server: String,
    token: Option<String>,
}

impl HubClient {
    pub fn new(settings: &Settings, token: Option<String>) -> Result<Self, HubError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            // Shards can be large; only the connect phase is bounded.
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            http,
            hub_endpoint: settings.hub_endpoint.clone(),
            datasets_server: settings.datasets_server.clone(),
            token,
        })
    }

    /// Account name behind the token. Fails when no token is set.
    pub fn whoami(&self) -> Result<String, HubError> {
        if self.token.is_none() {
            return Err(HubError::MissingToken);
        }
        let url = format!("{}/api/whoami-v2", self.hub_endpoint);
        let who: WhoAmI = self.get_json(&url, &[])?;
        Ok(who.name)
    }

    /// Split names of the dataset's default config.
    pub fn split_names(&self, dataset: &str) -> Result<Vec<String>, HubError> {
        let url = format!("{}/splits", self.datasets_server);
        let resp: SplitsResponse = self.get_json(&url, &[("dataset", dataset)])?;
        api::split_names(dataset, &resp)
    }

    /// Download every Parquet shard of `split` and decode it into memory.
    pub fn load_split(&self, dataset: &str, split: &str) -> Result<LoadedSplit, HubError> {
        let url = format!("{}/parquet", self.datasets_server);
        let listing: ParquetResponse = self.get_json(&url, &[("dataset", dataset)])?;
        let files = api::split_files(dataset, split, &listing)?;

        let mut shards = Vec::with_capacity(files.len());
        for file in files {
            log::info!(
                "Fetching {dataset}[{split}] shard {} ({} bytes)",
                file.filename,
                file.size
            );
            let body = self.get(&file.url, &[])?.bytes()?;
            let shard = read_parquet(body)?;
            log::debug!("Decoded {} rows from {}", shard.num_rows(), file.filename);
            shards.push((file.filename, shard));
        }

        let mut loaded = LoadedSplit::from_shards(dataset, split, shards)?;
        if listing.partial {
            log::warn!("Parquet export of {dataset} is partial; {split} is incomplete");
            loaded.partial = true;
        }
        Ok(loaded)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, HubError> {
        Ok(self.get(url, query)?.json()?)
    }

    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response, HubError> {
        log::debug!("GET {url} {query:?}");
        let mut req = self.http.get(url).query(query);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send()?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(HubError::Unauthorized(url.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(HubError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: api::error_message(&body),
            });
        }
        Ok(resp)
    }
}
