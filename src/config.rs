use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Runtime settings, read once from the environment
// ---------------------------------------------------------------------------

pub const DEFAULT_HUB_ENDPOINT: &str = "https://huggingface.co";
pub const DEFAULT_DATASETS_SERVER: &str = "https://datasets-server.huggingface.co";
pub const DEFAULT_AICROWD_PROGRAM: &str = "aicrowd";

/// Endpoints and program names used by both forms.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Hugging Face Hub base URL (`HF_ENDPOINT`).
    pub hub_endpoint: String,
    /// datasets-server base URL (`HF_DATASETS_SERVER`).
    pub datasets_server: String,
    /// Token from `HF_TOKEN`, takes precedence over the token file.
    pub env_token: Option<String>,
    /// Where `login` stores the token (hf-hub cache layout, honours `HF_HOME`).
    pub token_path: PathBuf,
    /// Program invoked for AIcrowd actions (`AICROWD_CLI`).
    pub aicrowd_program: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            hub_endpoint: env_or("HF_ENDPOINT", DEFAULT_HUB_ENDPOINT),
            datasets_server: env_or("HF_DATASETS_SERVER", DEFAULT_DATASETS_SERVER),
            env_token: non_blank_env("HF_TOKEN"),
            token_path: hf_hub::Cache::default().token_path(),
            aicrowd_program: env_or("AICROWD_CLI", DEFAULT_AICROWD_PROGRAM),
        }
    }

    /// Settings with default endpoints and an explicit token file.
    #[cfg(test)]
    pub fn with_token_path(token_path: PathBuf) -> Self {
        Self {
            hub_endpoint: DEFAULT_HUB_ENDPOINT.to_string(),
            datasets_server: DEFAULT_DATASETS_SERVER.to_string(),
            env_token: None,
            token_path,
            aicrowd_program: DEFAULT_AICROWD_PROGRAM.to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    non_blank_env(key)
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
