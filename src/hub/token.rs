use std::path::Path;

use crate::config::Settings;

/// Token already present on this machine: `HF_TOKEN`, then the hf-hub token file.
pub fn discover(settings: &Settings) -> Option<String> {
    if let Some(token) = &settings.env_token {
        return Some(token.clone());
    }
    read(&settings.token_path)
}

pub fn read(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Persist the token where `huggingface-cli login` and hf-hub look for it.
pub fn save(path: &Path, token: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, token)?;
    log::info!("Saved Hugging Face token to {}", path.display());
    Ok(())
}
