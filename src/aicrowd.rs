use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Form input → validated request
// ---------------------------------------------------------------------------

/// How the comma-separated items are interpreted by `aicrowd dataset download`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadMode {
    #[default]
    Index,
    Filename,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub api_key: String,
    pub challenge: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub api_key: String,
    pub challenge: String,
    pub dir: PathBuf,
    pub items: Vec<String>,
}

pub fn list_request(api_key: &str, challenge: &str) -> Result<ListRequest, ValidationError> {
    let (api_key, challenge) = (api_key.trim(), challenge.trim());
    if api_key.is_empty() || challenge.is_empty() {
        return Err(ValidationError::new(
            "Please provide API key and challenge name",
        ));
    }
    Ok(ListRequest {
        api_key: api_key.to_string(),
        challenge: challenge.to_string(),
    })
}

pub fn download_request(
    api_key: &str,
    challenge: &str,
    dir: &str,
    raw_items: &str,
    mode: DownloadMode,
) -> Result<DownloadRequest, ValidationError> {
    let fields = [api_key, challenge, dir, raw_items];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(ValidationError::new("Please fill in all fields"));
    }

    let dir = PathBuf::from(dir.trim());
    if !dir.is_dir() {
        return Err(ValidationError::new(format!(
            "Download location does not exist: {}",
            dir.display()
        )));
    }

    Ok(DownloadRequest {
        api_key: api_key.trim().to_string(),
        challenge: challenge.trim().to_string(),
        dir,
        items: parse_items(raw_items, mode)?,
    })
}

/// Split on commas, trim, drop empty entries. Index mode only takes integers.
pub fn parse_items(raw: &str, mode: DownloadMode) -> Result<Vec<String>, ValidationError> {
    let items: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if items.is_empty() {
        return Err(ValidationError::new("Please enter at least one index or filename"));
    }
    if mode == DownloadMode::Index {
        if let Some(bad) = items.iter().find(|s| s.parse::<u32>().is_err()) {
            return Err(ValidationError::new(format!(
                "'{bad}' is not a dataset index (switch to \"Download by Filename\"?)"
            )));
        }
    }
    Ok(items)
}

// ---------------------------------------------------------------------------
// CLI invocations
// ---------------------------------------------------------------------------

/// One run of the AIcrowd CLI: argument vector, optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
}

/// Captured result of an invocation; `text` is stdout followed by stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub text: String,
}

impl Invocation {
    fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            current_dir: None,
        }
    }

    pub fn login(program: &str, api_key: &str) -> Self {
        Self::new(program, &["login", "--api-key", api_key])
    }

    pub fn list(program: &str, challenge: &str) -> Self {
        Self::new(program, &["dataset", "list", "--challenge", challenge])
    }

    /// Items are passed as separate arguments, so filenames with spaces need no quoting.
    pub fn download(program: &str, challenge: &str, items: &[String], dir: &Path) -> Self {
        let mut inv = Self::new(program, &["dataset", "download", "--challenge", challenge]);
        inv.args.extend(items.iter().cloned());
        inv.current_dir = Some(dir.to_path_buf());
        inv
    }

    pub fn run(&self) -> CommandOutput {
        log::info!("Running {self}");
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        match cmd.output() {
            Ok(out) => {
                let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&out.stderr));
                if !out.status.success() {
                    log::error!("{self} exited with {}", out.status);
                }
                CommandOutput {
                    success: out.status.success(),
                    text,
                }
            }
            Err(e) => {
                log::error!("Failed to start {self}: {e}");
                CommandOutput {
                    success: false,
                    text: format!("Error: {e}"),
                }
            }
        }
    }
}

/// Logs never show the API key.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        let mut redact = false;
        for arg in &self.args {
            if redact {
                write!(f, " ***")?;
            } else {
                write!(f, " {arg}")?;
            }
            redact = arg == "--api-key";
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Actions (run on the worker thread)
// ---------------------------------------------------------------------------

fn login(program: &str, api_key: &str) -> Result<(), String> {
    let out = Invocation::login(program, api_key).run();
    if out.success {
        Ok(())
    } else {
        Err(format!("Login failed:\n{}", out.text))
    }
}

/// Log in, then list the challenge's datasets. Returns the text to display.
pub fn list_datasets(program: &str, req: &ListRequest) -> String {
    if let Err(msg) = login(program, &req.api_key) {
        return msg;
    }
    Invocation::list(program, &req.challenge).run().text
}

/// Log in, then download the requested items into `req.dir`.
pub fn download_datasets(program: &str, req: &DownloadRequest) -> String {
    if let Err(msg) = login(program, &req.api_key) {
        return msg;
    }
    Invocation::download(program, &req.challenge, &req.items, &req.dir)
        .run()
        .text
}
