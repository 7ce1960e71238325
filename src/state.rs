use std::path::PathBuf;
use std::sync::Arc;

use crate::aicrowd::{self, DownloadMode};
use crate::config::Settings;
use crate::data::model::DownloadReport;
use crate::error::ValidationError;
use crate::hub;
use crate::worker::{Poll, Worker};

/// Called from a worker thread when its result is ready (a repaint request).
pub type Repaint = Arc<dyn Fn() + Send + Sync>;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Aicrowd,
    HuggingFace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Modal message shown on top of the forms until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub title: String,
    pub body: String,
}

impl Message {
    pub fn info(body: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            title: "Success".to_string(),
            body: body.into(),
        }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            title: "Error".to_string(),
            body: body.into(),
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub tab: Tab,
    pub aicrowd: AicrowdForm,
    pub hub: HubForm,
    pub message: Option<Message>,
    pub settings: Settings,
}

/// Fields and output of the AIcrowd form.
#[derive(Default)]
pub struct AicrowdForm {
    pub api_key: String,
    pub challenge: String,
    pub download_dir: String,
    pub mode: DownloadMode,
    pub items: String,
    /// CLI output of the last action.
    pub output: String,
    worker: Option<Worker<String>>,
}

/// Fields, discovered splits and status of the Hugging Face form.
#[derive(Default)]
pub struct HubForm {
    pub token_input: String,
    pub dataset: String,
    pub save_dir: String,
    pub splits: Vec<String>,
    pub split: String,
    pub status: String,
    /// Token sent with requests: set by a successful login or found at startup.
    pub token: Option<String>,
    worker: Option<Worker<HubOutcome>>,
}

/// What a Hugging Face worker hands back to the UI.
#[derive(Debug)]
pub enum HubOutcome {
    LoggedIn { token: String, user: String },
    Splits(Vec<String>),
    Downloaded(DownloadReport),
    Failed {
        status: Option<&'static str>,
        message: String,
    },
}

impl AicrowdForm {
    pub fn busy(&self) -> bool {
        self.worker.is_some()
    }
}

impl HubForm {
    pub fn busy(&self) -> bool {
        self.worker.is_some()
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let mut hub = HubForm::default();
        if let Some(token) = hub::token::discover(&settings) {
            hub.token_input = token.clone();
            hub.token = Some(token);
            hub.status = "Token loaded from system".to_string();
        }
        Self {
            tab: Tab::default(),
            aicrowd: AicrowdForm::default(),
            hub,
            message: None,
            settings,
        }
    }

    fn show_error(&mut self, body: impl Into<String>) {
        let msg = Message::error(body);
        log::error!("{}", msg.body);
        self.message = Some(msg);
    }

    // -----------------------------------------------------------------------
    // AIcrowd actions
    // -----------------------------------------------------------------------

    /// "List Available Datasets": login + `dataset list` on a worker.
    pub fn aicrowd_list(&mut self, repaint: &Repaint) {
        if self.aicrowd.busy() {
            return;
        }
        let req = match aicrowd::list_request(&self.aicrowd.api_key, &self.aicrowd.challenge) {
            Ok(req) => req,
            Err(e) => return self.show_error(e.to_string()),
        };
        let program = self.settings.aicrowd_program.clone();
        self.spawn_aicrowd(repaint, move || aicrowd::list_datasets(&program, &req));
    }

    /// "Download Dataset(s)": login + `dataset download` inside the chosen folder.
    pub fn aicrowd_download(&mut self, repaint: &Repaint) {
        if self.aicrowd.busy() {
            return;
        }
        let form = &self.aicrowd;
        let req = match aicrowd::download_request(
            &form.api_key,
            &form.challenge,
            &form.download_dir,
            &form.items,
            form.mode,
        ) {
            Ok(req) => req,
            Err(e) => return self.show_error(e.to_string()),
        };
        let program = self.settings.aicrowd_program.clone();
        self.spawn_aicrowd(repaint, move || aicrowd::download_datasets(&program, &req));
    }

    fn spawn_aicrowd<F>(&mut self, repaint: &Repaint, job: F)
    where
        F: FnOnce() -> String + Send + 'static,
    {
        let repaint = repaint.clone();
        match Worker::spawn("aicrowd-cli", job, move || repaint()) {
            Ok(worker) => {
                self.aicrowd.output = "Running aicrowd...".to_string();
                self.aicrowd.worker = Some(worker);
            }
            Err(e) => self.show_error(format!("Error: could not start worker: {e}")),
        }
    }

    // -----------------------------------------------------------------------
    // Hugging Face actions
    // -----------------------------------------------------------------------

    pub fn hub_login(&mut self, repaint: &Repaint) {
        if self.hub.busy() {
            return;
        }
        let token = match required(&self.hub.token_input, "Please enter your Hugging Face token") {
            Ok(token) => token,
            Err(e) => return self.show_error(e.to_string()),
        };
        let settings = self.settings.clone();
        self.spawn_hub(repaint, None, move || match hub::login(&settings, &token) {
            Ok(user) => HubOutcome::LoggedIn { token, user },
            Err(e) => HubOutcome::Failed {
                status: None,
                message: format!("Login failed: {e}"),
            },
        });
    }

    pub fn hub_splits(&mut self, repaint: &Repaint) {
        if self.hub.busy() {
            return;
        }
        let dataset = match required(&self.hub.dataset, "Please enter a dataset name") {
            Ok(dataset) => dataset,
            Err(e) => return self.show_error(e.to_string()),
        };
        let settings = self.settings.clone();
        let token = self.hub.token.clone();
        self.spawn_hub(repaint, None, move || {
            let names = hub::HubClient::new(&settings, token)
                .and_then(|client| client.split_names(&dataset));
            match names {
                Ok(names) => HubOutcome::Splits(names),
                Err(e) => HubOutcome::Failed {
                    status: None,
                    message: format!("Error getting splits: {e}"),
                },
            }
        });
    }

    pub fn hub_download(&mut self, repaint: &Repaint) {
        if self.hub.busy() {
            return;
        }
        let form = &self.hub;
        if [&form.dataset, &form.split, &form.save_dir]
            .iter()
            .any(|f| f.trim().is_empty())
        {
            return self.show_error("Please fill in all fields");
        }
        let dataset = form.dataset.trim().to_string();
        let split = form.split.clone();
        let save_dir = PathBuf::from(form.save_dir.trim());
        let token = form.token.clone();
        let settings = self.settings.clone();

        self.spawn_hub(repaint, Some("Downloading dataset..."), move || {
            match hub::download(&settings, token, &dataset, &split, &save_dir) {
                Ok(report) => HubOutcome::Downloaded(report),
                Err(e) => HubOutcome::Failed {
                    status: Some("Error downloading dataset"),
                    message: format!("Error downloading dataset: {e:#}"),
                },
            }
        });
    }

    fn spawn_hub<F>(&mut self, repaint: &Repaint, status: Option<&str>, job: F)
    where
        F: FnOnce() -> HubOutcome + Send + 'static,
    {
        let repaint = repaint.clone();
        match Worker::spawn("hf-hub", job, move || repaint()) {
            Ok(worker) => {
                if let Some(status) = status {
                    self.hub.status = status.to_string();
                }
                self.hub.worker = Some(worker);
            }
            Err(e) => self.show_error(format!("Error: could not start worker: {e}")),
        }
    }

    // -----------------------------------------------------------------------
    // Worker results
    // -----------------------------------------------------------------------

    /// Apply any finished worker results. Called once per frame.
    pub fn poll_workers(&mut self) {
        if let Some(worker) = &self.aicrowd.worker {
            match worker.poll() {
                Poll::Pending => {}
                Poll::Ready(output) => {
                    self.aicrowd.output = output;
                    self.aicrowd.worker = None;
                }
                Poll::Lost => {
                    self.aicrowd.output.clear();
                    self.aicrowd.worker = None;
                    self.show_error("The aicrowd task stopped unexpectedly");
                }
            }
        }

        if let Some(worker) = &self.hub.worker {
            match worker.poll() {
                Poll::Pending => {}
                Poll::Ready(outcome) => {
                    self.hub.worker = None;
                    self.apply_hub_outcome(outcome);
                }
                Poll::Lost => {
                    self.hub.worker = None;
                    self.hub.status.clear();
                    self.show_error("The Hugging Face task stopped unexpectedly");
                }
            }
        }
    }

    fn apply_hub_outcome(&mut self, outcome: HubOutcome) {
        match outcome {
            HubOutcome::LoggedIn { token, user } => {
                log::debug!("Hugging Face token belongs to {user}");
                self.hub.token = Some(token);
                self.hub.status = "Successfully logged in to Hugging Face".to_string();
                self.message = Some(Message::info("Successfully logged in to Hugging Face"));
            }
            HubOutcome::Splits(names) => {
                self.hub.split = names.first().cloned().unwrap_or_default();
                self.message = Some(Message::info(format!("Found splits: {}", names.join(", "))));
                self.hub.splits = names;
            }
            HubOutcome::Downloaded(report) => {
                self.hub.status = "Download completed!".to_string();
                self.message = Some(Message::info(report.message()));
            }
            HubOutcome::Failed { status, message } => {
                if let Some(status) = status {
                    self.hub.status = status.to_string();
                }
                self.show_error(message);
            }
        }
    }
}

fn required(value: &str, msg: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::new(msg))
    } else {
        Ok(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn state() -> (AppState, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings::with_token_path(tmp.path().join("token"));
        (AppState::new(settings), tmp)
    }

    fn no_repaint() -> Repaint {
        Arc::new(|| {})
    }

    fn error_body(state: &AppState) -> &str {
        let msg = state.message.as_ref().expect("expected a message");
        assert_eq!(msg.kind, MessageKind::Error);
        &msg.body
    }

    #[test]
    fn stored_token_is_loaded_at_startup() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("token");
        hub::token::save(&path, "hf_saved").unwrap();

        let state = AppState::new(Settings::with_token_path(path));
        assert_eq!(state.hub.token.as_deref(), Some("hf_saved"));
        assert_eq!(state.hub.token_input, "hf_saved");
        assert_eq!(state.hub.status, "Token loaded from system");
    }

    #[test]
    fn aicrowd_list_refused_without_key() {
        let (mut state, _tmp) = state();
        state.aicrowd.challenge = "snake-game".into();
        state.aicrowd_list(&no_repaint());

        assert_eq!(error_body(&state), "Please provide API key and challenge name");
        assert!(!state.aicrowd.busy());
    }

    #[test]
    fn aicrowd_download_refused_when_a_field_is_empty() {
        let (mut state, tmp) = state();
        state.aicrowd.api_key = "key".into();
        state.aicrowd.challenge = "snake-game".into();
        state.aicrowd.download_dir = tmp.path().display().to_string();
        state.aicrowd_download(&no_repaint());

        assert_eq!(error_body(&state), "Please fill in all fields");
        assert!(!state.aicrowd.busy());
    }

    #[test]
    fn hub_actions_validate_before_spawning() {
        let (mut state, _tmp) = state();

        state.hub_login(&no_repaint());
        assert_eq!(error_body(&state), "Please enter your Hugging Face token");

        state.hub_splits(&no_repaint());
        assert_eq!(error_body(&state), "Please enter a dataset name");

    }

    #[test]
    fn hub_download_refused_when_any_field_is_empty() {
        let cases = [
            ("", "train", "/tmp"),
            ("stanfordnlp/imdb", "", "/tmp"),
            ("stanfordnlp/imdb", "train", ""),
            ("  ", "train", "/tmp"),
            ("stanfordnlp/imdb", "train", " \t"),
        ];
        for (dataset, split, save_dir) in cases {
            let (mut state, _tmp) = state();
            state.hub.dataset = dataset.into();
            state.hub.split = split.into();
            state.hub.save_dir = save_dir.into();

            state.hub_download(&no_repaint());
            assert_eq!(
                error_body(&state),
                "Please fill in all fields",
                "{dataset:?} {split:?} {save_dir:?}"
            );
            assert!(!state.hub.busy());
            assert!(state.hub.status.is_empty());
        }
    }

    #[test]
    fn splits_outcome_selects_first_split() {
        let (mut state, _tmp) = state();
        state.apply_hub_outcome(HubOutcome::Splits(vec!["train".into(), "test".into()]));

        assert_eq!(state.hub.splits, ["train", "test"]);
        assert_eq!(state.hub.split, "train");
        let msg = state.message.unwrap();
        assert_eq!(msg.kind, MessageKind::Info);
        assert_eq!(msg.body, "Found splits: train, test");
    }

    #[test]
    fn failed_download_sets_status_and_error() {
        let (mut state, _tmp) = state();
        state.apply_hub_outcome(HubOutcome::Failed {
            status: Some("Error downloading dataset"),
            message: "Error downloading dataset: boom".into(),
        });

        assert_eq!(state.hub.status, "Error downloading dataset");
        assert_eq!(error_body(&state), "Error downloading dataset: boom");
    }

    #[test]
    fn login_outcome_keeps_token() {
        let (mut state, _tmp) = state();
        state.apply_hub_outcome(HubOutcome::LoggedIn {
            token: "hf_new".into(),
            user: "alice".into(),
        });
        assert_eq!(state.hub.token.as_deref(), Some("hf_new"));
        assert_eq!(state.hub.status, "Successfully logged in to Hugging Face");
    }

    #[cfg(unix)]
    #[test]
    fn aicrowd_output_lands_in_the_form() {
        let (mut state, _tmp) = state();
        state.settings.aicrowd_program = "echo".into();
        state.aicrowd.api_key = "key".into();
        state.aicrowd.challenge = "snake-game".into();
        state.aicrowd_list(&no_repaint());
        assert!(state.aicrowd.busy());

        let deadline = Instant::now() + Duration::from_secs(5);
        while state.aicrowd.busy() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            state.poll_workers();
        }
        assert!(!state.aicrowd.busy());
        assert_eq!(state.aicrowd.output, "dataset list --challenge snake-game\n");
    }
}
