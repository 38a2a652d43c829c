use crate::output::Output;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use media_sync_core::{Confirmation, Operator, PromptError, SyncEvent, SyncStage};
use std::io::IsTerminal;
use std::sync::Mutex;
use std::time::Duration;

/// Spinner shown while a stage is in flight; one bar per stage
pub struct SyncUI {
    spinner: Mutex<Option<ProgressBar>>,
    interactive: bool,
}

impl SyncUI {
    pub fn new(interactive: bool) -> Self {
        if !interactive {
            tracing::info!(
                operation = "ui_init",
                mode = "non_interactive",
                "Running in non-interactive mode - spinner disabled, using structured logging"
            );
        }

        Self {
            spinner: Mutex::new(None),
            interactive,
        }
    }

    pub fn start(&self, msg: impl Into<String>) {
        let msg = msg.into();
        if !self.interactive {
            tracing::info!(operation = "progress", message = %msg, "Progress update");
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
        );
        spinner.set_message(msg);
        spinner.enable_steady_tick(Duration::from_millis(80));

        if let Some(previous) = self.lock().replace(spinner) {
            previous.finish_and_clear();
        }
    }

    /// Clear the spinner; the caller prints the stage result
    pub fn stop(&self) {
        if let Some(spinner) = self.lock().take() {
            spinner.finish_and_clear();
        }
    }

    /// Hide the spinner while `f` writes to the terminal or reads input
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        let current = self.lock().clone();
        match current {
            Some(spinner) => spinner.suspend(f),
            None => f(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        self.spinner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Progress,
    Instruction,
    Success,
    Warning,
}

pub fn confirmation_prompt(confirmation: Confirmation) -> &'static str {
    match confirmation {
        Confirmation::SourceAuthorized => "Hit Enter once you have authorized.",
        Confirmation::ContinueAfterFailedRemoval => {
            "The watch history could not be removed for various reasons (maybe your watch history is too big), continue syncing?"
        }
    }
}

/// Text shown to the operator for an event, if any
pub fn event_message(event: &SyncEvent) -> Option<(MessageKind, String)> {
    let message = match event {
        SyncEvent::StageChanged(SyncStage::SourceAuthorizing) => {
            (MessageKind::Progress, "Authorizing Simkl...".to_string())
        }
        SyncEvent::StageChanged(SyncStage::TargetAuthorizing) => {
            (MessageKind::Progress, "Authorizing Trakt...".to_string())
        }
        SyncEvent::StageChanged(SyncStage::RemovingHistory) => {
            (MessageKind::Progress, "Getting previous watch history...".to_string())
        }
        SyncEvent::StageChanged(_) => return None,
        SyncEvent::SourceAuthorization { service, authorization } => (
            MessageKind::Instruction,
            format!(
                "Please authorize the {} application by visiting: {} and using this code: {}",
                service, authorization.verification_url, authorization.user_code
            ),
        ),
        SyncEvent::SourceFetched { shows, movies, anime } => (
            MessageKind::Success,
            format!(
                "Watch history fetched successfully ({} shows, {} movies, {} anime).",
                shows, movies, anime
            ),
        ),
        SyncEvent::TargetAuthorization { service, authorization } => (
            MessageKind::Instruction,
            format!(
                "Authorize the {} application via: {} using this code: {}",
                service, authorization.verification_url, authorization.user_code
            ),
        ),
        SyncEvent::TargetAuthorized { service } => {
            (MessageKind::Success, format!("{} authorization successful.", service))
        }
        SyncEvent::RemovingHistory { movies, shows } => (
            MessageKind::Progress,
            format!(
                "Removing {} movies and {} shows from your Trakt watch history...",
                movies, shows
            ),
        ),
        SyncEvent::HistoryRemoved(counts) => (
            MessageKind::Success,
            format!(
                "Successfully removed {} movies and {} episodes from your watch history.",
                counts.movies, counts.episodes
            ),
        ),
        SyncEvent::RemovalFailed { message } => (
            MessageKind::Warning,
            format!("The watch history could not be removed: {}", message),
        ),
        SyncEvent::Syncing { shows, movies } => (
            MessageKind::Progress,
            format!(
                "Syncing {} shows (incl. anime) and {} movies to your Trakt account...",
                shows, movies
            ),
        ),
        SyncEvent::HistoryAdded(counts) => (
            MessageKind::Success,
            format!(
                "Successfully added {} movies and {} episodes to your Trakt watch history!",
                counts.movies, counts.episodes
            ),
        ),
    };
    Some(message)
}

/// Terminal-backed `Operator`: dialoguer for questions, spinner and `Output` for events
pub struct ConsoleOperator {
    output: Output,
    ui: SyncUI,
}

impl ConsoleOperator {
    pub fn new(output: Output) -> Self {
        let interactive = is_interactive() && output.is_human();
        Self {
            output,
            ui: SyncUI::new(interactive),
        }
    }

    /// Stop the spinner and report a failed stage
    pub fn fail(&self, msg: impl AsRef<str>) {
        self.ui.stop();
        self.output.error(msg);
    }

    pub fn finish(&self) {
        self.ui.stop();
    }
}

impl Operator for ConsoleOperator {
    fn confirm(&self, confirmation: Confirmation) -> Result<bool, PromptError> {
        self.ui.suspend(|| {
            Confirm::new()
                .with_prompt(confirmation_prompt(confirmation))
                .default(confirmation.default_answer())
                .interact()
                .map_err(|e| PromptError(e.to_string()))
        })
    }

    fn notify(&self, event: SyncEvent) {
        tracing::debug!(?event, "Sync event");
        let Some((kind, message)) = event_message(&event) else {
            return;
        };

        match kind {
            MessageKind::Progress => self.ui.start(message),
            MessageKind::Instruction => self.ui.suspend(|| self.output.instruction(&message)),
            MessageKind::Success => {
                self.ui.stop();
                self.output.success(&message);
            }
            MessageKind::Warning => {
                self.ui.stop();
                self.output.warn(&message);
            }
        }

        // The device-code poll is silent, so keep the spinner going over it
        if let SyncEvent::TargetAuthorization { service, .. } = &event {
            self.ui.start(format!("Waiting for {} authorization...", service));
        }
    }
}
