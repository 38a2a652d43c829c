use color_eyre::Result;
use dialoguer::{Confirm, Input, Password};
use media_sync_config::{validate_required, Credentials, RunOptions};

const SIMKL_CLIENT_ID_PROMPT: &str = "Please input your Simkl client ID (get it from https://simkl.com/settings/developer/new by creating a new application)";
const TRAKT_CLIENT_ID_PROMPT: &str = "Please input your Trakt client ID (get it from https://trakt.tv/oauth/applications by creating a new application)";
const TRAKT_CLIENT_SECRET_PROMPT: &str = "Please input your Trakt client secret (you get it from the same place you got the client ID)";
const REMOVE_PREVIOUS_PROMPT: &str = "Do you want to delete your previous Trakt history?";

/// Prompt for a value that may not be empty; blank answers are re-asked
pub fn prompt_required(prompt: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| validate_required(input))
        .interact_text()
        .map(|value| value.trim().to_string())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Prompt for a required secret (masked input)
pub fn prompt_secret(prompt: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| validate_required(input))
        .interact()
        .map(|value| value.trim().to_string())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read password: {}", e))
}

/// Prompt for yes/no with a default
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read confirmation: {}", e))
}

/// Ask for everything a run needs before any network call is made
pub fn prompt_run_options() -> Result<RunOptions> {
    let simkl_client_id = prompt_required(SIMKL_CLIENT_ID_PROMPT)?;
    let trakt_client_id = prompt_required(TRAKT_CLIENT_ID_PROMPT)?;
    let trakt_client_secret = prompt_secret(TRAKT_CLIENT_SECRET_PROMPT)?;
    let remove_previous_history = prompt_yes_no(REMOVE_PREVIOUS_PROMPT, false)?;

    let credentials = Credentials::new(simkl_client_id, trakt_client_id, trakt_client_secret)?;
    tracing::debug!(?credentials, remove_previous_history, "Collected run options");

    Ok(RunOptions::new(credentials, remove_previous_history))
}
