use super::prompts::prompt_run_options;
use super::sync_ui::ConsoleOperator;
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use media_sync_core::{
    error_chain_message, AbortReason, SyncOrchestrator, SyncOutcome, SyncReport,
};
use serde_json::json;

pub async fn run_sync(output: &Output) -> Result<()> {
    tracing::debug!("Sync command started");

    let options = prompt_run_options()?;

    let operator = ConsoleOperator::new(*output);
    let mut orchestrator = SyncOrchestrator::simkl_to_trakt(options, &operator);

    match orchestrator.run().await {
        Ok(SyncOutcome::Completed(report)) => {
            operator.finish();
            print_report(output, &report);
            Ok(())
        }
        Ok(SyncOutcome::Aborted { stage, reason }) => {
            operator.finish();
            output.warn(abort_message(reason));
            if !output.is_human() {
                output.json(&json!({
                    "success": false,
                    "aborted": true,
                    "stage": stage.to_string(),
                    "reason": reason,
                }));
            }
            Ok(())
        }
        Err(e) if e.is_source_side() => {
            operator.fail(format!("Error: {}", error_chain_message(&e)));
            Err(e).wrap_err("Sync operation failed")
        }
        Err(e) => {
            // Target-side failures end the run without a non-zero exit
            let message = error_chain_message(&e);
            tracing::error!(stage = %e.stage(), error = %message, "Sync failed");
            operator.fail(format!("Error: {}", message));
            if !output.is_human() {
                output.json(&json!({
                    "success": false,
                    "stage": e.stage().to_string(),
                    "error": message,
                }));
            }
            Ok(())
        }
    }
}

fn abort_message(reason: AbortReason) -> &'static str {
    match reason {
        AbortReason::SourceNotAuthorized => {
            "Simkl authorization was not confirmed, nothing was synced."
        }
        AbortReason::RemovalDeclined => "Sync cancelled, nothing was added to your Trakt history.",
    }
}

fn report_json(report: &SyncReport) -> serde_json::Value {
    json!({
        "success": true,
        "shows_submitted": report.shows_submitted,
        "movies_submitted": report.movies_submitted,
        "removed": report.removed,
        "removal_failed": report.removal_failed,
        "added": report.added,
        "duration_seconds": report.duration.as_secs_f64(),
        "duration": format!("{:?}", report.duration),
    })
}

fn print_report(output: &Output, report: &SyncReport) {
    match output.format() {
        crate::output::OutputFormat::Human => {
            if report.removal_failed {
                output.warn(
                    "Previous Trakt history was not removed; new entries were merged with it.",
                );
            }
            output.info(format!("Sync finished in {:?}", report.duration));
        }
        crate::output::OutputFormat::Json | crate::output::OutputFormat::JsonPretty => {
            output.json(&report_json(report));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use media_sync_models::HistoryCounts;
    use std::time::Duration;

    #[test]
    fn test_report_json() {
        let report = SyncReport {
            shows_submitted: 4,
            movies_submitted: 2,
            removed: None,
            removal_failed: true,
            added: HistoryCounts { movies: 2, episodes: 31 },
            duration: Duration::from_millis(1500),
        };

        let value = report_json(&report);
        assert_eq!(value["success"], true);
        assert_eq!(value["added"]["episodes"], 31);
        assert!(value["removed"].is_null());
        assert_eq!(value["removal_failed"], true);
        assert_eq!(value["duration_seconds"], 1.5);
    }
}
