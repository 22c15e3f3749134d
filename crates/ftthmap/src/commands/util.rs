//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use ftthmap_core::{Dataset, FilterState, load_records};

use crate::cli::{FilterArgs, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// Resolve the source, fetch it once, and aggregate it.
///
/// A failed load is logged and returned; there is no retry.
pub async fn load_dataset(global: &GlobalOpts, cfg: &Config) -> Result<Arc<Dataset>, CliError> {
    let resolved = config::resolve_source(global, cfg)?;
    let origin = resolved.source.to_string();

    let spinner = (resolved.source.is_remote() && !global.quiet && std::io::stderr().is_terminal())
        .then(|| spinner(&format!("Fetching {origin}")));

    let result = load_records(&resolved.source, &resolved.options).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let records = result
        .inspect_err(|e| error!(%origin, error = %e, "failed to load address data"))?;

    let dataset = Arc::new(Dataset::from_records(&records));
    info!(
        %origin,
        dataset = resolved.name.as_deref().unwrap_or("-"),
        "loaded {} addresses",
        dataset.summary.total
    );
    Ok(dataset)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Translate the `--hide-*` / `--street` / `--provider` flags.
pub fn filter_state(args: &FilterArgs) -> FilterState {
    let mut state = FilterState::default();
    if args.hide_available {
        state = state.toggle_available();
    }
    if args.hide_unavailable {
        state = state.toggle_unavailable();
    }
    if args.hide_multi {
        state = state.toggle_multi_provider();
    }
    if args.hide_single {
        state = state.toggle_single_provider();
    }
    if let Some(ref street) = args.street {
        state = state.select_street(street.clone());
    }
    if let Some(ref provider) = args.provider {
        state = state.select_provider(provider.clone());
    }
    state
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
