//! CLI configuration: a thin wrapper around `ftthmap_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--data, --dataset, --timeout, --output).

use clap::ValueEnum;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use ftthmap_config::{
    Config, DatasetProfile, ResolvedDataset, SourceOverrides, config_path, load_config,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the data source from flags and config.
///
/// `--data` wins over any profile; otherwise `--dataset` or the configured
/// default picks a profile. `--timeout` overrides whichever timeout applies.
pub fn resolve_source(global: &GlobalOpts, cfg: &Config) -> Result<ResolvedDataset, CliError> {
    let overrides = SourceOverrides {
        data: global.data.as_deref(),
        dataset: global.dataset.as_deref(),
        timeout: global.timeout,
    };
    Ok(ftthmap_config::resolve_source(cfg, overrides)?)
}

/// Output format from `--output`, else the config default, else table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}
