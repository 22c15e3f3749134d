//! Config subcommand handlers.

use dialoguer::Input;

use ftthmap_core::DataSource;
use ftthmap_core::source::DEFAULT_DATA_FILE;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, DatasetProfile};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// Load the config file, or defaults when it does not exist yet.
fn load_existing() -> Result<Config, CliError> {
    Ok(config::load_config()?)
}

/// Reject sources that could never load before writing them to disk.
fn validate_source(source: &str, base_url: Option<&str>) -> Result<(), CliError> {
    let base = base_url
        .map(|raw| {
            url::Url::parse(raw).map_err(|e| CliError::Validation {
                field: "base_url".into(),
                reason: e.to_string(),
            })
        })
        .transpose()?;
    DataSource::parse(source, base.as_ref())?;
    Ok(())
}

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init {
            name,
            source,
            base_url,
        } => {
            let config_path = config::config_path();
            if config_path.exists()
                && !util::confirm(
                    &format!("Overwrite existing config at {}?", config_path.display()),
                    global.yes,
                )?
            {
                return Ok(());
            }

            let source = match source {
                Some(s) => s,
                None => {
                    eprintln!("ftthmap configuration");
                    eprintln!("   Config path: {}\n", config_path.display());
                    Input::new()
                        .with_prompt("Data file URL or path")
                        .default(DEFAULT_DATA_FILE.to_owned())
                        .interact_text()
                        .map_err(util::prompt_err)?
                }
            };
            validate_source(&source, base_url.as_deref())?;

            let mut cfg = Config {
                default_dataset: Some(name.clone()),
                ..Config::default()
            };
            cfg.datasets.insert(
                name.clone(),
                DatasetProfile {
                    source,
                    base_url,
                    description: None,
                    timeout: None,
                },
            );
            config::save_config(&cfg)?;

            if !global.quiet {
                eprintln!("✓ Configuration written to {}", config_path.display());
                eprintln!("  Default dataset: {name}");
                eprintln!("\n  Try it: ftthmap summary");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = load_existing()?;
            let format = global.output.unwrap_or(OutputFormat::Table);
            let out = output::render_single(format, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── AddDataset ──────────────────────────────────────────────
        ConfigCommand::AddDataset {
            name,
            source,
            base_url,
            description,
            timeout,
            default,
        } => {
            validate_source(&source, base_url.as_deref())?;
            let mut cfg = load_existing()?;
            let replaced = cfg
                .datasets
                .insert(
                    name.clone(),
                    DatasetProfile {
                        source,
                        base_url,
                        description,
                        timeout,
                    },
                )
                .is_some();
            if default || cfg.default_dataset.is_none() {
                cfg.default_dataset = Some(name.clone());
            }
            config::save_config(&cfg)?;

            if !global.quiet {
                let verb = if replaced { "Updated" } else { "Added" };
                eprintln!("✓ {verb} dataset '{name}'");
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = load_existing()?;

            if !cfg.datasets.contains_key(&name) {
                let available = cfg.dataset_names();
                return Err(CliError::DatasetNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_dataset = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default dataset set to '{name}'");
            }
            Ok(())
        }
    }
}
