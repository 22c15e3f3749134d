//! Command dispatch: bridges CLI args -> core projection -> output formatting.

pub mod addresses;
pub mod config_cmd;
pub mod export;
pub mod providers;
pub mod streets;
pub mod summary;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;

/// Dispatch a data-bound command: load the dataset once, then hand it to
/// the matching handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    let dataset = util::load_dataset(global, cfg).await?;
    let format = crate::config::output_format(global, cfg);

    match cmd {
        Command::Summary => summary::handle(&dataset, format, global),
        Command::Addresses(args) => addresses::handle(&dataset, &args, format, global),
        Command::Streets(args) => streets::handle(&dataset, &args, format, global),
        Command::Providers => providers::handle(&dataset, format, global),
        Command::Export(args) => export::handle(&dataset, &args, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
