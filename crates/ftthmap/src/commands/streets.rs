//! Street index handler.

use std::collections::HashMap;

use serde::Serialize;
use tabled::Tabled;

use ftthmap_core::{Dataset, index};

use crate::cli::{GlobalOpts, OutputFormat, StreetsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone, Serialize, Tabled)]
struct StreetEntry {
    #[tabled(rename = "Street")]
    name: String,
    #[tabled(rename = "Addresses")]
    addresses: usize,
}

fn entries(dataset: &Dataset, search: Option<&str>) -> Vec<StreetEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entity in &dataset.entities {
        *counts.entry(entity.street_name.as_str()).or_default() += 1;
    }

    index::search(&dataset.streets, search.unwrap_or_default())
        .into_iter()
        .map(|name| StreetEntry {
            name: name.to_owned(),
            addresses: counts.get(name).copied().unwrap_or_default(),
        })
        .collect()
}

pub fn handle(
    dataset: &Dataset,
    args: &StreetsArgs,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let streets = entries(dataset, args.search.as_deref());
    let out = output::render_list(format, &streets, StreetEntry::clone, |s| s.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
