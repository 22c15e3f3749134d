//! Provider index handler.

use serde::Serialize;
use tabled::Tabled;

use ftthmap_core::Dataset;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Clone, Serialize, Tabled)]
struct ProviderEntry {
    #[tabled(rename = "Provider")]
    name: String,
    #[tabled(rename = "Addresses")]
    addresses: usize,
    #[tabled(rename = "Available")]
    available: usize,
}

fn entries(dataset: &Dataset) -> Vec<ProviderEntry> {
    dataset
        .providers
        .iter()
        .map(|name| {
            let served = dataset.entities.iter().filter(|e| e.has_provider(name));
            let (addresses, available) =
                served.fold((0, 0), |(n, a), e| (n + 1, a + usize::from(e.is_available())));
            ProviderEntry {
                name: name.clone(),
                addresses,
                available,
            }
        })
        .collect()
}

pub fn handle(dataset: &Dataset, format: OutputFormat, global: &GlobalOpts) -> Result<(), CliError> {
    let providers = entries(dataset);
    let out = output::render_list(format, &providers, ProviderEntry::clone, |p| p.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftthmap_core::RawRecord;

    fn rec(lat: &str, provider: &str, available: i64) -> RawRecord {
        RawRecord {
            street_name: "X".into(),
            house: "1".into(),
            latitude: Some(lat.into()),
            longitude: Some("76.9".into()),
            is_available: available,
            provider: provider.into(),
            ..RawRecord::default()
        }
    }

    #[test]
    fn counts_shared_addresses_for_each_provider() {
        let dataset = Dataset::from_records(&[
            rec("1", "beeline", 1),
            rec("1", "telecom", 1),
            rec("2", "telecom", 0),
        ]);
        let all = entries(&dataset);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "beeline");
        assert_eq!((all[0].addresses, all[0].available), (1, 1));
        assert_eq!(all[1].name, "telecom");
        assert_eq!((all[1].addresses, all[1].available), (2, 1));
    }
}
