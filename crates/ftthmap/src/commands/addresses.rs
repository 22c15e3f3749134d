//! Address listing handler.

use serde::Serialize;
use tabled::Tabled;

use ftthmap_core::{Dataset, ProviderClass, VisibleEntity, project};

use crate::cli::{AddressesArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Serialized view ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddressView {
    name: String,
    street_name: String,
    house: String,
    sub_house: Option<String>,
    full_address: Option<String>,
    available: bool,
    provider_class: ProviderClass,
    providers: Vec<String>,
    latitude: f64,
    longitude: f64,
    marker_color: &'static str,
}

impl From<&VisibleEntity<'_>> for AddressView {
    fn from(v: &VisibleEntity<'_>) -> Self {
        Self {
            name: v.popup.title.clone(),
            street_name: v.entity.street_name.clone(),
            house: v.entity.house.clone(),
            sub_house: v.entity.sub_house().map(str::to_owned),
            full_address: v.entity.full_address.clone(),
            available: v.available,
            provider_class: v.class,
            providers: v.popup.providers.clone(),
            latitude: v.position.lat,
            longitude: v.position.lng,
            marker_color: v.style.color.hex(),
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AddressRow {
    #[tabled(rename = "Street")]
    street: String,
    #[tabled(rename = "House")]
    house: String,
    #[tabled(rename = "FTTH")]
    availability: &'static str,
    #[tabled(rename = "Providers")]
    providers: String,
    #[tabled(rename = "Coordinates")]
    coordinates: String,
}

impl From<&AddressView> for AddressRow {
    fn from(a: &AddressView) -> Self {
        let house = match a.sub_house {
            Some(ref sub) => format!("{} {sub}", a.house),
            None => a.house.clone(),
        };
        Self {
            street: a.street_name.clone(),
            house,
            availability: if a.available { "yes" } else { "no" },
            providers: a.providers.join(", "),
            coordinates: format!("{:.6}, {:.6}", a.latitude, a.longitude),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    dataset: &Dataset,
    args: &AddressesArgs,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let filter = util::filter_state(&args.filter);
    let projection = project(&dataset.entities, &filter);

    let limit = args.limit.unwrap_or(usize::MAX);
    let views: Vec<AddressView> = projection
        .iter()
        .take(limit)
        .map(AddressView::from)
        .collect();

    let out = output::render_list(format, &views, |a| AddressRow::from(a), |a| a.name.clone())?;
    output::print_output(&out, global.quiet);

    if !global.quiet {
        let color = output::should_color(global.color);
        let mut status = format!(
            "{} of {} addresses visible",
            projection.visible_count(),
            dataset.summary.total
        );
        if views.len() < projection.visible_count() {
            status.push_str(&format!(", showing first {}", views.len()));
        }
        if !filter.is_default() {
            status.push_str(&format!(" ({})", filter.describe()));
        }
        eprintln!("{}", output::emphasis(&status, color));
        if projection.invalid_positions > 0 {
            eprintln!(
                "{} with non-numeric coordinates not shown",
                projection.invalid_positions
            );
        }
    }
    Ok(())
}
