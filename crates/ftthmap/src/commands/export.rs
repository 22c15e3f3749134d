//! GeoJSON export handler.

use std::io::Write;

use strum::IntoEnumIterator;
use tracing::debug;

use ftthmap_core::{Dataset, GeoJsonPresenter, MarkerColor, present, project};

use crate::cli::{ExportArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(dataset: &Dataset, args: &ExportArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let filter = util::filter_state(&args.filter);
    let projection = project(&dataset.entities, &filter);

    let mut geojson = GeoJsonPresenter::new();
    present(&mut geojson, &projection, &dataset.summary);

    let body = if args.compact {
        geojson.to_json()?
    } else {
        geojson.to_json_pretty()?
    };

    match args.out {
        Some(ref path) => {
            std::fs::write(path, format!("{body}\n"))?;
            debug!(path = %path.display(), "wrote GeoJSON");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{body}")?;
        }
    }

    if !global.quiet {
        let color = output::should_color(global.color);
        let destination = args
            .out
            .as_ref()
            .map_or_else(|| "stdout".to_owned(), |p| p.display().to_string());
        eprintln!(
            "{}",
            output::emphasis(
                &format!(
                    "Exported {} of {} addresses to {destination}",
                    geojson.feature_count(),
                    dataset.summary.total
                ),
                color
            )
        );
        for marker in MarkerColor::iter() {
            let count = projection.iter().filter(|v| v.style.color == marker).count();
            if count > 0 {
                eprintln!("  {}{count:>6}  {}", output::swatch(marker, color), marker.label());
            }
        }
    }
    Ok(())
}
