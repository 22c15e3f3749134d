//! Summary command handler.

use tabled::Tabled;

use ftthmap_core::{Dataset, Summary, SummarySlot};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

/// Counter rows in display order. `Visible` is a projection concept and is
/// left out here.
fn rows(summary: &Summary) -> Vec<CountRow> {
    let mut rows: Vec<CountRow> = [
        SummarySlot::Total,
        SummarySlot::MultiProvider,
        SummarySlot::SingleProvider,
        SummarySlot::Available,
        SummarySlot::Unavailable,
    ]
    .into_iter()
    .map(|slot| CountRow {
        metric: slot.label(),
        count: slot.value(summary, 0),
    })
    .collect();
    rows.push(CountRow {
        metric: "Raw records",
        count: summary.records,
    });
    rows.push(CountRow {
        metric: "Skipped (no coordinates)",
        count: summary.skipped,
    });
    rows
}

fn detail(summary: &Summary) -> String {
    output::render_table(&rows(summary))
}

fn plain(summary: &Summary) -> String {
    [
        ("total", summary.total),
        ("multi_provider", summary.multi_provider),
        ("single_provider", summary.single_provider),
        ("available", summary.available),
        ("unavailable", summary.unavailable),
        ("records", summary.records),
        ("skipped", summary.skipped),
    ]
    .iter()
    .map(|(k, v)| format!("{k}\t{v}"))
    .collect::<Vec<_>>()
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(dataset: &Dataset, format: OutputFormat, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(format, &dataset.summary, detail, plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lists_every_count() {
        let summary = Summary {
            records: 5,
            skipped: 1,
            total: 3,
            multi_provider: 1,
            single_provider: 2,
            available: 2,
            unavailable: 1,
        };
        let text = plain(&summary);
        assert!(text.starts_with("total\t3\n"));
        assert!(text.contains("skipped\t1"));
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn table_uses_slot_labels() {
        let text = detail(&Summary::default());
        assert!(text.contains("Multiple providers"));
        assert!(text.contains("Unavailable"));
    }
}
