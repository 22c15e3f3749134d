// ── Presentation adapter contract ──
//
// What the core needs from whatever draws the map: a marker layer that can
// be cleared and refilled, a viewport that can fit a box, and a handful of
// text slots for the counters. Input events flow the other way through
// `FilterAction`, so they are not part of this trait.

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::aggregate::Summary;
use crate::model::{AddressEntity, Bounds, LatLng};
use crate::project::{MarkerStyle, Popup, Projection, VisibleEntity};

/// One point to draw.
#[derive(Debug, Clone, Copy)]
pub struct Marker<'a> {
    pub entity: &'a AddressEntity,
    pub position: LatLng,
    pub style: MarkerStyle,
    pub popup: &'a Popup,
}

impl<'a> From<&'a VisibleEntity<'a>> for Marker<'a> {
    fn from(v: &'a VisibleEntity<'a>) -> Self {
        Self {
            entity: v.entity,
            position: v.position,
            style: v.style,
            popup: &v.popup,
        }
    }
}

/// Named counter slots a presenter displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum SummarySlot {
    Total,
    MultiProvider,
    SingleProvider,
    Available,
    Unavailable,
    Visible,
}

impl SummarySlot {
    pub fn label(self) -> &'static str {
        match self {
            Self::Total => "Total addresses",
            Self::MultiProvider => "Multiple providers",
            Self::SingleProvider => "Single provider",
            Self::Available => "Available",
            Self::Unavailable => "Unavailable",
            Self::Visible => "Visible",
        }
    }

    /// Value of this slot. `Visible` comes from the projection, the rest
    /// from the aggregation summary.
    pub fn value(self, summary: &Summary, visible: usize) -> usize {
        match self {
            Self::Total => summary.total,
            Self::MultiProvider => summary.multi_provider,
            Self::SingleProvider => summary.single_provider,
            Self::Available => summary.available,
            Self::Unavailable => summary.unavailable,
            Self::Visible => visible,
        }
    }
}

/// A map surface the core can drive.
pub trait MapPresenter {
    /// Remove every rendered marker.
    fn clear_markers(&mut self);

    fn add_marker(&mut self, marker: &Marker<'_>);

    /// Ask the viewport to show `bounds`.
    fn fit_bounds(&mut self, bounds: Bounds);

    fn write_summary(&mut self, slot: SummarySlot, value: usize);
}

/// Full re-render of `projection` onto `presenter`.
///
/// Markers are cleared and re-added from scratch. The viewport is only
/// fitted when something is visible.
pub fn present<P>(presenter: &mut P, projection: &Projection<'_>, summary: &Summary)
where
    P: MapPresenter + ?Sized,
{
    presenter.clear_markers();
    for visible in projection.iter() {
        presenter.add_marker(&Marker::from(visible));
    }
    if let Some(bounds) = projection.bounds() {
        presenter.fit_bounds(bounds);
    }
    let visible = projection.visible_count();
    for slot in SummarySlot::iter() {
        presenter.write_summary(slot, slot.value(summary, visible));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::filter::FilterState;
    use crate::model::RawRecord;
    use crate::project::project;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        markers: usize,
    }

    impl MapPresenter for Recorder {
        fn clear_markers(&mut self) {
            self.calls.push("clear".into());
            self.markers = 0;
        }

        fn add_marker(&mut self, marker: &Marker<'_>) {
            self.calls.push(format!("add {}", marker.entity.key));
            self.markers += 1;
        }

        fn fit_bounds(&mut self, _bounds: Bounds) {
            self.calls.push("fit".into());
        }

        fn write_summary(&mut self, slot: SummarySlot, value: usize) {
            self.calls.push(format!("{slot}={value}"));
        }
    }

    fn rec(lat: &str, provider: &str, available: i64) -> RawRecord {
        RawRecord {
            street_name: "X".into(),
            house: "1".into(),
            latitude: Some(lat.into()),
            longitude: Some("2.0".into()),
            is_available: available,
            provider: provider.into(),
            ..RawRecord::default()
        }
    }

    #[test]
    fn present_drives_full_rerender() {
        let agg = aggregate(&[rec("1.0", "A", 1), rec("1.0", "B", 1), rec("3.0", "A", 0)]);
        let projection = project(&agg.entities, &FilterState::default().toggle_unavailable());

        let mut rec = Recorder::default();
        present(&mut rec, &projection, &agg.summary);

        assert_eq!(
            rec.calls,
            [
                "clear",
                "add 1.0,2.0",
                "fit",
                "total=2",
                "multiProvider=1",
                "singleProvider=1",
                "available=1",
                "unavailable=1",
                "visible=1",
            ]
        );
        assert_eq!(rec.markers, 1);
    }

    #[test]
    fn empty_projection_skips_fit() {
        let agg = aggregate(&[rec("1.0", "A", 1)]);
        let projection = project(&agg.entities, &FilterState::default().toggle_available());

        let mut rec = Recorder::default();
        present(&mut rec, &projection, &agg.summary);

        assert!(!rec.calls.iter().any(|c| c == "fit"));
        assert!(rec.calls.contains(&"visible=0".to_string()));
    }

    #[test]
    fn empty_dataset_writes_zero_counts() {
        let projection = project(&[], &FilterState::default());
        let mut rec = Recorder::default();
        present(&mut rec, &projection, &Summary::default());
        assert_eq!(rec.calls.len(), 1 + SummarySlot::iter().count());
        assert!(rec.calls[1..].iter().all(|c| c.ends_with("=0")));
    }
}
