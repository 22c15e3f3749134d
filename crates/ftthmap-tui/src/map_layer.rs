//! Marker layer for the terminal canvas.
//!
//! [`MapLayer`] is the TUI's [`MapPresenter`]: the core clears and refills
//! it on every filter change, and the map screen paints whatever it holds.

use std::collections::HashMap;

use ftthmap_core::{Bounds, LatLng, MapPresenter, Marker, MarkerColor, MarkerStyle, SummarySlot};

/// One marker, owned so it outlives the projection it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub position: LatLng,
    pub color: MarkerColor,
    pub radius: u8,
}

impl MapPoint {
    pub fn symbol(&self) -> &'static str {
        marker_symbol(self.radius)
    }
}

/// Glyph for a marker radius. Multi-provider markers are drawn larger.
pub fn marker_symbol(radius: u8) -> &'static str {
    if radius >= MarkerStyle::MULTI_RADIUS {
        "●"
    } else {
        "•"
    }
}

#[derive(Debug, Default)]
pub struct MapLayer {
    points: Vec<MapPoint>,
    fit: Option<Bounds>,
    counters: HashMap<SummarySlot, usize>,
}

impl MapLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[MapPoint] {
        &self.points
    }

    /// Bounds of the last non-empty render.
    pub fn fit(&self) -> Option<Bounds> {
        self.fit
    }

    pub fn counter(&self, slot: SummarySlot) -> usize {
        self.counters.get(&slot).copied().unwrap_or(0)
    }
}

impl MapPresenter for MapLayer {
    fn clear_markers(&mut self) {
        self.points.clear();
    }

    fn add_marker(&mut self, marker: &Marker<'_>) {
        self.points.push(MapPoint {
            position: marker.position,
            color: marker.style.color,
            radius: marker.style.radius,
        });
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.fit = Some(bounds);
    }

    fn write_summary(&mut self, slot: SummarySlot, value: usize) {
        self.counters.insert(slot, value);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use ftthmap_core::{Dataset, FilterState, RawRecord, present, project};

    use super::*;

    fn record(lat: &str, lng: &str, provider: &str, available: i64) -> RawRecord {
        RawRecord {
            street_name: "Abay Ave".into(),
            house: "10".into(),
            latitude: Some(lat.into()),
            longitude: Some(lng.into()),
            is_available: available,
            provider: provider.into(),
            ..RawRecord::default()
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(&[
            record("43.25", "76.90", "telecom", 1),
            record("43.25", "76.90", "beeline", 1),
            record("43.30", "76.95", "telecom", 0),
        ])
    }

    #[test]
    fn present_fills_points_and_counters() {
        let ds = dataset();
        let mut layer = MapLayer::new();
        present(&mut layer, &project(&ds.entities, &FilterState::default()), &ds.summary);

        assert_eq!(layer.points().len(), 2);
        assert_eq!(layer.points()[0].color, MarkerColor::MultiAvailable);
        assert_eq!(layer.points()[0].symbol(), "●");
        assert_eq!(layer.points()[1].symbol(), "•");
        assert_eq!(layer.counter(SummarySlot::Total), 2);
        assert_eq!(layer.counter(SummarySlot::Visible), 2);
        assert!(layer.fit().is_some());
    }

    #[test]
    fn refilter_replaces_markers_and_keeps_last_fit() {
        let ds = dataset();
        let mut layer = MapLayer::new();
        present(&mut layer, &project(&ds.entities, &FilterState::default()), &ds.summary);
        let fitted = layer.fit();

        let none = FilterState::default().toggle_available().toggle_unavailable();
        present(&mut layer, &project(&ds.entities, &none), &ds.summary);

        assert!(layer.points().is_empty());
        assert_eq!(layer.counter(SummarySlot::Visible), 0);
        assert_eq!(layer.counter(SummarySlot::Total), 2);
        assert_eq!(layer.fit(), fitted);
    }
}
