// ── GeoJSON presenter ──
//
// Renders a projection as a `FeatureCollection` of `Point` features that a
// web map (Leaflet, MapLibre, geojson.io) can style straight from the
// feature properties.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::{Bounds, ProviderClass};
use crate::render::{MapPresenter, Marker, SummarySlot};

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `[west, south, east, north]`; absent when nothing is visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f64; 4]>,
    pub features: Vec<Feature>,
    /// Foreign member carrying the counter slots.
    pub summary: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub geometry: Point,
    pub properties: FeatureProperties,
}

#[derive(Debug, Clone, Serialize)]
pub struct Point {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `[lng, lat]`.
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub name: String,
    pub street_name: String,
    pub house: String,
    pub sub_house: Option<String>,
    pub full_address: Option<String>,
    pub gis_full_name: Option<String>,
    pub available: bool,
    pub provider_class: ProviderClass,
    pub providers: Vec<String>,
    pub marker_color: &'static str,
    pub marker_radius: u8,
    pub popup_text: String,
    pub popup_html: String,
}

/// Collects markers into GeoJSON features.
#[derive(Debug, Default)]
pub struct GeoJsonPresenter {
    features: Vec<Feature>,
    bounds: Option<Bounds>,
    summary: BTreeMap<String, usize>,
}

impl GeoJsonPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn collection(&self) -> FeatureCollection {
        FeatureCollection {
            kind: "FeatureCollection",
            bbox: self.bounds.map(|b| b.to_bbox()),
            features: self.features.clone(),
            summary: self.summary.clone(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(&self.collection())?)
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(&self.collection())?)
    }
}

impl MapPresenter for GeoJsonPresenter {
    fn clear_markers(&mut self) {
        self.features.clear();
        self.bounds = None;
    }

    fn add_marker(&mut self, marker: &Marker<'_>) {
        let entity = marker.entity;
        let popup = marker.popup;
        self.features.push(Feature {
            kind: "Feature",
            id: entity.key.to_string(),
            geometry: Point {
                kind: "Point",
                coordinates: [marker.position.lng, marker.position.lat],
            },
            properties: FeatureProperties {
                name: popup.title.clone(),
                street_name: entity.street_name.clone(),
                house: entity.house.clone(),
                sub_house: entity.sub_house().map(str::to_owned),
                full_address: entity.full_address.clone(),
                gis_full_name: entity.gis_full_name.clone(),
                available: entity.is_available(),
                provider_class: entity.provider_class(),
                providers: popup.providers.clone(),
                marker_color: marker.style.color.hex(),
                marker_radius: marker.style.radius,
                popup_text: popup.lines().join("\n"),
                popup_html: popup.to_html(),
            },
        });
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.bounds = Some(bounds);
    }

    fn write_summary(&mut self, slot: SummarySlot, value: usize) {
        self.summary.insert(slot.to_string(), value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::filter::FilterState;
    use crate::model::RawRecord;
    use crate::project::project;
    use crate::render::present;

    fn rec(lat: &str, lon: &str, provider: &str) -> RawRecord {
        RawRecord {
            street_name: "Abay Ave".into(),
            house: "1".into(),
            latitude: Some(lat.into()),
            longitude: Some(lon.into()),
            is_available: 1,
            provider: provider.into(),
            ..RawRecord::default()
        }
    }

    #[test]
    fn coordinates_are_lng_lat() {
        let agg = aggregate(&[rec("43.5", "76.25", "A")]);
        let projection = project(&agg.entities, &FilterState::default());
        let mut geo = GeoJsonPresenter::new();
        present(&mut geo, &projection, &agg.summary);

        let fc = geo.collection();
        assert_eq!(fc.features[0].geometry.coordinates, [76.25, 43.5]);
        assert_eq!(fc.bbox, Some([76.25, 43.5, 76.25, 43.5]));
        assert_eq!(fc.summary.get("visible"), Some(&1));
    }

    #[test]
    fn clear_drops_previous_features() {
        let agg = aggregate(&[rec("43.5", "76.25", "A")]);
        let projection = project(&agg.entities, &FilterState::default());
        let mut geo = GeoJsonPresenter::new();
        present(&mut geo, &projection, &agg.summary);
        present(&mut geo, &projection, &agg.summary);
        assert_eq!(geo.feature_count(), 1);

        let hidden = project(&agg.entities, &FilterState::default().toggle_available());
        present(&mut geo, &hidden, &agg.summary);
        assert_eq!(geo.feature_count(), 0);
        assert!(geo.collection().bbox.is_none());
    }
}
