// ── View projector ──
//
// Pure function of (entities, filter): the visible subset in input order,
// each with its marker style and popup content. Coordinates are re-parsed on
// every projection; entities whose coordinates are not numeric never render.

use std::fmt::Write as _;

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::filter::FilterState;
use crate::model::{AddressEntity, Bounds, LatLng, ProviderClass};

/// Marker fill color, keyed by provider class and availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MarkerColor {
    MultiAvailable,
    MultiUnavailable,
    SingleAvailable,
    SingleUnavailable,
}

impl MarkerColor {
    pub fn classify(class: ProviderClass, available: bool) -> Self {
        match (class, available) {
            (ProviderClass::Multi, true) => Self::MultiAvailable,
            (ProviderClass::Multi, false) => Self::MultiUnavailable,
            (ProviderClass::Single, true) => Self::SingleAvailable,
            (ProviderClass::Single, false) => Self::SingleUnavailable,
        }
    }

    /// CSS hex value.
    pub fn hex(self) -> &'static str {
        match self {
            Self::MultiAvailable => "#1e88e5",
            Self::MultiUnavailable => "#8e24aa",
            Self::SingleAvailable => "#43a047",
            Self::SingleUnavailable => "#e53935",
        }
    }

    /// `(r, g, b)` components of [`hex`](Self::hex).
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::MultiAvailable => (0x1e, 0x88, 0xe5),
            Self::MultiUnavailable => (0x8e, 0x24, 0xaa),
            Self::SingleAvailable => (0x43, 0xa0, 0x47),
            Self::SingleUnavailable => (0xe5, 0x39, 0x35),
        }
    }

    /// Legend label.
    pub fn label(self) -> &'static str {
        match self {
            Self::MultiAvailable => "Multiple providers, available",
            Self::MultiUnavailable => "Multiple providers, unavailable",
            Self::SingleAvailable => "Single provider, available",
            Self::SingleUnavailable => "Single provider, unavailable",
        }
    }
}

/// How a visible entity is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    pub color: MarkerColor,
    /// Circle radius in pixels.
    pub radius: u8,
}

impl MarkerStyle {
    pub const MULTI_RADIUS: u8 = 10;
    pub const SINGLE_RADIUS: u8 = 8;

    pub fn for_entity(class: ProviderClass, available: bool) -> Self {
        let radius = match class {
            ProviderClass::Multi => Self::MULTI_RADIUS,
            ProviderClass::Single => Self::SINGLE_RADIUS,
        };
        Self {
            color: MarkerColor::classify(class, available),
            radius,
        }
    }
}

/// Popup content for one marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub title: String,
    pub availability: &'static str,
    pub full_address: String,
    /// `"lat, lng"` with six decimals each.
    pub coordinates: String,
    pub gis_full_name: Option<String>,
    pub providers: Vec<String>,
}

impl Popup {
    pub fn new(entity: &AddressEntity, position: LatLng) -> Self {
        Self {
            title: entity.display_name(),
            availability: if entity.is_available() {
                "Available"
            } else {
                "Unavailable"
            },
            full_address: entity.full_address.clone().unwrap_or_default(),
            coordinates: format!("{:.6}, {:.6}", position.lat, position.lng),
            gis_full_name: entity.gis_full_name.clone().filter(|s| !s.is_empty()),
            providers: entity.providers.iter().cloned().collect(),
        }
    }

    /// Plain-text lines, title first.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.title.clone(),
            format!("Availability: {}", self.availability),
            format!("Providers: {}", self.providers.join(", ")),
            format!("Full Address: {}", self.full_address),
            format!("Coordinates: {}", self.coordinates),
        ];
        if let Some(ref gis) = self.gis_full_name {
            lines.push(format!("GIS Full Name: {gis}"));
        }
        lines
    }

    /// Escaped HTML fragment for web map popups.
    pub fn to_html(&self) -> String {
        let class = if self.availability == "Available" {
            "available"
        } else {
            "unavailable"
        };
        let mut html = String::from("<div class=\"popup-content\">");
        let _ = write!(html, "<h3>{}</h3>", escape_html(&self.title));
        let _ = write!(
            html,
            "<p class=\"availability {class}\"><strong>Availability:</strong> {}</p>",
            self.availability
        );
        let _ = write!(
            html,
            "<p><strong>Providers:</strong> {}</p>",
            escape_html(&self.providers.join(", "))
        );
        let _ = write!(
            html,
            "<p><strong>Full Address:</strong> {}</p>",
            escape_html(&self.full_address)
        );
        let _ = write!(
            html,
            "<p><strong>Coordinates:</strong> {}</p>",
            self.coordinates
        );
        if let Some(ref gis) = self.gis_full_name {
            let _ = write!(
                html,
                "<p><strong>GIS Full Name:</strong> {}</p>",
                escape_html(gis)
            );
        }
        html.push_str("</div>");
        html
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// An entity that passed every filter dimension and has a numeric position.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleEntity<'a> {
    pub entity: &'a AddressEntity,
    pub position: LatLng,
    pub class: ProviderClass,
    pub available: bool,
    pub style: MarkerStyle,
    pub popup: Popup,
}

/// Result of one projection pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Projection<'a> {
    pub visible: Vec<VisibleEntity<'a>>,
    /// Entities skipped for a non-numeric coordinate.
    pub invalid_positions: usize,
}

impl Projection<'_> {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Bounding box over every visible position.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.visible.iter().map(|v| v.position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisibleEntity<'_>> {
        self.visible.iter()
    }
}

/// Compute the visible subset of `entities` under `filter`.
pub fn project<'a>(entities: &'a [AddressEntity], filter: &FilterState) -> Projection<'a> {
    let mut projection = Projection::default();

    for entity in entities {
        let Some(position) = entity.position() else {
            projection.invalid_positions += 1;
            continue;
        };
        if !filter.admits(entity) {
            continue;
        }

        let class = entity.provider_class();
        let available = entity.is_available();
        projection.visible.push(VisibleEntity {
            entity,
            position,
            class,
            available,
            style: MarkerStyle::for_entity(class, available),
            popup: Popup::new(entity, position),
        });
    }

    projection
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::aggregate::aggregate;
    use crate::filter::FilterAction;
    use crate::model::{CoordinateKey, RawRecord};

    fn rec(lat: &str, lon: &str, provider: &str, available: i64, street: &str) -> RawRecord {
        RawRecord {
            street_name: street.into(),
            house: "1".into(),
            latitude: Some(lat.into()),
            longitude: Some(lon.into()),
            is_available: available,
            provider: provider.into(),
            ..RawRecord::default()
        }
    }

    fn fixture() -> Vec<AddressEntity> {
        aggregate(&[
            rec("43.20", "76.90", "telecom", 1, "Abay Ave"),
            rec("43.20", "76.90", "beeline", 1, "Abay Ave"),
            rec("43.21", "76.91", "telecom", 0, "Abay Ave"),
            rec("43.22", "76.92", "beeline", 1, "Dostyk St"),
            rec("43.23", "76.93", "telecom", 0, "Dostyk St"),
            rec("43.23", "76.93", "beeline", 0, "Dostyk St"),
            rec("abc", "76.94", "telecom", 1, "Dostyk St"),
        ])
        .entities
    }

    fn keys(p: &Projection<'_>) -> Vec<CoordinateKey> {
        p.iter().map(|v| v.entity.key.clone()).collect()
    }

    #[test]
    fn non_numeric_coordinate_is_excluded_at_projection() {
        let entities = fixture();
        assert_eq!(entities.len(), 5);

        let p = project(&entities, &FilterState::default());
        assert_eq!(p.visible_count(), 4);
        assert_eq!(p.invalid_positions, 1);
    }

    #[test]
    fn trailing_junk_after_a_number_still_renders() {
        let agg = aggregate(&[
            rec("43.2389 N", "76.9,", "telecom", 1, "Abay Ave"),
            rec("N 43.2", "76.9", "telecom", 1, "Abay Ave"),
        ]);
        let p = project(&agg.entities, &FilterState::default());

        assert_eq!(p.visible_count(), 1);
        assert_eq!(p.invalid_positions, 1);
        let first = p.iter().next().unwrap();
        assert_eq!(first.position, LatLng::new(43.2389, 76.9));
        assert_eq!(first.entity.key.latitude, "43.2389 N");
    }

    #[test]
    fn preserves_input_order() {
        let entities = fixture();
        let p = project(&entities, &FilterState::default());
        let expected: Vec<CoordinateKey> = entities
            .iter()
            .filter(|e| e.position().is_some())
            .map(|e| e.key.clone())
            .collect();
        assert_eq!(keys(&p), expected);
    }

    #[test]
    fn colors_and_sizes_follow_class_and_availability() {
        let entities = fixture();
        let p = project(&entities, &FilterState::default());
        let styles: Vec<MarkerStyle> = p.iter().map(|v| v.style).collect();

        assert_eq!(styles[0].color, MarkerColor::MultiAvailable);
        assert_eq!(styles[0].radius, MarkerStyle::MULTI_RADIUS);
        assert_eq!(styles[1].color, MarkerColor::SingleUnavailable);
        assert_eq!(styles[1].radius, MarkerStyle::SINGLE_RADIUS);
        assert_eq!(styles[2].color, MarkerColor::SingleAvailable);
        assert_eq!(styles[3].color, MarkerColor::MultiUnavailable);
        assert!(MarkerStyle::MULTI_RADIUS > MarkerStyle::SINGLE_RADIUS);
    }

    #[test]
    fn hiding_available_only_removes_available_entities() {
        let entities = fixture();
        let all = project(&entities, &FilterState::default());
        let hidden = project(&entities, &FilterState::default().toggle_available());

        let before: HashSet<CoordinateKey> = keys(&all).into_iter().collect();
        let after: HashSet<CoordinateKey> = keys(&hidden).into_iter().collect();
        let removed: Vec<_> = before.difference(&after).collect();

        assert!(after.is_subset(&before));
        for key in removed {
            let entity = entities.iter().find(|e| &e.key == key).unwrap();
            assert!(entity.is_available());
        }
        for v in hidden.iter() {
            assert!(!v.available);
        }
    }

    #[test]
    fn monotonic_across_every_dimension() {
        let entities = fixture();
        let toggles = [
            FilterAction::ToggleAvailable,
            FilterAction::ToggleUnavailable,
            FilterAction::ToggleMultiProvider,
            FilterAction::ToggleSingleProvider,
        ];
        let base: HashSet<CoordinateKey> = keys(&project(&entities, &FilterState::default()))
            .into_iter()
            .collect();
        for toggle in toggles {
            let narrowed = FilterState::default().apply(toggle.clone());
            let visible: HashSet<CoordinateKey> =
                keys(&project(&entities, &narrowed)).into_iter().collect();
            assert!(visible.is_subset(&base), "{toggle:?} added entities");
        }
    }

    #[test]
    fn street_select_then_clear_restores_view() {
        let entities = fixture();
        let unfiltered = keys(&project(&entities, &FilterState::default()));

        let selected = FilterState::default().select_street("Dostyk St");
        let narrowed = project(&entities, &selected);
        assert_eq!(narrowed.visible_count(), 2);
        assert!(narrowed.iter().all(|v| v.entity.street_name == "Dostyk St"));

        let cleared = selected.clear_street();
        assert_eq!(keys(&project(&entities, &cleared)), unfiltered);
    }

    #[test]
    fn provider_filter_matches_any_provider_at_entity() {
        let entities = fixture();
        let p = project(&entities, &FilterState::default().select_provider("beeline"));
        assert_eq!(p.visible_count(), 3);
        assert!(p.iter().all(|v| v.entity.has_provider("beeline")));
    }

    #[test]
    fn bounds_cover_visible_only() {
        let entities = fixture();
        let p = project(&entities, &FilterState::default().select_street("Abay Ave"));
        let b = p.bounds().unwrap();
        assert!((b.north - 43.21).abs() < 1e-9);
        assert!((b.south - 43.20).abs() < 1e-9);

        let none = project(&entities, &FilterState::default().select_street("Nowhere"));
        assert!(none.bounds().is_none());
        assert!(none.is_empty());
    }

    #[test]
    fn popup_content() {
        let mut r = rec("43.2", "76.9", "telecom", 1, "Abay <Ave>");
        r.sub_house = Some("A".into());
        r.full_address = Some("Almaty, Abay Ave 1A".into());
        r.gis_full_name = Some("Almaty & Co".into());
        let entities = aggregate(&[r]).entities;
        let p = project(&entities, &FilterState::default());
        let popup = &p.visible[0].popup;

        assert_eq!(popup.title, "Abay <Ave>, 1 A");
        assert_eq!(popup.coordinates, "43.200000, 76.900000");
        assert_eq!(popup.availability, "Available");

        let lines = popup.lines();
        assert_eq!(lines[0], "Abay <Ave>, 1 A");
        assert!(lines.contains(&"GIS Full Name: Almaty & Co".to_string()));

        let html = popup.to_html();
        assert!(html.contains("<h3>Abay &lt;Ave&gt;, 1 A</h3>"));
        assert!(html.contains("Almaty &amp; Co"));
        assert!(html.contains("availability available"));
    }

    #[test]
    fn popup_omits_missing_optional_fields() {
        let entities = aggregate(&[rec("1.0", "2.0", "A", 0, "X")]).entities;
        let p = project(&entities, &FilterState::default());
        let popup = &p.visible[0].popup;
        assert_eq!(popup.full_address, "");
        assert!(popup.gis_full_name.is_none());
        assert!(!popup.to_html().contains("GIS Full Name"));
    }
}
