//! Geographic viewport for the map canvas: a center plus lat/lng spans.

use ftthmap_core::{Bounds, LatLng};

use crate::action::Pan;

/// Smallest span in degrees, roughly 50 m of latitude.
const MIN_SPAN: f64 = 0.0005;
const MAX_LAT_SPAN: f64 = 180.0;
const MAX_LNG_SPAN: f64 = 360.0;

/// Fraction of the visible span moved per pan step.
const PAN_STEP: f64 = 0.2;

/// A terminal cell is about twice as tall as it is wide.
const CELL_ASPECT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub lat_span: f64,
    pub lng_span: f64,
}

impl Viewport {
    /// Web-map style zoom level: level 0 shows the whole world width.
    pub fn at_zoom(center: LatLng, zoom: u8) -> Self {
        let lng_span = MAX_LNG_SPAN / 2f64.powi(i32::from(zoom));
        Self {
            center,
            lat_span: (lng_span * ground_scale(center.lat)).clamp(MIN_SPAN, MAX_LAT_SPAN),
            lng_span: lng_span.clamp(MIN_SPAN, MAX_LNG_SPAN),
        }
    }

    /// Show `bounds` with `padding` of its span added on every side.
    pub fn fit(bounds: Bounds, padding: f64) -> Self {
        let padded = bounds.padded(padding);
        Self {
            center: padded.center(),
            lat_span: (padded.north - padded.south).clamp(MIN_SPAN, MAX_LAT_SPAN),
            lng_span: (padded.east - padded.west).clamp(MIN_SPAN, MAX_LNG_SPAN),
        }
    }

    pub fn pan(&mut self, direction: Pan) {
        let (dlat, dlng) = match direction {
            Pan::North => (self.lat_span * PAN_STEP, 0.0),
            Pan::South => (-self.lat_span * PAN_STEP, 0.0),
            Pan::East => (0.0, self.lng_span * PAN_STEP),
            Pan::West => (0.0, -self.lng_span * PAN_STEP),
        };
        self.center = LatLng::new(
            (self.center.lat + dlat).clamp(-90.0, 90.0),
            (self.center.lng + dlng).clamp(-180.0, 180.0),
        );
    }

    pub fn zoom_in(&mut self) {
        self.lat_span = (self.lat_span / 2.0).max(MIN_SPAN);
        self.lng_span = (self.lng_span / 2.0).max(MIN_SPAN);
    }

    pub fn zoom_out(&mut self) {
        self.lat_span = (self.lat_span * 2.0).min(MAX_LAT_SPAN);
        self.lng_span = (self.lng_span * 2.0).min(MAX_LNG_SPAN);
    }

    /// Canvas `(x_bounds, y_bounds)` for an area of `width` x `height`
    /// cells.
    ///
    /// The shorter side is widened so a kilometer east reads the same
    /// length as a kilometer north. Spans only ever grow.
    pub fn canvas_bounds(&self, width: u16, height: u16) -> ([f64; 2], [f64; 2]) {
        let mut lat_span = self.lat_span;
        let mut lng_span = self.lng_span;

        if width > 0 && height > 0 {
            let scale = ground_scale(self.center.lat);
            let target = CELL_ASPECT * f64::from(height) / f64::from(width);
            let x_ground = lng_span * scale;
            if lat_span / x_ground < target {
                lat_span = target * x_ground;
            } else {
                lng_span = lat_span / target / scale;
            }
        }

        let half_lng = lng_span / 2.0;
        let half_lat = lat_span / 2.0;
        (
            [self.center.lng - half_lng, self.center.lng + half_lng],
            [self.center.lat - half_lat, self.center.lat + half_lat],
        )
    }
}

/// East-west ground distance per degree of longitude, relative to a
/// degree of latitude.
fn ground_scale(lat: f64) -> f64 {
    lat.to_radians().cos().max(0.01)
}
