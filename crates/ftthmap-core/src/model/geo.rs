// ── Geographic primitives ──

use serde::{Deserialize, Serialize};

/// A parsed WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Parse a raw coordinate pair. Returns `None` unless both halves are
    /// finite numbers.
    pub fn parse(lat: &str, lng: &str) -> Option<Self> {
        let lat = parse_coordinate(lat)?;
        let lng = parse_coordinate(lng)?;
        Some(Self { lat, lng })
    }
}

/// Reads the longest numeric prefix after leading whitespace, so
/// `"43.2389 N"` is `43.2389`. No numeric prefix means not-a-number.
fn parse_coordinate(raw: &str) -> Option<f64> {
    let text = raw.trim_start();
    let len = numeric_prefix_len(text.as_bytes());
    text.get(..len)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Length of `[+-]digits[.digits][(e|E)[+-]digits]` at the start of
/// `bytes`, or 0 when there is no mantissa digit.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |start: usize| {
        bytes
            .get(start..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = digits_from(end + 1 + sign);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }
    end
}

/// An axis-aligned bounding box over a set of positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// A zero-area box around a single point.
    pub fn around(p: LatLng) -> Self {
        Self {
            south: p.lat,
            west: p.lng,
            north: p.lat,
            east: p.lng,
        }
    }

    /// Grow the box to include `p`.
    pub fn extend(&mut self, p: LatLng) {
        self.south = self.south.min(p.lat);
        self.north = self.north.max(p.lat);
        self.west = self.west.min(p.lng);
        self.east = self.east.max(p.lng);
    }

    /// Smallest box covering every position, or `None` for an empty input.
    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Self::around(iter.next()?);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            f64::midpoint(self.south, self.north),
            f64::midpoint(self.west, self.east),
        )
    }

    /// Expand each side by `fraction` of the box span. Degenerate spans
    /// (a single point) are padded by a small absolute margin instead so
    /// the result always has area.
    pub fn padded(&self, fraction: f64) -> Self {
        const MIN_MARGIN: f64 = 0.001;
        let lat_pad = ((self.north - self.south) * fraction).max(MIN_MARGIN);
        let lng_pad = ((self.east - self.west) * fraction).max(MIN_MARGIN);
        Self {
            south: self.south - lat_pad,
            west: self.west - lng_pad,
            north: self.north + lat_pad,
            east: self.east + lng_pad,
        }
    }

    /// GeoJSON `bbox` ordering: `[west, south, east, north]`.
    pub fn to_bbox(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }
}
