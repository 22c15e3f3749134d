// ── Raw address record ──
//
// One row of the published data file: a single provider's view of a single
// geocoded address. The file is produced by ad-hoc scraping scripts, so the
// decoder accepts numbers where strings are expected and vice versa.

use serde::{Deserialize, Deserializer, Serialize};

/// A single provider/address combination as published in the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub street_name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub house: String,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub sub_house: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub full_address: Option<String>,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub gis_full_name: Option<String>,

    /// Raw latitude text. Kept verbatim: it is half of the dedup key.
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub latitude: Option<String>,

    /// Raw longitude text. Kept verbatim: it is half of the dedup key.
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub longitude: Option<String>,

    /// Availability flag; `1` means FTTH is available.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_available: i64,

    #[serde(default, deserialize_with = "lenient_string")]
    pub provider: String,
}

impl RawRecord {
    /// Both coordinate fields are present and non-empty.
    ///
    /// Only presence is checked; numeric validity is a projection concern.
    pub fn has_coordinates(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.latitude) && present(&self.longitude)
    }
}

// ── Lenient field decoders ──────────────────────────────────────────

/// Any JSON value. Objects and arrays land in `Other` so one odd field
/// never rejects the whole file.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Num(serde_json::Number),
    Bool(bool),
    Other(serde_json::Value),
}

impl Scalar {
    /// Text for display fields; structured values carry none.
    fn into_text(self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s),
            Self::Num(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Other(_) => None,
        }
    }

    /// Text for coordinates. A structured value is kept as its JSON text:
    /// it is present for aggregation and fails the numeric check later.
    fn into_coordinate(self) -> String {
        match self {
            Self::Other(value) => value.to_string(),
            scalar => scalar.into_text().unwrap_or_default(),
        }
    }

    fn into_flag(self) -> i64 {
        match self {
            Self::Bool(b) => i64::from(b),
            Self::Num(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(f64_to_flag))
                .unwrap_or(0),
            Self::Str(s) => s.trim().parse().unwrap_or(0),
            Self::Other(_) => 0,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn f64_to_flag(value: f64) -> i64 {
    value as i64
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.and_then(Scalar::into_text))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_coordinate))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map_or(0, Scalar::into_flag))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_record() {
        let rec: RawRecord = serde_json::from_value(json!({
            "streetName": "Abay Ave",
            "house": "10",
            "subHouse": "A",
            "fullAddress": "Almaty, Abay Ave 10A",
            "gisFullName": "Almaty, Abay Avenue, 10A",
            "latitude": "43.2389",
            "longitude": "76.8897",
            "isAvailable": 1,
            "provider": "telecom"
        }))
        .unwrap();

        assert_eq!(rec.street_name, "Abay Ave");
        assert_eq!(rec.sub_house.as_deref(), Some("A"));
        assert_eq!(rec.latitude.as_deref(), Some("43.2389"));
        assert_eq!(rec.is_available, 1);
        assert_eq!(rec.provider, "telecom");
        assert!(rec.has_coordinates());
    }

    #[test]
    fn numbers_become_text() {
        let rec: RawRecord = serde_json::from_value(json!({
            "streetName": "X",
            "house": 12,
            "latitude": 43.5,
            "longitude": 76.25,
            "isAvailable": "1"
        }))
        .unwrap();

        assert_eq!(rec.house, "12");
        assert_eq!(rec.latitude.as_deref(), Some("43.5"));
        assert_eq!(rec.longitude.as_deref(), Some("76.25"));
        assert_eq!(rec.is_available, 1);
        assert_eq!(rec.provider, "");
    }

    #[test]
    fn null_and_missing_fields_are_absent() {
        let rec: RawRecord = serde_json::from_value(json!({
            "streetName": "X",
            "house": "1",
            "subHouse": null,
            "latitude": null,
            "isAvailable": null
        }))
        .unwrap();

        assert!(rec.sub_house.is_none());
        assert!(rec.full_address.is_none());
        assert!(rec.latitude.is_none());
        assert_eq!(rec.is_available, 0);
        assert!(!rec.has_coordinates());
    }

    #[test]
    fn boolean_and_garbage_flags() {
        let yes: RawRecord = serde_json::from_value(json!({ "isAvailable": true })).unwrap();
        let junk: RawRecord = serde_json::from_value(json!({ "isAvailable": "maybe" })).unwrap();
        assert_eq!(yes.is_available, 1);
        assert_eq!(junk.is_available, 0);
    }

    #[test]
    fn structured_values_do_not_fail_the_record() {
        let rec: RawRecord = serde_json::from_value(json!({
            "streetName": "Abay Ave",
            "house": ["10"],
            "subHouse": { "v": "A" },
            "latitude": { "v": 1 },
            "longitude": [76.9],
            "isAvailable": { "v": 1 },
            "provider": "telecom"
        }))
        .unwrap();

        assert_eq!(rec.house, "");
        assert!(rec.sub_house.is_none());
        assert_eq!(rec.latitude.as_deref(), Some(r#"{"v":1}"#));
        assert_eq!(rec.longitude.as_deref(), Some("[76.9]"));
        assert_eq!(rec.is_available, 0);
        assert!(rec.has_coordinates());
    }

    #[test]
    fn empty_coordinate_is_not_present() {
        let rec = RawRecord {
            latitude: Some(String::new()),
            longitude: Some("76.0".into()),
            ..RawRecord::default()
        };
        assert!(!rec.has_coordinates());
    }

    #[test]
    fn unparsable_coordinate_is_still_present() {
        let rec = RawRecord {
            latitude: Some("abc".into()),
            longitude: Some("76.0".into()),
            ..RawRecord::default()
        };
        assert!(rec.has_coordinates());
    }
}
