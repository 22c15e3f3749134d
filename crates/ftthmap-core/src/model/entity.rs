// ── Address entity domain types ──

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::geo::LatLng;
use super::record::RawRecord;

/// The exact raw `(latitude, longitude)` text pair used as the dedup key.
///
/// Keys compare by string, not by parsed value: `"1.0"` and `"1.00"` are
/// different keys even though they denote the same coordinate. Upstream
/// gives no reason for this, so it is preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoordinateKey {
    pub latitude: String,
    pub longitude: String,
}

impl CoordinateKey {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Key for a record, or `None` when either coordinate is missing/empty.
    pub fn of(record: &RawRecord) -> Option<Self> {
        if !record.has_coordinates() {
            return None;
        }
        Some(Self::new(
            record.latitude.clone().unwrap_or_default(),
            record.longitude.clone().unwrap_or_default(),
        ))
    }
}

impl fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Provider-count class of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderClass {
    /// Exactly one provider serves the address.
    Single,
    /// Two or more distinct providers serve the address.
    Multi,
}

/// A deduplicated address location with every provider observed there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressEntity {
    pub key: CoordinateKey,
    pub street_name: String,
    pub house: String,
    pub sub_house: Option<String>,
    pub full_address: Option<String>,
    pub gis_full_name: Option<String>,
    /// Flag of the first record seen at this coordinate. Not re-validated
    /// against later duplicates.
    pub is_available: i64,
    /// Distinct providers in first-seen order.
    pub providers: IndexSet<String>,
}

impl AddressEntity {
    /// Seed an entity from the first record seen at `key`.
    pub fn seed(key: CoordinateKey, record: &RawRecord) -> Self {
        let mut providers = IndexSet::new();
        providers.insert(record.provider.clone());
        Self {
            key,
            street_name: record.street_name.clone(),
            house: record.house.clone(),
            sub_house: record.sub_house.clone(),
            full_address: record.full_address.clone(),
            gis_full_name: record.gis_full_name.clone(),
            is_available: record.is_available,
            providers,
        }
    }

    /// Record another provider at this coordinate. Returns `true` if the
    /// provider was new.
    pub fn observe_provider(&mut self, provider: &str) -> bool {
        if self.providers.contains(provider) {
            return false;
        }
        self.providers.insert(provider.to_owned())
    }

    pub fn is_available(&self) -> bool {
        self.is_available == 1
    }

    pub fn provider_class(&self) -> ProviderClass {
        if self.providers.len() > 1 {
            ProviderClass::Multi
        } else {
            ProviderClass::Single
        }
    }

    pub fn has_provider(&self, provider: &str) -> bool {
        self.providers.contains(provider)
    }

    /// Parsed position; `None` if either coordinate is not a finite number.
    pub fn position(&self) -> Option<LatLng> {
        LatLng::parse(&self.key.latitude, &self.key.longitude)
    }

    /// Sub-house with blank values treated as absent.
    pub fn sub_house(&self) -> Option<&str> {
        self.sub_house.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// `"{street}, {house}"`, plus `" {subHouse}"` when one is set.
    pub fn display_name(&self) -> String {
        match self.sub_house() {
            Some(sub) => format!("{}, {} {sub}", self.street_name, self.house),
            None => format!("{}, {}", self.street_name, self.house),
        }
    }
}
