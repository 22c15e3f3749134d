// ── Aggregator ──
//
// Single pass over the raw records: group by raw coordinate key, seed each
// entity from its first record, and union provider names in first-seen
// order. Counts are computed once over the finished entities.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{AddressEntity, CoordinateKey, ProviderClass, RawRecord};

/// Summary counts over an aggregated entity set.
///
/// `multi_provider + single_provider == total` and
/// `available + unavailable == total` hold by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Input records, including skipped ones.
    pub records: usize,
    /// Records dropped for a missing or empty coordinate.
    pub skipped: usize,
    /// Distinct coordinate keys.
    pub total: usize,
    pub multi_provider: usize,
    pub single_provider: usize,
    pub available: usize,
    pub unavailable: usize,
}

impl Summary {
    /// Count classes over an entity list.
    pub fn of(entities: &[AddressEntity]) -> Self {
        let total = entities.len();
        let multi_provider = entities
            .iter()
            .filter(|e| e.provider_class() == ProviderClass::Multi)
            .count();
        let available = entities.iter().filter(|e| e.is_available()).count();

        Self {
            records: 0,
            skipped: 0,
            total,
            multi_provider,
            single_provider: total - multi_provider,
            available,
            unavailable: total - available,
        }
    }
}

/// Output of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Entities in first-seen order of their coordinate key.
    pub entities: Vec<AddressEntity>,
    pub summary: Summary,
}

/// Group raw records into deduplicated address entities.
pub fn aggregate<'a, I>(records: I) -> Aggregation
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut entities: Vec<AddressEntity> = Vec::new();
    let mut index: HashMap<CoordinateKey, usize> = HashMap::new();
    let mut seen = 0usize;
    let mut skipped = 0usize;

    for record in records {
        seen += 1;
        let Some(key) = CoordinateKey::of(record) else {
            skipped += 1;
            continue;
        };

        if let Some(&slot) = index.get(&key) {
            if let Some(entity) = entities.get_mut(slot) {
                entity.observe_provider(&record.provider);
            }
        } else {
            index.insert(key.clone(), entities.len());
            entities.push(AddressEntity::seed(key, record));
        }
    }

    let summary = Summary {
        records: seen,
        skipped,
        ..Summary::of(&entities)
    };

    debug!(
        records = summary.records,
        skipped = summary.skipped,
        entities = summary.total,
        multi = summary.multi_provider,
        available = summary.available,
        "aggregated address records"
    );

    Aggregation { entities, summary }
}

/// Expand entities back into one raw record per provider.
///
/// Feeding the result to [`aggregate`] reproduces the same entities.
pub fn flatten(entities: &[AddressEntity]) -> Vec<RawRecord> {
    entities
        .iter()
        .flat_map(|e| {
            e.providers.iter().map(move |p| RawRecord {
                street_name: e.street_name.clone(),
                house: e.house.clone(),
                sub_house: e.sub_house.clone(),
                full_address: e.full_address.clone(),
                gis_full_name: e.gis_full_name.clone(),
                latitude: Some(e.key.latitude.clone()),
                longitude: Some(e.key.longitude.clone()),
                is_available: e.is_available,
                provider: p.clone(),
            })
        })
        .collect()
}
