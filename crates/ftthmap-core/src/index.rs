// ── Street / provider indexes ──

use std::collections::BTreeSet;

use crate::model::AddressEntity;

/// Sorted distinct values produced by `extractor` over every entity.
///
/// The extractor may yield any number of values per entity; they are
/// flattened before deduplication so a provider shared by many entities
/// appears once.
pub fn unique_sorted<'a, F, I>(entities: &'a [AddressEntity], extractor: F) -> Vec<String>
where
    F: Fn(&'a AddressEntity) -> I,
    I: IntoIterator<Item = &'a str>,
{
    entities
        .iter()
        .flat_map(extractor)
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

pub fn streets(entities: &[AddressEntity]) -> Vec<String> {
    unique_sorted(entities, |e| std::iter::once(e.street_name.as_str()))
}

pub fn providers(entities: &[AddressEntity]) -> Vec<String> {
    unique_sorted(entities, |e| e.providers.iter().map(String::as_str))
}

/// Case-insensitive substring match. An empty or blank query matches all.
pub fn search<'a>(values: &'a [String], query: &str) -> Vec<&'a str> {
    let needle = query.trim().to_lowercase();
    values
        .iter()
        .map(String::as_str)
        .filter(|v| needle.is_empty() || v.to_lowercase().contains(&needle))
        .collect()
}
