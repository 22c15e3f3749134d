// ── Domain model ──
//
// Raw records as published, the deduplicated address entities derived from
// them, and the geographic primitives both are positioned with.

pub mod entity;
pub mod geo;
pub mod record;

pub use entity::{AddressEntity, CoordinateKey, ProviderClass};
pub use geo::{Bounds, LatLng};
pub use record::RawRecord;
