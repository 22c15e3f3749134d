//! Address aggregation and map projection for FTTH availability data.
//!
//! The data file lists one row per provider per geocoded address. This crate
//! turns it into something a map can draw:
//!
//! - **[`aggregate()`]** collapses rows sharing a raw coordinate pair into one
//!   [`AddressEntity`] with an ordered, deduplicated provider set, and counts
//!   the [`Summary`] classes.
//!
//! - **[`FilterState`]** holds the four filter dimensions (availability,
//!   provider count, street, provider). Transitions are pure and can be
//!   dispatched as [`FilterAction`]s.
//!
//! - **[`project()`]** computes the visible subset for a filter, with marker
//!   styles and popup content. It is recomputed from scratch on every change.
//!
//! - **[`DataStore`]** holds the current [`Dataset`] behind a `watch` channel;
//!   [`load_records()`] fetches the record array once from a URL or file.
//!
//! - **[`MapPresenter`]** is the seam to any drawing surface;
//!   [`present()`] drives a full re-render and [`GeoJsonPresenter`] renders to
//!   a GeoJSON `FeatureCollection`.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod geojson;
pub mod index;
pub mod model;
pub mod project;
pub mod render;
pub mod source;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{Aggregation, Summary, aggregate};
pub use error::CoreError;
pub use filter::{FilterAction, FilterState};
pub use geojson::GeoJsonPresenter;
pub use model::{AddressEntity, Bounds, CoordinateKey, LatLng, ProviderClass, RawRecord};
pub use project::{MarkerColor, MarkerStyle, Popup, Projection, VisibleEntity, project};
pub use render::{MapPresenter, Marker, SummarySlot, present};
pub use source::{DataSource, LoadOptions, load_records};
pub use store::{DataStore, Dataset};
