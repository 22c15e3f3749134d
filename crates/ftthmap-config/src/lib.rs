//! Shared configuration for the ftthmap CLI and TUI.
//!
//! TOML file with named dataset profiles and map defaults, layered with
//! `FTTHMAP_` environment variables, and translation of a profile into a
//! `ftthmap_core::DataSource` plus `LoadOptions`, with the flag overrides
//! both front-ends accept.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use ftthmap_core::source::DEFAULT_DATA_FILE;
use ftthmap_core::{CoreError, DataSource, LoadOptions};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown dataset '{name}'")]
    UnknownDataset { name: String, available: Vec<String> },

    #[error(transparent)]
    Source(#[from] CoreError),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Dataset used when none is named on the command line.
    pub default_dataset: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Initial map view.
    #[serde(default)]
    pub map: MapDefaults,

    /// Named dataset profiles.
    #[serde(default)]
    pub datasets: BTreeMap<String, DatasetProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Load timeout in seconds. Unset waits indefinitely.
    pub timeout: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapDefaults {
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Fraction of the marker box added on each side when fitting.
    #[serde(default = "default_fit_padding")]
    pub fit_padding: f64,
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            zoom: default_zoom(),
            fit_padding: default_fit_padding(),
        }
    }
}

// Almaty
fn default_center_lat() -> f64 {
    43.238_949
}
fn default_center_lng() -> f64 {
    76.889_709
}
fn default_zoom() -> u8 {
    12
}
fn default_fit_padding() -> f64 {
    0.05
}

pub const MAX_ZOOM: u8 = 19;

/// A named data file location.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetProfile {
    /// URL, `file://` URL, or path. Relative values resolve against
    /// `base_url` when one is set.
    pub source: String,

    pub base_url: Option<String>,

    pub description: Option<String>,

    /// Override the global timeout (seconds).
    pub timeout: Option<u64>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let map = &self.map;
        if !(-90.0..=90.0).contains(&map.center_lat) {
            return Err(invalid("map.center_lat", "must be within -90..=90"));
        }
        if !(-180.0..=180.0).contains(&map.center_lng) {
            return Err(invalid("map.center_lng", "must be within -180..=180"));
        }
        if map.zoom == 0 || map.zoom > MAX_ZOOM {
            return Err(invalid("map.zoom", &format!("must be within 1..={MAX_ZOOM}")));
        }
        if !(0.0..=1.0).contains(&map.fit_padding) {
            return Err(invalid("map.fit_padding", "must be within 0..=1"));
        }
        if let Some(ref name) = self.default_dataset {
            if !self.datasets.contains_key(name) {
                return Err(self.unknown_dataset(name));
            }
        }
        Ok(())
    }

    pub fn dataset_names(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }

    fn unknown_dataset(&self, name: &str) -> ConfigError {
        ConfigError::UnknownDataset {
            name: name.into(),
            available: self.dataset_names(),
        }
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "ftthmap", "ftthmap").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("ftthmap");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still layering environment overrides.
///
/// Nested keys use a double underscore: `FTTHMAP_MAP__ZOOM=14`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FTTHMAP_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Dataset resolution (without CLI flags) ──────────────────────────

/// A data source ready to load.
#[derive(Debug, Clone)]
pub struct ResolvedDataset {
    /// Profile name, `None` for the built-in fallback.
    pub name: Option<String>,
    pub source: DataSource,
    pub options: LoadOptions,
}

/// Resolve a dataset profile into a source and load options.
///
/// With no name and no `default_dataset`, falls back to `addresses.json`
/// in the working directory.
pub fn resolve_dataset(cfg: &Config, name: Option<&str>) -> Result<ResolvedDataset, ConfigError> {
    let timeout = |secs: Option<u64>| secs.map(Duration::from_secs);

    let Some(name) = name.or(cfg.default_dataset.as_deref()) else {
        return Ok(ResolvedDataset {
            name: None,
            source: DataSource::parse(DEFAULT_DATA_FILE, None)?,
            options: LoadOptions {
                timeout: timeout(cfg.defaults.timeout),
                ..LoadOptions::default()
            },
        });
    };

    let profile = cfg
        .datasets
        .get(name)
        .ok_or_else(|| cfg.unknown_dataset(name))?;

    let base = profile
        .base_url
        .as_deref()
        .map(|raw| {
            Url::parse(raw).map_err(|e| ConfigError::Validation {
                field: format!("datasets.{name}.base_url"),
                reason: e.to_string(),
            })
        })
        .transpose()?;

    Ok(ResolvedDataset {
        name: Some(name.into()),
        source: DataSource::parse(&profile.source, base.as_ref())?,
        options: LoadOptions {
            timeout: timeout(profile.timeout.or(cfg.defaults.timeout)),
            ..LoadOptions::default()
        },
    })
}

// ── Dataset resolution with front-end overrides ─────────────────────

/// Flag values a front-end layers over the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceOverrides<'a> {
    /// Data file URL or path. Wins over any profile.
    pub data: Option<&'a str>,
    /// Profile name; `None` means `default_dataset`.
    pub dataset: Option<&'a str>,
    /// Load timeout in seconds, replacing whichever timeout applies.
    pub timeout: Option<u64>,
}

/// Resolve the data source the way both front-ends do.
///
/// `data` bypasses profiles but keeps `defaults.timeout`; otherwise the
/// profile named by `dataset` (or the default) is resolved.
pub fn resolve_source(
    cfg: &Config,
    overrides: SourceOverrides<'_>,
) -> Result<ResolvedDataset, ConfigError> {
    let mut resolved = match overrides.data {
        Some(data) => ResolvedDataset {
            name: None,
            source: DataSource::parse(data, None)?,
            options: LoadOptions {
                timeout: cfg.defaults.timeout.map(Duration::from_secs),
                ..LoadOptions::default()
            },
        },
        None => resolve_dataset(cfg, overrides.dataset)?,
    };

    if let Some(secs) = overrides.timeout {
        resolved.options.timeout = Some(Duration::from_secs(secs));
    }
    Ok(resolved)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn profile(source: &str) -> DatasetProfile {
        DatasetProfile {
            source: source.into(),
            base_url: None,
            description: None,
            timeout: None,
        }
    }

    #[test]
    fn defaults_center_on_almaty() {
        let cfg = Config::default();
        assert_eq!(cfg.map.center_lat, 43.238_949);
        assert_eq!(cfg.map.center_lng, 76.889_709);
        assert_eq!(cfg.map.zoom, 12);
        assert!(cfg.defaults.timeout.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn fallback_dataset_is_local_file() {
        let resolved = resolve_dataset(&Config::default(), None).unwrap();
        assert!(resolved.name.is_none());
        assert_eq!(resolved.source, DataSource::File(DEFAULT_DATA_FILE.into()));
        assert!(resolved.options.timeout.is_none());
    }

    #[test]
    fn named_profile_with_base_url() {
        let mut cfg = Config::default();
        cfg.defaults.timeout = Some(30);
        cfg.datasets.insert(
            "almaty".into(),
            DatasetProfile {
                base_url: Some("https://maps.example.com/almaty/".into()),
                timeout: Some(5),
                ..profile("addresses.json")
            },
        );

        let resolved = resolve_dataset(&cfg, Some("almaty")).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("almaty"));
        assert_eq!(
            resolved.source.to_string(),
            "https://maps.example.com/almaty/addresses.json"
        );
        assert_eq!(resolved.options.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn default_dataset_is_used_when_unnamed() {
        let mut cfg = Config::default();
        cfg.datasets.insert("local".into(), profile("/srv/data/addresses.json"));
        cfg.default_dataset = Some("local".into());

        let resolved = resolve_dataset(&cfg, None).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("local"));
    }

    #[test]
    fn unknown_dataset_lists_available() {
        let mut cfg = Config::default();
        cfg.datasets.insert("a".into(), profile("a.json"));
        match resolve_dataset(&cfg, Some("b")).unwrap_err() {
            ConfigError::UnknownDataset { name, available } => {
                assert_eq!(name, "b");
                assert_eq!(available, ["a"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn data_override_bypasses_profiles() {
        let mut cfg = Config::default();
        cfg.defaults.timeout = Some(30);
        cfg.datasets.insert("almaty".into(), profile("https://example.com/a.json"));
        cfg.default_dataset = Some("almaty".into());

        let resolved = resolve_source(
            &cfg,
            SourceOverrides {
                data: Some("local.json"),
                ..SourceOverrides::default()
            },
        )
        .unwrap();
        assert!(resolved.name.is_none());
        assert_eq!(resolved.source, DataSource::File("local.json".into()));
        assert_eq!(resolved.options.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn timeout_override_beats_profile_timeout() {
        let mut cfg = Config::default();
        cfg.datasets.insert(
            "almaty".into(),
            DatasetProfile {
                timeout: Some(60),
                ..profile("a.json")
            },
        );

        let resolved = resolve_source(
            &cfg,
            SourceOverrides {
                dataset: Some("almaty"),
                timeout: Some(5),
                ..SourceOverrides::default()
            },
        )
        .unwrap();
        assert_eq!(resolved.name.as_deref(), Some("almaty"));
        assert_eq!(resolved.options.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn dataset_override_must_exist() {
        let overrides = SourceOverrides {
            dataset: Some("nowhere"),
            ..SourceOverrides::default()
        };
        assert!(matches!(
            resolve_source(&Config::default(), overrides),
            Err(ConfigError::UnknownDataset { .. })
        ));
    }

    #[test]
    fn validate_rejects_bad_map_values() {
        let mut cfg = Config::default();
        cfg.map.zoom = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Validation { .. })));

        let mut cfg = Config::default();
        cfg.map.center_lat = 120.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.datasets.insert("almaty".into(), profile("https://example.com/a.json"));
        cfg.default_dataset = Some("almaty".into());
        cfg.map.zoom = 14;
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_dataset.as_deref(), Some("almaty"));
        assert_eq!(loaded.map.zoom, 14);
        assert_eq!(loaded.datasets["almaty"].source, "https://example.com/a.json");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.defaults.output, "table");
        assert!(cfg.datasets.is_empty());
    }
}
