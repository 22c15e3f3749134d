// ── Data source loader ──
//
// One-shot fetch of the record array. There is no retry: any failure is
// returned to the caller, which decides whether to stay in the empty state
// (TUI) or exit non-zero (CLI).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::error::CoreError;
use crate::model::RawRecord;

/// File name the data publisher writes next to the map page.
pub const DEFAULT_DATA_FILE: &str = "addresses.json";

const BODY_PREVIEW_LEN: usize = 200;

/// Where the record array comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(Url),
    File(PathBuf),
}

impl DataSource {
    /// Parse a user-supplied source.
    ///
    /// `http://` and `https://` inputs are URLs, `file://` inputs and anything
    /// else are paths. When `base` is set, relative inputs are joined onto it
    /// instead, mirroring a page fetching a relative path from its origin.
    pub fn parse(input: &str, base: Option<&Url>) -> Result<Self, CoreError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CoreError::InvalidSource {
                input: input.into(),
                reason: "source is empty".into(),
            });
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            let url = Url::parse(input).map_err(|e| CoreError::InvalidSource {
                input: input.into(),
                reason: e.to_string(),
            })?;
            return Ok(Self::Url(url));
        }

        if input.starts_with("file://") {
            let url = Url::parse(input).map_err(|e| CoreError::InvalidSource {
                input: input.into(),
                reason: e.to_string(),
            })?;
            let path = url.to_file_path().map_err(|()| CoreError::InvalidSource {
                input: input.into(),
                reason: "not a local file URL".into(),
            })?;
            return Ok(Self::File(path));
        }

        match base {
            Some(base) => {
                let url = base.join(input).map_err(|e| CoreError::InvalidSource {
                    input: input.into(),
                    reason: e.to_string(),
                })?;
                Ok(Self::Url(url))
            }
            None => Ok(Self::File(PathBuf::from(input))),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl FromStr for DataSource {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Knobs for a single load.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: concat!("ftthmap/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// Fetch and decode the record array from `source`.
pub async fn load_records(
    source: &DataSource,
    options: &LoadOptions,
) -> Result<Vec<RawRecord>, CoreError> {
    let origin = source.to_string();
    debug!(%origin, "loading address records");

    let body = match source {
        DataSource::Url(url) => fetch(url, options).await?,
        DataSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CoreError::Read {
                    path: path.display().to_string(),
                    source,
                })?
        }
    };

    let records = decode_records(&origin, &body)?;
    debug!(%origin, count = records.len(), "decoded address records");
    Ok(records)
}

/// Decode a JSON array of records. `null` and `[]` are both empty.
pub fn decode_records(origin: &str, body: &str) -> Result<Vec<RawRecord>, CoreError> {
    let parsed: Option<Vec<RawRecord>> =
        serde_json::from_str(body).map_err(|e| {
            let preview: String = body.chars().take(BODY_PREVIEW_LEN).collect();
            CoreError::Decode {
                origin: origin.into(),
                message: format!("{e} (body preview: {preview:?})"),
            }
        })?;

    match parsed {
        Some(records) if !records.is_empty() => Ok(records),
        _ => Err(CoreError::EmptyDataset {
            origin: origin.into(),
        }),
    }
}

async fn fetch(url: &Url, options: &LoadOptions) -> Result<String, CoreError> {
    let mut builder = reqwest::Client::builder().user_agent(options.user_agent.as_str());
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    let http = builder.build().map_err(|e| CoreError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let resp = http
        .get(url.clone())
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| transport_error(url, options, &e))?;

    let status = resp.status();
    if !status.is_success() {
        warn!(%url, %status, "data request rejected");
        return Err(CoreError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    resp.text()
        .await
        .map_err(|e| transport_error(url, options, &e))
}

fn transport_error(url: &Url, options: &LoadOptions, err: &reqwest::Error) -> CoreError {
    match options.timeout {
        Some(timeout) if err.is_timeout() => CoreError::Timeout {
            url: url.to_string(),
            timeout_secs: timeout.as_secs(),
        },
        _ => CoreError::Fetch {
            url: url.to_string(),
            reason: err.to_string(),
        },
    }
}
