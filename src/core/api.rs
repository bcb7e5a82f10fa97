use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::TimeseriesPoint;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to connect to analysis backend: {0}")]
    Connection(#[source] reqwest::Error),
    #[error("analysis backend returned {status}: {body}")]
    Server {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected response from analysis backend: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Body of `POST /run`.
#[derive(Debug, Clone, Serialize)]
pub struct RunRequest {
    pub mine_geojson: Value,
    pub no_go_geojson_list: Vec<Value>,
}

impl RunRequest {
    pub fn new(legal: Value, nogo: Value) -> Self {
        Self {
            mine_geojson: legal,
            no_go_geojson_list: vec![nogo],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Idle,
    Running,
    Done,
    Error,
    #[serde(other)]
    Unknown,
}

/// Body of `GET /progress`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressReport {
    #[serde(default)]
    pub progress: f64,
    pub status: JobStatus,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /results`, as the backend reports it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResults {
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    #[serde(default)]
    pub mine: RawMine,
    #[serde(default)]
    pub no_go_zones: ZoneList,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub analysis_start: Option<String>,
    #[serde(default)]
    pub analysis_end: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMine {
    #[serde(default)]
    pub timeseries: Vec<TimeseriesPoint>,
    #[serde(default)]
    pub predicted_next_area: Option<f64>,
    #[serde(default)]
    pub predicted_next_month_area: Option<f64>,
    #[serde(default)]
    pub quantified_maps: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawZone {
    #[serde(default)]
    pub timeseries: Vec<TimeseriesPoint>,
    #[serde(default)]
    pub predicted_next_area: Option<f64>,
    #[serde(default)]
    pub first_violation: Option<String>,
}

/// No-go zones in the order the backend reported their keys.
#[derive(Debug, Clone, Default)]
pub struct ZoneList(pub Vec<(String, RawZone)>);

impl<'de> Deserialize<'de> for ZoneList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ZoneListVisitor;

        impl<'de> Visitor<'de> for ZoneListVisitor {
            type Value = ZoneList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of no-go zone results")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<ZoneList, E> {
                Ok(ZoneList::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ZoneList, A::Error> {
                let mut zones = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, zone)) = map.next_entry::<String, RawZone>()? {
                    zones.push((name, zone));
                }
                Ok(ZoneList(zones))
            }
        }

        deserializer.deserialize_any(ZoneListVisitor)
    }
}

/// The three calls a job needs from the analysis backend.
pub trait AnalysisBackend {
    async fn submit(&self, request: &RunRequest) -> Result<(), ApiError>;
    async fn progress(&self) -> Result<ProgressReport, ApiError>;
    async fn results(&self) -> Result<RawResults, ApiError>;
}

/// Join a backend-relative path onto the base URL.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Connection)?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    pub async fn submit(&self, request: &RunRequest) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("/run"))
            .json(request)
            .send()
            .await
            .map_err(ApiError::Connection)?;
        check_status(response).await?;
        Ok(())
    }

    pub async fn progress(&self) -> Result<ProgressReport, ApiError> {
        self.get_json("/progress").await
    }

    pub async fn results(&self) -> Result<RawResults, ApiError> {
        self.get_json("/results").await
    }

    /// Fetch raw image bytes; `src` is an absolute URL built by the assembler.
    pub async fn fetch_image(&self, src: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .get(src)
            .send()
            .await
            .map_err(ApiError::Connection)?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await.map_err(ApiError::Decode)?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(ApiError::Connection)?;
        check_status(response)
            .await?
            .json::<T>()
            .await
            .map_err(ApiError::Decode)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!("Analysis backend returned {}: {}", status, body);
    Err(ApiError::Server { status, body })
}

impl AnalysisBackend for ApiClient {
    async fn submit(&self, request: &RunRequest) -> Result<(), ApiError> {
        ApiClient::submit(self, request).await
    }

    async fn progress(&self) -> Result<ProgressReport, ApiError> {
        ApiClient::progress(self).await
    }

    async fn results(&self) -> Result<RawResults, ApiError> {
        ApiClient::results(self).await
    }
}
