//! Remote client for the build service API.
//!
//! [`ApiClient`] is the seam between commands and the wire: one fetch
//! operation per resource kind, no retries. [`HttpClient`] is the
//! production implementation on top of `reqwest`; tests substitute
//! their own implementations with canned envelopes.

use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::types::{
    ArtifactResponse, BlueprintsResponse, ComposeInfoResponse, ErrorEnvelope, FrozenResponse,
    ItemError, ModulesResponse,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

const API_PREFIX: &str = "/api/v1";

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Downloadable compose artifacts and their file suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeArtifact {
    Logs,
    Metadata,
}

impl ComposeArtifact {
    pub fn path_segment(self) -> &'static str {
        match self {
            ComposeArtifact::Logs => "logs",
            ComposeArtifact::Metadata => "metadata",
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ComposeArtifact::Logs => "-logs.tar",
            ComposeArtifact::Metadata => "-metadata.tar",
        }
    }
}

/// One fetch operation per resource kind. Transport and decode failures
/// abort the calling command; per-item errors ride inside the returned
/// envelopes.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Fetch blueprints by name, JSON envelope.
    async fn blueprints_info(&self, names: &[String]) -> Result<BlueprintsResponse, ClientError>;

    /// Fetch blueprints by name in the service's TOML rendering; the
    /// document is passed through verbatim.
    async fn blueprints_toml(&self, names: &[String]) -> Result<String, ClientError>;

    /// Fetch depsolved blueprints by name, JSON envelope.
    async fn blueprints_freeze(&self, names: &[String]) -> Result<FrozenResponse, ClientError>;

    /// Fetch depsolved blueprints in the service's TOML rendering.
    async fn blueprints_freeze_toml(&self, names: &[String]) -> Result<String, ClientError>;

    /// Fetch details for one compose.
    async fn compose_info(&self, uuid: &str) -> Result<ComposeInfoResponse, ClientError>;

    /// Download a compose's logs or metadata archive.
    async fn compose_artifact(
        &self,
        uuid: &str,
        kind: ComposeArtifact,
    ) -> Result<ArtifactResponse, ClientError>;

    /// Fetch details for the named modules, optionally narrowed to one
    /// distribution.
    async fn modules_info(
        &self,
        names: &[String],
        distro: Option<&str>,
    ) -> Result<ModulesResponse, ClientError>;
}

/// `reqwest`-backed client with connect and request timeouts.
pub struct HttpClient {
    client: reqwest::Client,
    base: reqwest::Url,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| ClientError::Request(format!("building HTTP client: {}", e)))?;
        let base = reqwest::Url::parse(&config.url)
            .map_err(|e| ClientError::BadUrl(format!("{}: {}", config.url, e)))?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ClientError> {
        self.base
            .join(&format!("{}{}", API_PREFIX, path))
            .map_err(|e| ClientError::BadUrl(e.to_string()))
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::Response, ClientError> {
        let url = self.endpoint(path)?;
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        request.send().await.map_err(map_transport_error)
    }

    /// GET a JSON envelope; non-2xx answers that still carry an error
    /// envelope are recovered via `on_errors` so the caller can surface
    /// them per item instead of aborting.
    async fn get_enveloped<T, F>(
        &self,
        path: String,
        query: &[(&str, &str)],
        on_errors: F,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned + PathTagged,
        F: FnOnce(Vec<ItemError>) -> Option<T>,
    {
        let response = self.get(&path, query).await?;
        let status = response.status();
        let body = read_text(response).await?;
        if status.is_success() {
            let mut decoded: T = decode(&body)?;
            decoded.set_path(path);
            Ok(decoded)
        } else if let Some(mut fallback) = parse_error_envelope(&body).and_then(on_errors) {
            fallback.set_path(path);
            Ok(fallback)
        } else {
            Err(ClientError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ClientError> {
        let response = self.get(path, query).await?;
        let status = response.status();
        let body = read_text(response).await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ClientError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Envelopes that carry their request path into structured output.
trait PathTagged {
    fn set_path(&mut self, path: String);
}

macro_rules! path_tagged {
    ($($ty:ty),*) => {
        $(impl PathTagged for $ty {
            fn set_path(&mut self, path: String) {
                self.path = path;
            }
        })*
    };
}

path_tagged!(
    BlueprintsResponse,
    FrozenResponse,
    ComposeInfoResponse,
    ModulesResponse
);

#[async_trait]
impl ApiClient for HttpClient {
    async fn blueprints_info(&self, names: &[String]) -> Result<BlueprintsResponse, ClientError> {
        let path = format!("/blueprints/info/{}", names.join(","));
        // Unknown blueprints come back inside the 200 envelope; a bare
        // error envelope is not expected here.
        self.get_enveloped(path, &[], |_| None).await
    }

    async fn blueprints_toml(&self, names: &[String]) -> Result<String, ClientError> {
        let path = format!("/blueprints/info/{}", names.join(","));
        self.get_text(&path, &[("format", "toml")]).await
    }

    async fn blueprints_freeze(&self, names: &[String]) -> Result<FrozenResponse, ClientError> {
        let path = format!("/blueprints/freeze/{}", names.join(","));
        self.get_enveloped(path, &[], |_| None).await
    }

    async fn blueprints_freeze_toml(&self, names: &[String]) -> Result<String, ClientError> {
        let path = format!("/blueprints/freeze/{}", names.join(","));
        self.get_text(&path, &[("format", "toml")]).await
    }

    async fn compose_info(&self, uuid: &str) -> Result<ComposeInfoResponse, ClientError> {
        let path = format!("/compose/info/{}", uuid);
        self.get_enveloped(path, &[], |errors| {
            Some(ComposeInfoResponse {
                errors,
                ..Default::default()
            })
        })
        .await
    }

    async fn compose_artifact(
        &self,
        uuid: &str,
        kind: ComposeArtifact,
    ) -> Result<ArtifactResponse, ClientError> {
        let path = format!("/compose/{}/{}", kind.path_segment(), uuid);
        let response = self.get(&path, &[]).await?;
        let status = response.status();
        if status.is_success() {
            let content = response
                .bytes()
                .await
                .map_err(|e| ClientError::Request(format!("reading response body: {}", e)))?
                .to_vec();
            Ok(ArtifactResponse {
                content,
                errors: Vec::new(),
            })
        } else {
            let body = read_text(response).await?;
            if let Some(errors) = parse_error_envelope(&body) {
                Ok(ArtifactResponse {
                    content: Vec::new(),
                    errors,
                })
            } else {
                Err(ClientError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn modules_info(
        &self,
        names: &[String],
        distro: Option<&str>,
    ) -> Result<ModulesResponse, ClientError> {
        let path = format!("/modules/info/{}", names.join(","));
        let query: Vec<(&str, &str)> = distro.map(|d| ("distro", d)).into_iter().collect();
        self.get_enveloped(path, &query, |errors| {
            Some(ModulesResponse {
                errors,
                ..Default::default()
            })
        })
        .await
    }
}

fn map_transport_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Request(format!("request timeout: {}", error))
    } else if error.is_connect() {
        ClientError::Request(format!("connection error: {}", error))
    } else {
        ClientError::Request(error.to_string())
    }
}

async fn read_text(response: reqwest::Response) -> Result<String, ClientError> {
    response
        .text()
        .await
        .map_err(|e| ClientError::Request(format!("reading response body: {}", e)))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Some endpoints answer a failed request with a bare error envelope
/// instead of the resource body.
fn parse_error_envelope(body: &str) -> Option<Vec<ItemError>> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .filter(|env| !env.errors.is_empty())
        .map(|env| env.errors)
}
