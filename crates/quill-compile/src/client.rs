//! HTTP client for the compile service.

use std::time::Duration;

use crate::protocol::{CompileRequest, CompileResponse};
use crate::{CompileError, CompileResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response body of `GET /languages`.
#[derive(Debug, Default, serde::Deserialize)]
struct LanguagesResponse {
    #[serde(default)]
    languages: Vec<String>,
}

/// A client bound to one compile endpoint.
///
/// The health and language endpoints are siblings of the compile URL
/// (`…/compile` → `…/health`, `…/languages`). There is no cancellation:
/// dropping the future abandons the request and its eventual response.
#[derive(Debug, Clone)]
pub struct CompileClient {
    http: reqwest::Client,
    compile_url: String,
}

impl CompileClient {
    /// Creates a client for the given compile URL with the default request
    /// timeout.
    pub fn new(compile_url: impl Into<String>) -> CompileResult<Self> {
        Self::with_timeout(compile_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit request timeout.
    pub fn with_timeout(
        compile_url: impl Into<String>,
        timeout: Duration,
    ) -> CompileResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            compile_url: compile_url.into(),
        })
    }

    /// Returns the compile endpoint this client posts to.
    pub fn compile_url(&self) -> &str {
        &self.compile_url
    }

    /// Submits the buffer for compilation and execution.
    pub async fn compile(&self, request: &CompileRequest) -> CompileResult<CompileResponse> {
        tracing::debug!(
            url = %self.compile_url,
            language = %request.language,
            file = %request.file_name,
            bytes = request.code.len(),
            "sending compile request"
        );

        let response = self
            .http
            .post(&self.compile_url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "compile service error");
            return Err(CompileError::ServiceStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| {
            tracing::warn!(%source, "compile service returned unparseable body");
            CompileError::InvalidBody { source, body }
        })
    }

    /// Probes the service's health endpoint. Any failure reads as "down".
    pub async fn health(&self) -> bool {
        let url = self.sibling("health");
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                tracing::debug!(%url, %error, "health probe failed");
                false
            }
        }
    }

    /// Fetches the service's supported language tags. Failures yield an
    /// empty list rather than an error.
    pub async fn supported_languages(&self) -> Vec<String> {
        let url = self.sibling("languages");
        let result = async {
            let response = self.http.get(&url).send().await?;
            response.json::<LanguagesResponse>().await
        }
        .await;

        match result {
            Ok(parsed) => parsed.languages,
            Err(error) => {
                tracing::debug!(%url, %error, "language listing failed");
                Vec::new()
            }
        }
    }

    /// Derives a sibling endpoint URL from the compile URL.
    fn sibling(&self, endpoint: &str) -> String {
        self.compile_url
            .replace("/compile", &format!("/{endpoint}"))
    }
}
