//! JSON-over-HTTP plumbing shared by the provider clients.

use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::config::llm_model_config::{LlmModelConfig, is_http_url};
use crate::error_handler::{AiLlmError, Provider, ProviderError, ProviderErrorKind, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 60;
/// Characters of an error body kept for logs and error messages.
const SNIPPET_CHARS: usize = 240;

/// A `reqwest::Client` bound to one provider base URL.
#[derive(Debug)]
pub(crate) struct JsonClient {
    http: reqwest::Client,
    provider: Provider,
    base: String,
    timeout: Duration,
}

impl JsonClient {
    /// Build a client for `cfg.endpoint` with the profile timeout
    /// (60s when unset) and `headers` sent on every request.
    pub(crate) fn new(provider: Provider, cfg: &LlmModelConfig, headers: HeaderMap) -> Result<Self> {
        let endpoint = cfg.endpoint.trim();
        if !is_http_url(endpoint) {
            return Err(ProviderError::new(
                provider,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        Ok(Self {
            http,
            provider,
            base: endpoint.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// `path` must start with `/`.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// POST `body` as JSON and decode a JSON answer.
    ///
    /// Non-2xx statuses become `HttpStatus` with the start of the body;
    /// undecodable answers become `Decode`.
    pub(crate) async fn post<Req, Resp>(&self, url: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let started = Instant::now();
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, self.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet: String = text.trim().chars().take(SNIPPET_CHARS).collect();
            error!(
                provider = ?self.provider,
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "llm backend returned an error status"
            );
            return Err(self.fail(ProviderErrorKind::HttpStatus {
                status,
                url: url.to_string(),
                snippet,
            }));
        }

        let out = resp.json::<Resp>().await.map_err(|e| {
            error!(provider = ?self.provider, %url, error = %e, "undecodable llm response");
            self.fail(ProviderErrorKind::Decode(e.to_string()))
        })?;

        debug!(
            provider = ?self.provider,
            %url,
            latency_ms = started.elapsed().as_millis(),
            "llm call completed"
        );
        Ok(out)
    }

    pub(crate) fn fail(&self, kind: ProviderErrorKind) -> AiLlmError {
        ProviderError::new(self.provider, kind).into()
    }
}
