use crate::actors::messages::{RemoteFailure, RemoteOutcome, RemotePayload, RemoteResponse};
use crate::actors::traits::RemoteClassifier;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

// --- Constants ---
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(15);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const CLASSIFY_ENDPOINT: &str = "classify";
const HEALTH_ENDPOINT: &str = "health";

/// HTTP client for the remote classification service.
///
/// Without a base URL the client is disabled and every call reports
/// [`RemoteFailure::NotConfigured`], which routes all traffic to the local path.
#[derive(Clone)]
pub struct HttpRemoteClassifier {
    client: Client,
    server_url: Option<String>,
    timeout: Duration,
}

impl HttpRemoteClassifier {
    /// Creates a client for the service rooted at `base_url` (e.g. `http://localhost:5000/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let parsed = Url::parse(base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "Unsupported scheme for classification service: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            server_url: Some(parsed.as_str().trim_end_matches('/').to_string()),
            timeout,
        })
    }

    /// A client that never calls out.
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            server_url: None,
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.server_url.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, path: &str) -> Result<String, RemoteFailure> {
        self.server_url
            .as_ref()
            .map(|base| format!("{}/{}", base, path))
            .ok_or(RemoteFailure::NotConfigured)
    }

    fn build_request(
        &self,
        url: &str,
        payload: &RemotePayload,
    ) -> Result<reqwest::RequestBuilder, RemoteFailure> {
        let request = self.client.post(url);

        match payload {
            RemotePayload::Text(text) => Ok(request.json(&serde_json::json!({ "text": text }))),
            RemotePayload::File {
                file_name,
                mime_type,
                data,
            } => {
                let part = Part::bytes(data.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime_type)
                    .map_err(|e| RemoteFailure::Transport(e.to_string()))?;
                Ok(request.multipart(Form::new().part("file", part)))
            }
        }
    }

    async fn send(&self, payload: &RemotePayload) -> Result<RemoteResponse, RemoteFailure> {
        let url = self.endpoint(CLASSIFY_ENDPOINT)?;
        debug!(url = %url, kind = payload.kind(), "Submitting to classification service");

        let res = self
            .build_request(&url, payload)?
            .send()
            .await
            .map_err(|e| self.classify_reqwest_error(e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| self.classify_reqwest_error(e))?;

        if !status.is_success() {
            return Err(RemoteFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<RemoteResponse>(&body)
            .map_err(|e| RemoteFailure::Malformed(e.to_string()))
    }

    fn classify_reqwest_error(&self, err: reqwest::Error) -> RemoteFailure {
        if err.is_timeout() {
            RemoteFailure::Timeout(self.timeout)
        } else if err.is_decode() {
            RemoteFailure::Malformed(err.to_string())
        } else {
            RemoteFailure::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl RemoteClassifier for HttpRemoteClassifier {
    #[instrument(skip(self, payload), fields(kind = payload.kind()))]
    async fn classify_remote(&self, payload: &RemotePayload) -> RemoteOutcome {
        self.send(payload).await.into()
    }

    async fn health_check(&self) -> Result<(), RemoteFailure> {
        let url = self.endpoint(HEALTH_ENDPOINT)?;

        let res = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT.min(self.timeout))
            .send()
            .await
            .map_err(|e| self.classify_reqwest_error(e))?;

        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteFailure::Status {
                status: status.as_u16(),
                body: res.text().await.unwrap_or_default(),
            })
        }
    }
}
