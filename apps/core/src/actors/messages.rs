use crate::error::AppError;
use crate::models::{BatchItem, Category, ClassificationResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use uuid::Uuid;

/// Confidence reported when the service omits it.
pub const DEFAULT_REMOTE_CONFIDENCE: f64 = 0.8;
/// Reply reported when the service omits it.
pub const MISSING_RESPONSE_PLACEHOLDER: &str = "Resposta não disponível";
/// Processing time reported for every remote result. Fixed, not measured.
pub const REMOTE_PROCESSING_TIME: f64 = 1.5;

/// Why the remote path did not produce a usable result.
///
/// Every variant leads to the same local fallback; the distinction only matters for logs.
#[derive(Debug, Clone, thiserror::Error, Serialize, PartialEq)]
pub enum RemoteFailure {
    /// No service URL is configured.
    #[error("remote classification is not configured")]
    NotConfigured,
    /// Connection refused, DNS failure, TLS error, request build error...
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("service returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The body could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),
    /// No answer within the configured bound.
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

/// Body sent to the classification service. Exactly one shape per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemotePayload {
    /// `{"text": "..."}` as JSON.
    Text(String),
    /// Multipart form with the file under the `file` field.
    File {
        file_name: String,
        mime_type: String,
        data: Vec<u8>,
    },
}

impl RemotePayload {
    /// Short description for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RemotePayload::Text(_) => "text",
            RemotePayload::File { .. } => "file",
        }
    }
}

/// Success body of the classification service. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteResponse {
    pub category: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub suggested_response: Option<String>,
}

impl RemoteResponse {
    /// Translate into a result, applying the field defaults.
    ///
    /// An unknown category label or a confidence outside `[0, 1]` makes the whole
    /// response malformed.
    pub fn into_result(self) -> Result<ClassificationResult, RemoteFailure> {
        let category: Category = self
            .category
            .parse()
            .map_err(|e: AppError| RemoteFailure::Malformed(e.to_string()))?;

        let confidence = match self.confidence {
            None => DEFAULT_REMOTE_CONFIDENCE,
            Some(value) if value.is_finite() && (0.0..=1.0).contains(&value) => value,
            Some(value) => {
                return Err(RemoteFailure::Malformed(format!(
                    "confidence out of range: {}",
                    value
                )))
            }
        };

        let suggested_response = self
            .suggested_response
            .filter(|reply| !reply.trim().is_empty())
            .unwrap_or_else(|| MISSING_RESPONSE_PLACEHOLDER.to_string());

        Ok(ClassificationResult {
            category,
            confidence,
            suggested_response,
            processing_time: REMOTE_PROCESSING_TIME,
        })
    }
}

/// Outcome of the single remote attempt made for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    Success(RemoteResponse),
    Failure(RemoteFailure),
}

impl From<Result<RemoteResponse, RemoteFailure>> for RemoteOutcome {
    fn from(result: Result<RemoteResponse, RemoteFailure>) -> Self {
        match result {
            Ok(response) => RemoteOutcome::Success(response),
            Err(failure) => RemoteOutcome::Failure(failure),
        }
    }
}

/// Content of a request after resolution: the text scored by the local path
/// and the payload sent to the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContent {
    pub text: String,
    pub payload: RemotePayload,
}

/// Messages that can be sent to the classifier actor.
#[derive(Debug)]
pub enum ClassifierMessage {
    /// Classify one email whose content is already resolved.
    Classify {
        request_id: Uuid,
        content: ResolvedContent,
        /// When the caller submitted the request; processing time counts from here.
        received: Instant,
        /// A channel to send the result back.
        responder: oneshot::Sender<Result<ClassificationResult, AppError>>,
    },
    /// Classify several plain-text emails, one after the other.
    ClassifyBatch {
        texts: Vec<String>,
        responder: oneshot::Sender<Vec<BatchItem>>,
    },
    /// A command to stop the classifier actor.
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(category: &str, confidence: Option<f64>, reply: Option<&str>) -> RemoteResponse {
        RemoteResponse {
            category: category.to_string(),
            confidence,
            suggested_response: reply.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_applied() {
        let result = response("Produtivo", None, None).into_result().unwrap();
        assert_eq!(result.category, Category::Productive);
        assert_eq!(result.confidence, DEFAULT_REMOTE_CONFIDENCE);
        assert_eq!(result.suggested_response, MISSING_RESPONSE_PLACEHOLDER);
        assert_eq!(result.processing_time, REMOTE_PROCESSING_TIME);
    }

    #[test]
    fn test_remote_values_passed_through() {
        let result = response("Improdutivo", Some(0.42), Some("Valeu!"))
            .into_result()
            .unwrap();
        assert_eq!(result.category, Category::Unproductive);
        assert_eq!(result.confidence, 0.42);
        assert_eq!(result.suggested_response, "Valeu!");
    }

    #[test]
    fn test_blank_reply_gets_placeholder() {
        let result = response("Productive", Some(0.9), Some("  ")).into_result().unwrap();
        assert_eq!(result.suggested_response, MISSING_RESPONSE_PLACEHOLDER);
    }

    #[test]
    fn test_malformed_responses() {
        assert!(matches!(
            response("Neutro", None, None).into_result(),
            Err(RemoteFailure::Malformed(_))
        ));
        assert!(matches!(
            response("Produtivo", Some(1.7), None).into_result(),
            Err(RemoteFailure::Malformed(_))
        ));
        assert!(matches!(
            response("Produtivo", Some(f64::NAN), None).into_result(),
            Err(RemoteFailure::Malformed(_))
        ));
    }

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let body = r#"{"original_text":"x","category":"Produtivo","processing_time":0.2}"#;
        let parsed: RemoteResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.category, "Produtivo");
        assert!(parsed.confidence.is_none());
    }
}
