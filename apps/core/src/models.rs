use crate::error::AppError;
use crate::text_extract;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Business category assigned to an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Requires action or a reply.
    #[serde(alias = "Produtivo")]
    Productive,
    /// Social or courtesy message, no action needed.
    #[serde(alias = "Improdutivo")]
    Unproductive,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Productive, Category::Unproductive];

    /// Returns a human-readable label for the category
    pub fn label(&self) -> &'static str {
        match self {
            Category::Productive => "Productive",
            Category::Unproductive => "Unproductive",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = AppError;

    /// Accepts the Portuguese labels used by the classification service as well as
    /// the English ones. The negative forms contain the positive ones as substrings,
    /// so they are checked first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        if label.contains("improdutivo") || label.contains("unproductive") {
            Ok(Category::Unproductive)
        } else if label.contains("produtivo") || label.contains("productive") {
            Ok(Category::Productive)
        } else {
            Err(AppError::Validation(format!("Unknown category label: {:?}", s)))
        }
    }
}

/// A file supplied with a classification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// The original name of the file.
    pub file_name: String,
    /// Raw file content, forwarded as-is to the classification service.
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }

    /// Best-effort MIME type, sniffed from the content first and the extension second.
    pub fn mime_type(&self) -> &'static str {
        text_extract::detect_mime(&self.file_name, &self.data)
    }

    /// Extracts the plain text of the attachment, if the format is supported.
    pub fn extract_text(&self) -> Result<String, AppError> {
        text_extract::extract_text_from_file(&self.file_name, &self.data)
    }
}

/// One classification submission. Transient, request-scoped.
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    /// Correlation id used in logs.
    pub id: Uuid,
    /// Raw email body.
    pub text: Option<String>,
    /// Uploaded file, preferred over `text` when it yields content.
    pub attachment: Option<Attachment>,
}

impl ClassificationRequest {
    pub fn new(text: Option<String>, attachment: Option<Attachment>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            attachment,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Some(text.into()), None)
    }

    pub fn from_attachment(attachment: Attachment) -> Self {
        Self::new(None, Some(attachment))
    }

    /// A request carrying neither text nor a file.
    pub fn empty() -> Self {
        Self::new(None, None)
    }
}

/// Outcome of a successful classification, whichever path produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    /// Bounded certainty indicator. Not a calibrated probability.
    pub confidence: f64,
    /// Draft reply, never empty.
    pub suggested_response: String,
    /// Seconds spent producing the result.
    pub processing_time: f64,
}

/// Per-item outcome of a batch run. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ClassificationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
