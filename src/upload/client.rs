//! UploadClient - posts captured stills to the upload endpoint.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Url;
use thiserror::Error;

use crate::snapshot::Payload;

/// Endpoint used when neither config, environment nor CLI name one.
pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:5001/images/upload";

/// Environment variable that overrides the configured endpoint.
pub const UPLOAD_URL_ENV: &str = "SNAPCAP_UPLOAD_URL";

/// Multipart field carrying the JPEG bytes.
pub const IMAGE_FIELD: &str = "image";

/// Multipart field carrying the caption text.
pub const CAPTION_FIELD: &str = "caption";

/// File name attached to the image part.
pub const IMAGE_FILE_NAME: &str = "capture.jpg";

const IMAGE_MIME: &str = "image/jpeg";

/// Errors that can occur while building or sending an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid upload endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("no image to upload")]
    EmptyPayload,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Parse and check an endpoint URL. Only `http` and `https` are accepted.
pub fn parse_endpoint(url: &str) -> Result<Url, UploadError> {
    let parsed = Url::parse(url).map_err(|e| UploadError::InvalidEndpoint {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(UploadError::InvalidEndpoint {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// One outgoing submission: the payload of the latest capture and its caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub payload: Payload,
    /// Always sent, even when empty.
    pub caption: String,
}

impl UploadRequest {
    pub fn new(payload: Payload, caption: impl Into<String>) -> Self {
        Self {
            payload,
            caption: caption.into(),
        }
    }

    /// Build the `multipart/form-data` body.
    fn into_form(self) -> Result<Form, UploadError> {
        if self.payload.is_empty() {
            return Err(UploadError::EmptyPayload);
        }

        let image = Part::bytes(self.payload.into_bytes())
            .file_name(IMAGE_FILE_NAME)
            .mime_str(IMAGE_MIME)?;

        Ok(Form::new()
            .part(IMAGE_FIELD, image)
            .text(CAPTION_FIELD, self.caption))
    }
}

/// What the endpoint answered. Only used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub status: u16,
    pub body: String,
}

/// Client for the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadClient {
    endpoint: Url,
    http_client: reqwest::Client,
}

impl UploadClient {
    /// Create a client for `endpoint` with no request timeout.
    pub fn new(endpoint: &str) -> Result<Self, UploadError> {
        Self::with_timeout(endpoint, None)
    }

    /// Create a client, optionally bounding each request by `timeout`.
    pub fn with_timeout(endpoint: &str, timeout: Option<Duration>) -> Result<Self, UploadError> {
        let endpoint = parse_endpoint(endpoint)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint,
            http_client: builder.build()?,
        })
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Send one upload.
    ///
    /// Makes exactly one POST; there is no retry. No authentication header
    /// is attached.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::EmptyPayload` before any network action if the
    /// payload is empty, `UploadError::Rejected` for a non-2xx answer, or
    /// `UploadError::Http` if the request could not be completed.
    pub async fn submit(&self, request: UploadRequest) -> Result<UploadReceipt, UploadError> {
        let form = request.into_form()?;

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(UploadReceipt {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_default_endpoint() {
        let client = UploadClient::new(DEFAULT_UPLOAD_URL).unwrap();
        assert_eq!(client.endpoint(), DEFAULT_UPLOAD_URL);
    }

    #[test]
    fn test_parse_endpoint_rejects_garbage() {
        assert!(matches!(
            parse_endpoint("not a url"),
            Err(UploadError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_parse_endpoint_rejects_other_schemes() {
        match parse_endpoint("ftp://example.com/upload") {
            Err(UploadError::InvalidEndpoint { reason, .. }) => {
                assert!(reason.contains("ftp"));
            }
            other => panic!("Expected InvalidEndpoint, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_payload_has_no_form() {
        let request = UploadRequest::new(Payload::default(), "");
        assert!(matches!(request.into_form(), Err(UploadError::EmptyPayload)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(UploadError::EmptyPayload.to_string(), "no image to upload");
        assert_eq!(
            UploadError::Rejected {
                status: 500,
                body: "boom".to_string()
            }
            .to_string(),
            "upload rejected with status 500: boom"
        );
    }
}
