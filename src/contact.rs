use axum::http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

/// Forwards contact-form submissions to the spreadsheet form script
#[derive(Debug, Clone)]
pub struct ContactForwarder {
    client: Client,
    script_url: Option<String>,
}

/// Upstream status and body, relayed to the caller unchanged
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("contact forwarding is not configured")]
    NotConfigured,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid status code {0} from form script")]
    InvalidStatus(u16),
}

impl ContactForwarder {
    pub fn new(script_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            script_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.script_url.is_some()
    }

    /// POST the submission as a JSON string with a `text/plain` content type,
    /// which the form script accepts without a CORS preflight.
    #[instrument(skip_all)]
    pub async fn forward(&self, submission: &Value) -> Result<ForwardedResponse, ContactError> {
        let url = self.script_url.as_deref().ok_or(ContactError::NotConfigured)?;

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(submission.to_string())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body: Value = response.json().await?;
        debug!(status, "Form script responded");

        let status = StatusCode::from_u16(status).map_err(|_| ContactError::InvalidStatus(status))?;
        Ok(ForwardedResponse { status, body })
    }
}
