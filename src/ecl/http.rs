//! HTTP utilities for Enterprise Cloud REST API calls

use super::error::{Error, Result};
use reqwest::{Client, Method};
use serde_json::Value;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const USER_AGENT: &str = concat!("ecl-provider/", env!("CARGO_PKG_VERSION"));

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Status codes treated as success when a call does not override them
pub fn default_ok_codes(method: &Method) -> &'static [u16] {
    match *method {
        Method::GET => &[200],
        Method::POST => &[201, 202],
        Method::PUT => &[201, 202],
        Method::PATCH => &[200, 202, 204],
        Method::DELETE => &[202, 204],
        Method::HEAD => &[204],
        _ => &[200],
    }
}

/// Per-call request shaping
#[derive(Debug, Clone, Default)]
pub struct RequestOpts {
    pub body: Option<Value>,
    /// Overrides [`default_ok_codes`] when set
    pub ok_codes: Option<Vec<u16>>,
    pub headers: Vec<(String, String)>,
}

impl RequestOpts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn ok_codes(mut self, codes: &[u16]) -> Self {
        self.ok_codes = Some(codes.to_vec());
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Raw response whose status was accepted by the allow-list
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
}

impl ApiResponse {
    /// Parse the body as JSON; an empty body reads as `null`
    pub fn json(&self) -> Result<Value> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// HTTP client wrapper for Enterprise Cloud API calls
#[derive(Clone)]
pub struct EclHttpClient {
    client: Client,
}

impl EclHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        Self::with_options(false)
    }

    /// Create a client, optionally accepting invalid TLS certificates
    pub fn with_options(insecure: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(insecure)
            .build()?;

        Ok(Self { client })
    }

    /// Issue one request and check the status against the allow-list
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        token: &str,
        opts: RequestOpts,
    ) -> Result<ApiResponse> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .header("X-Auth-Token", token)
            .header("Accept", "application/json");

        for (name, value) in &opts.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &opts.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let expected = opts
            .ok_codes
            .unwrap_or_else(|| default_ok_codes(&method).to_vec());

        if !expected.contains(&status) {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} {} - {}", method, status, sanitize_for_log(&body));
            return Err(Error::UnexpectedStatus {
                method: method.to_string(),
                url: url.to_string(),
                status,
                body,
                expected,
            });
        }

        Ok(ApiResponse {
            status,
            url: url.to_string(),
            body,
        })
    }
}

/// Format an API error for display
/// Security: Sanitizes error messages to avoid leaking sensitive API details
pub fn format_api_error(error: &Error) -> String {
    match error.status() {
        Some(401) => return "Authentication failed. Check OS_TOKEN or the configured token.".to_string(),
        Some(403) => return "Permission denied. Check the tenant's role assignments.".to_string(),
        Some(404) => return "Resource not found.".to_string(),
        Some(409) => {
            return "Resource conflict. The resource may already exist or be in use.".to_string()
        },
        Some(429) => return "Rate limit exceeded. Please try again later.".to_string(),
        Some(400) => return "Invalid request. Check your parameters.".to_string(),
        Some(500..=599) => {
            return "Service temporarily unavailable. Please try again.".to_string()
        },
        _ => {},
    }

    if let Error::Transport(_) = error {
        return "Request failed. Check your network connection and try again.".to_string();
    }

    // Truncate long error messages and remove potential sensitive data
    let error_str = error.to_string();
    let sanitized = error_str
        .chars()
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .take(80)
        .collect::<String>();

    if sanitized.len() < error_str.len() {
        format!("{}...", sanitized)
    } else {
        sanitized
    }
}
