//! Minimal page fetcher with safe logging and a fixed identifying header.
//!
//! - One GET per call, no retries, per-request timeout
//! - Body decoded as UTF-8, invalid sequences replaced with U+FFFD
//! - Non-2xx responses surface as [`HttpError::Status`]
//! - Optional *raw* request/response logging via `PAGESUM_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), pagesum_http::HttpError> {
//! let client = pagesum_http::HttpClient::new("OpenDeepWikiBot/0.1 (+https://deepwiki.com)")?;
//! let html = client
//!     .get_text("https://example.com/", pagesum_http::FetchOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`) when `PAGESUM_HTTP_RAW=1`.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use std::env;
use std::time::Duration;
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "PAGESUM_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug.
fn make_curl(url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), "-XGET".to_string()];
    for (name, val) in headers.iter() {
        let v = val.to_str().unwrap_or("");
        parts.push(format!(
            "-H '{}: {}'",
            name.as_str(),
            v.replace('\'', r"'\''")
        ));
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned error {status}: {snippet}")]
    Status { status: StatusCode, snippet: String },
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs for the fetcher.
///
/// ```
/// use pagesum_http::FetchOpts;
/// use std::time::Duration;
///
/// let opts = FetchOpts {
///     timeout: Some(Duration::from_secs(30)),
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(FetchOpts::default().timeout.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct FetchOpts {
    /// Overrides [`HttpClient::default_timeout`] for this request.
    pub timeout: Option<Duration>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    user_agent: HeaderValue,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client that identifies itself with `user_agent`.
    ///
    /// ```no_run
    /// use pagesum_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("pagesum/0.1")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(20));
    /// assert_eq!(client.user_agent(), "pagesum/0.1");
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(user_agent: &str) -> Result<Self, HttpError> {
        let user_agent = HeaderValue::from_str(user_agent)
            .map_err(|e| HttpError::Build(format!("invalid User-Agent header: {e}")))?;
        let inner = Client::builder()
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            user_agent,
            default_timeout: Duration::from_secs(20),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use pagesum_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("pagesum/0.1")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.to_str().unwrap_or_default()
    }

    /// GET `url` and return the body as text.
    ///
    /// The timeout covers the whole exchange, body included. Redirects follow
    /// the transport default.
    pub async fn get_text(&self, url: &str, opts: FetchOpts) -> Result<String, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.user_agent.clone());

        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            method="GET",
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            timeout_ms=timeout.as_millis() as u64,
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&url, &headers);
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = std::time::Instant::now();
        let resp = self
            .inner
            .get(url.clone())
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| classify(&req_id, "send", timeout, err))?;

        let status = resp.status();
        let final_url = resp.url().clone();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| classify(&req_id, "body", timeout, err))?;
        let dur_ms = t0.elapsed().as_millis() as u64;
        let redirected = final_url != url;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            content_type=%content_type,
            redirected,
            "http.response.headers"
        );

        if raw_enabled() {
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                body=%text,
                truncated
            );
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(
            req_id=%req_id,
            body_snippet=%snippet,
            "http.response.body_snippet"
        );

        if !status.is_success() {
            tracing::warn!(
                req_id=%req_id,
                %status,
                body_snippet=%snippet,
                "http.error"
            );
            return Err(HttpError::Status { status, snippet });
        }

        Ok(decode_body(&bytes))
    }
}

// ==============================
// Helpers
// ==============================

fn classify(
    req_id: &str,
    phase: &'static str,
    timeout: Duration,
    err: reqwest::Error,
) -> HttpError {
    let message = err.to_string();
    tracing::warn!(
        req_id=%req_id,
        phase,
        timeout=err.is_timeout(),
        message=%message,
        "http.network_error"
    );
    if err.is_timeout() {
        HttpError::Timeout(timeout)
    } else if err.is_builder() {
        HttpError::Build(message)
    } else {
        HttpError::Network(message)
    }
}

/// UTF-8 decode, replacing invalid sequences rather than failing.
pub fn decode_body(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        let mut cut = 500;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
