//! Minimal JSON HTTP client with safe logging and OAuth 1.0a support.
//!
//! - Request options: headers, [`Auth`], query params, timeout
//! - Query strings are RFC 3986 encoded so OAuth signatures cover the exact bytes sent
//! - Redacts sensitive query params and never logs secret values
//! - Optional *raw* request/response logging via `BEFRIEND_HTTP_RAW=1`
//! - No retries: a failed call is reported to the caller as-is
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), befriend_http::HttpError> {
//! let client = befriend_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", befriend_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start, response
//! headers (including Twitter's `x-rate-limit-*`), body snippets (truncated) and final
//! errors. Raw lines use the `http.raw` target.

pub mod oauth;

pub use oauth::{OAuth1Credentials, OAuth1Signer, percent_encode};
pub use reqwest::StatusCode;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::env;
use std::time::Duration;
use thiserror::Error;

const RAW_ENV: &str = "BEFRIEND_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn is_secret_key(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "access_token"
            | "authorization"
            | "auth"
            | "key"
            | "api_key"
            | "token"
            | "secret"
            | "client_secret"
            | "bearer"
            | "oauth_token"
    )
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if k == AUTHORIZATION || key.eq_ignore_ascii_case("set-cookie") {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
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
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}{}: {message}, request_id={request_id}", .code.map(|c| format!(" (code {c})")).unwrap_or_default())]
    Api {
        status: StatusCode,
        /// Provider-specific error code from the body, when present.
        code: Option<i64>,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn api_code(&self) -> Option<i64> {
        match self {
            HttpError::Api { code, .. } => *code,
            _ => None,
        }
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the client.
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: OAuth ... signed over method, URL and query.
    OAuth1(&'a OAuth1Signer),
    None,
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Auth::OAuth1(_) => "oauth1",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs.
///
/// ```
/// use befriend_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     query: Some(vec![("q", "rustlang".into())]),
///     ..Default::default()
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(opts.auth.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use befriend_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("befriend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the default per-request timeout.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET JSON with per-request options.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json(Method::GET, path, opts).await
    }

    /// POST with parameters in the query string and a JSON response.
    pub async fn post_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, opts).await
    }

    async fn request_json<T>(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))?;

        let params: Vec<(&str, &str)> = opts
            .query
            .as_ref()
            .map(|q| q.iter().map(|(k, v)| (*k, v.as_ref())).collect())
            .unwrap_or_default();

        url.set_query(None);
        if !params.is_empty() {
            let encoded = params
                .iter()
                .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&encoded));
        }

        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let mut rb = self.inner.request(method.clone(), url.clone()).timeout(timeout);

        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        match &opts.auth {
            Some(Auth::OAuth1(signer)) => {
                let mut signed_url = url.clone();
                signed_url.set_query(None);
                signed_url.set_fragment(None);
                let header = signer.sign(method.as_str(), signed_url.as_str(), &params)?;
                let value = HeaderValue::from_str(&header)
                    .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
                rb = rb.header(AUTHORIZATION, value);
            }
            Some(Auth::None) | None => {}
        }

        let redacted_q: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (*k, if is_secret_key(k) { "<redacted>" } else { *v }))
            .collect();
        let req_id = uuid::Uuid::new_v4().simple().to_string();
        let auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none");

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            query=?redacted_q,
            timeout_ms=timeout.as_millis() as u64,
            auth_kind,
            "http.request.start"
        );

        if raw_enabled() {
            let hdrs = opts.headers.as_ref().map(redact_headers).unwrap_or_default();
            tracing::debug!(
                target: "http.raw",
                %req_id,
                method=%method,
                path=%url.path(),
                query=?redacted_q,
                headers=?hdrs,
                "request"
            );
        }

        let t0 = std::time::Instant::now();
        let resp = rb.send().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.send");
            HttpError::Network(err.to_string())
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.body");
            HttpError::Network(err.to_string())
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        let req_hdr_id = headers
            .get("x-request-id")
            .or_else(|| headers.get("x-transaction-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            x_request_id=%req_hdr_id,
            rate_limit.limit=?header_str(&headers, "x-rate-limit-limit"),
            rate_limit.remaining=?header_str(&headers, "x-rate-limit-remaining"),
            rate_limit.reset=?header_str(&headers, "x-rate-limit-reset"),
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&headers);
            let truncated = bytes.len() > RAW_MAX_BODY;
            let text = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(
                target: "http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(req_id=%req_id, body_snippet=%snippet, "http.response.body_snippet");

        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    req_id=%req_id,
                    serde_line=%e.line(),
                    serde_col=%e.column(),
                    serde_err=%e,
                    body_snippet=%snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let (code, message) = extract_error(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            ?code,
            message=%message,
            x_request_id=%req_hdr_id,
            body_snippet=%snippet,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            code,
            message,
            request_id: req_hdr_id.to_string(),
        })
    }
}

// ==============================
// Helpers
// ==============================

/// Pull `(code, message)` out of an error body.
///
/// Understands Twitter's `{"errors":[{"code":88,"message":"..."}]}`, v2 style
/// `{"title":..,"detail":..}`, and a bare `{"error":".."}`. Falls back to a body snippet.
fn extract_error(body: &[u8]) -> (Option<i64>, String) {
    #[derive(Deserialize)]
    struct TwErrors {
        errors: Vec<TwErr>,
    }
    #[derive(Deserialize)]
    struct TwErr {
        #[serde(default)]
        code: Option<i64>,
        #[serde(default)]
        message: String,
    }

    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(tw) = serde_json::from_slice::<TwErrors>(body) {
        if let Some(first) = tw.errors.into_iter().next() {
            if !first.message.is_empty() || first.code.is_some() {
                return (first.code, first.message);
            }
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        let text = [m.message, m.detail, m.title, m.error]
            .into_iter()
            .find(|s| !s.is_empty());
        if let Some(text) = text {
            return (None, text);
        }
    }
    (None, snip_body(body))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}
