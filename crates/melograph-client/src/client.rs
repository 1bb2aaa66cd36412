// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Method};
use tokio_util::io::ReaderStream;
use tracing::{debug, trace};
use url::Url;

use crate::envelope::{classify, Outcome, Payload};
use crate::error::{MelographError, Result};

const DEFAULT_API_HOST: &str = "https://developer.melograph.io";
const DEFAULT_API_VERSION: u32 = 4;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Pause taken before replaying a rate-limited request.
const RATE_LIMIT_PAUSE: Duration = Duration::from_secs(90);
const RESPONSE_FORMAT: &str = "json";
/// Injected by the client on every request; caller options cannot set them.
const RESERVED_PARAMS: [&str; 2] = ["api_key", "format"];
const USER_AGENT: &str = concat!("melograph-client/", env!("CARGO_PKG_VERSION"));

/// Melograph API client.
///
/// Holds the API key and the versioned base URI, both fixed at
/// construction. Every request carries the key and `format=json` as query
/// parameters; responses are parsed as envelopes and classified by their
/// application-level status code, never by the HTTP status line.
///
/// A rate-limited response (code 3) is replayed after a fixed pause, with
/// no attempt cap: the service lifts the limit eventually, and a caller
/// that needs a bound must impose its own deadline around the call.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    rate_limit_pause: Duration,
}

/// Immutable description of one outgoing request.
///
/// A rate-limited attempt is replayed from the same descriptor: same
/// method, URL, query, and headers, with the upload file re-opened so the
/// full body is resent.
#[derive(Debug, Clone)]
struct RequestDescriptor {
    method: Method,
    url: Url,
    headers: HeaderMap,
    upload: Option<PathBuf>,
}

impl Client {
    /// Create a client with default settings for the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Create a client builder for custom configuration.
    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(api_key.into())
    }

    /// Performs a GET against an endpoint path.
    ///
    /// `options` are encoded as flat query pairs alongside the injected
    /// credential and format parameters.
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> melograph_client::Result<()> {
    /// let client = melograph_client::Client::new("YOUR_API_KEY")?;
    /// let payload = client.get("genre/artists", &[("name", "jazz")]).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, path: &str, options: &[(&str, &str)]) -> Result<Payload> {
        let request = RequestDescriptor {
            method: Method::GET,
            url: self.build_url(path, options)?,
            headers: HeaderMap::new(),
            upload: None,
        };
        self.dispatch(request).await
    }

    /// Performs a POST against an endpoint path.
    ///
    /// `options` are encoded as query pairs exactly like [`Client::get`];
    /// the body is reserved for the optional upload. Caller headers are
    /// merged over a default `Content-Type: multipart/form-data`. When
    /// `upload` is set, the file's bytes are streamed as the request body
    /// with an explicit `Content-Length` header equal to its size on disk.
    pub async fn post(
        &self,
        path: &str,
        options: &[(&str, &str)],
        headers: HeaderMap,
        upload: Option<&Path>,
    ) -> Result<Payload> {
        let request = RequestDescriptor {
            method: Method::POST,
            url: self.build_url(path, options)?,
            headers: merge_post_headers(headers),
            upload: upload.map(Path::to_path_buf),
        };
        self.dispatch(request).await
    }

    fn build_url(&self, path: &str, options: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .map_err(|e| MelographError::InvalidResponse(e.to_string()))?;

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in options {
                if RESERVED_PARAMS.contains(key) {
                    continue;
                }
                pairs.append_pair(key, value);
            }
            pairs.append_pair("api_key", &self.api_key);
            pairs.append_pair("format", RESPONSE_FORMAT);
        }

        Ok(url)
    }

    /// Runs a descriptor through attempt/classify until it resolves.
    ///
    /// Known policy: the rate-limit replay is unbounded. Repeated code-3
    /// responses keep the call sleeping and replaying indefinitely.
    async fn dispatch(&self, request: RequestDescriptor) -> Result<Payload> {
        loop {
            let body = self.execute(&request).await?;
            match classify(&body)? {
                Outcome::Success(payload) => return Ok(payload),
                Outcome::RateLimited => {
                    debug!(
                        target: "melograph",
                        "rate limited on {} {}, replaying in {:?}",
                        request.method,
                        request.url.path(),
                        self.rate_limit_pause
                    );
                    tokio::time::sleep(self.rate_limit_pause).await;
                }
                Outcome::Fatal { code, raw } => {
                    debug!(
                        target: "melograph",
                        "error code {} on {}",
                        code,
                        request.url.path()
                    );
                    return Err(MelographError::Api { code, raw });
                }
            }
        }
    }

    /// Performs a single attempt and returns the raw body.
    ///
    /// The upload file handle, when present, is opened here and dropped
    /// when the attempt finishes, whether it succeeded or failed.
    async fn execute(&self, request: &RequestDescriptor) -> Result<String> {
        trace!(target: "melograph", "{} {}", request.method, request.url);

        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(path) = &request.upload {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|e| MelographError::Upload {
                    path: path.clone(),
                    source: e,
                })?;
            let size = file
                .metadata()
                .await
                .map_err(|e| MelographError::Upload {
                    path: path.clone(),
                    source: e,
                })?
                .len();
            builder = builder
                .header(CONTENT_LENGTH, size)
                .body(Body::wrap_stream(ReaderStream::new(file)));
        }

        let response = builder.send().await?;
        debug!(target: "melograph", "response status: {}", response.status());

        Ok(response.text().await?)
    }
}

/// Lays the caller's headers over the default POST content type.
fn merge_post_headers(extra: HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("multipart/form-data"));
    headers.extend(extra);
    headers
}

/// Builder for configuring a [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    api_key: String,
    base_url: Option<String>,
    version: u32,
    timeout: Duration,
    rate_limit_pause: Duration,
}

impl ClientBuilder {
    fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: None,
            version: DEFAULT_API_VERSION,
            timeout: DEFAULT_TIMEOUT,
            rate_limit_pause: RATE_LIMIT_PAUSE,
        }
    }

    /// Replace the whole versioned base URL (useful for testing with mock
    /// servers). Overrides [`ClientBuilder::version`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Select the API version used to derive the default base URL.
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set the socket-level request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the pause taken before replaying a rate-limited request.
    pub fn rate_limit_pause(mut self, pause: Duration) -> Self {
        self.rate_limit_pause = pause;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| format!("{}/api/v{}", DEFAULT_API_HOST, self.version))
            .trim_end_matches('/')
            .to_string();

        Ok(Client {
            http,
            api_key: self.api_key,
            base_url,
            rate_limit_pause: self.rate_limit_pause,
        })
    }
}
