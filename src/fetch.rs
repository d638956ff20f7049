//! Page retrieval for the tracked blog posts. A curl subprocess is tried
//! first, with an in-process HTTP client presenting browser-like headers as
//! the fallback.

use std::process::Command;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, REFERER,
    USER_AGENT,
};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::extract::{extract_view_count, normalize_content};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

/// A way of turning a URL into page markup. Strategies are tried in order
/// until one succeeds.
pub trait FetchStrategy {
    fn name(&self) -> &'static str;

    fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Shells out to curl. Follows redirects, stays quiet, and asks for an
/// uncompressed body so the markup can be scanned directly.
pub struct CurlCommand {
    program: String,
}

impl CurlCommand {
    pub fn new() -> Self {
        Self::with_program("curl")
    }

    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }
}

impl Default for CurlCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchStrategy for CurlCommand {
    fn name(&self) -> &'static str {
        "curl"
    }

    fn fetch_page(&self, url: &str) -> Result<String> {
        let output = Command::new(&self.program)
            .args(["-Ls", "-H", "Accept-Encoding: identity"])
            .arg(url)
            .output()
            .with_context(|| format!("failed to launch {}", self.program))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        if output.stdout.is_empty() {
            bail!("{} produced no output for {url}", self.program);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// In-process HTTP client. The headers mirror what a desktop browser sends,
/// which keeps the blog platform from serving a stripped-down page.
pub struct HttpRequest {
    client: Client,
}

impl HttpRequest {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(
            REFERER,
            HeaderValue::from_static("https://blogs.mathworks.com/"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchStrategy for HttpRequest {
    fn name(&self) -> &'static str {
        "http"
    }

    fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("GET {url}"))?;
        let body = response.bytes().context("reading response body")?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Runs the configured strategies in order and extracts the view count from
/// whichever page comes back first.
pub struct Fetcher {
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(CurlCommand::new()),
            Box::new(HttpRequest::new()),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn FetchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Retrieve the page at `url` and pull the current view count out of it.
    pub fn fetch_views(&self, url: &str) -> Result<u64, FetchError> {
        let page = self.fetch_page(url)?;
        let content = normalize_content(&page);

        match extract_view_count(&content) {
            Some(views) => {
                debug!(
                    action = "extract",
                    component = "fetcher",
                    views,
                    url = url,
                    "Extracted view count"
                );
                Ok(views)
            }
            None => Err(FetchError::ViewCountMissing {
                url: url.to_string(),
            }),
        }
    }

    fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error: Option<anyhow::Error> = None;

        for strategy in &self.strategies {
            match strategy.fetch_page(url) {
                Ok(page) => {
                    debug!(
                        action = "fetch",
                        component = "fetcher",
                        strategy = strategy.name(),
                        bytes = page.len(),
                        url = url,
                        "Page retrieved"
                    );
                    return Ok(page);
                }
                Err(e) => {
                    warn!(
                        action = "fetch",
                        component = "fetcher",
                        strategy = strategy.name(),
                        url = url,
                        "Fetch failed: {e:#}"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(FetchError::Unreachable {
            url: url.to_string(),
            detail: last_error
                .map(|e| format!("{e:#}"))
                .unwrap_or_else(|| "no fetch strategies configured".to_string()),
        })
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}
