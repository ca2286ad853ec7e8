//! Page retrieval.
//!
//! [`PageFetcher`] is the seam between the engine and the network. The
//! production implementation, [`HttpFetcher`], makes a single request per
//! page and presents itself as desktop Chrome: the full navigation header
//! set (client hints, `Sec-Fetch-*`), compressed transfer encodings and
//! HTTP/2 over TLS when the server offers it. The court sites reject
//! requests that look like a library client.

use crate::error::FetchError;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue, PRAGMA,
    UPGRADE_INSECURE_REQUESTS,
};
use std::time::Duration;
use tracing::{info, instrument};

/// Desktop Chrome user agent presented to the court sites.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Client hints sent by the same Chrome release as [`BROWSER_USER_AGENT`].
const SEC_CH_UA: &str = r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#;

/// Fetch the raw content of a page.
///
/// Implementations make exactly one attempt; retrying is left to the next
/// scheduled run.
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        // gzip/brotli/deflate/zstd features make reqwest advertise and decode
        // the same encodings Chrome does; rustls offers h2 via ALPN.
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(browser_headers())
            .redirect(reqwest::redirect::Policy::limited(5))
            .cookie_store(true)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let mut set = |name: HeaderName, value: &'static str| {
        headers.insert(name, HeaderValue::from_static(value));
    };

    set(HeaderName::from_static("sec-ch-ua"), SEC_CH_UA);
    set(HeaderName::from_static("sec-ch-ua-mobile"), "?0");
    set(HeaderName::from_static("sec-ch-ua-platform"), "\"Windows\"");
    set(UPGRADE_INSECURE_REQUESTS, "1");
    set(
        ACCEPT,
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,\
         image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
    );
    set(HeaderName::from_static("sec-fetch-site"), "none");
    set(HeaderName::from_static("sec-fetch-mode"), "navigate");
    set(HeaderName::from_static("sec-fetch-user"), "?1");
    set(HeaderName::from_static("sec-fetch-dest"), "document");
    set(ACCEPT_LANGUAGE, "en-US,en;q=0.9");
    set(CACHE_CONTROL, "no-cache");
    set(PRAGMA, "no-cache");
    headers
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        info!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_headers() {
        let headers = browser_headers();
        assert!(headers.get(ACCEPT).unwrap().to_str().unwrap().starts_with("text/html"));
        assert_eq!(headers.get(UPGRADE_INSECURE_REQUESTS).unwrap(), "1");
        assert_eq!(headers.get("sec-fetch-mode").unwrap(), "navigate");
        assert_eq!(headers.get("sec-fetch-dest").unwrap(), "document");
        assert_eq!(headers.get("sec-ch-ua-platform").unwrap(), "\"Windows\"");
    }

    #[test]
    fn test_client_hints_match_user_agent() {
        let headers = browser_headers();
        let hints = headers.get("sec-ch-ua").unwrap().to_str().unwrap();
        assert!(hints.contains(r#""Google Chrome";v="120""#));
        assert!(BROWSER_USER_AGENT.contains("Chrome/120.0.0.0"));
        assert!(!BROWSER_USER_AGENT.contains("  "));
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new(Duration::from_secs(30)).is_ok());
    }
}
