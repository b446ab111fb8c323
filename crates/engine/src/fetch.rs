//! Response fetching.
//!
//! [`Fetcher`] is the seam between the step executor and the network; tests
//! substitute counting or canned implementations, production uses
//! [`HttpFetcher`]. One call is one GET request: no retries, no shared
//! connection pool.

use std::time::Duration;

use anyhow::anyhow;
use enrich_types::FetchError;
use reqwest::Client;
use tracing::debug;

use crate::runtime::block_on_future;

/// Fetch a response body for a URL.
///
/// Implementations must be safe to invoke concurrently from many threads.
pub trait Fetcher: Send + Sync {
    /// Retrieve the decoded response body for `url`.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP implementation of [`Fetcher`].
///
/// Every call builds its own client, issues a single GET with the optional
/// configured header, and classifies the response: statuses in `[200, 300)`
/// yield the body text, anything else is an [`FetchError::UnexpectedStatus`],
/// and transport failures surface as [`FetchError::Network`].
pub struct HttpFetcher {
    extra_header: Option<(String, String)>,
}

impl HttpFetcher {
    /// Create a fetcher, parsing at most one `"Name: Value"` header.
    ///
    /// Strings without a `:` separator (or with an empty name) attach no
    /// header and raise no error.
    pub fn new(extra_header: &str) -> Self {
        Self {
            extra_header: parse_extra_header(extra_header),
        }
    }

    /// The parsed header this fetcher attaches, if any.
    pub fn extra_header(&self) -> Option<(&str, &str)> {
        self.extra_header
            .as_ref()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request_url = url.to_string();
        let header = self.extra_header.clone();

        let outcome = block_on_future(async move {
            let client = Client::builder()
                .connect_timeout(Duration::from_secs(30))
                .timeout(Duration::from_secs(30))
                .build()
                .map_err(|error| anyhow!(error))?;

            let mut request = client.get(&request_url);
            if let Some((name, value)) = header {
                request = request.header(name, value);
            }

            let response = request.send().await.map_err(|error| anyhow!(error))?;
            let status = response.status().as_u16();
            if !(200..300).contains(&status) {
                return Ok((status, None));
            }
            let body = response.text().await.map_err(|error| anyhow!(error))?;
            Ok((status, Some(body)))
        });

        match outcome.map_err(|error| FetchError::network(error.to_string()))? {
            (status, Some(body)) => {
                debug!(%url, status, body_len = body.len(), "fetch completed");
                Ok(body)
            }
            (status, None) => {
                debug!(%url, status, "fetch rejected by status");
                Err(FetchError::unexpected_status(status))
            }
        }
    }
}

/// Parse a `"Name: Value"` header string at the first `:`.
///
/// Both sides are trimmed. Returns `None` for strings without a separator
/// or with an empty name; malformed input is ignored, never an error.
pub fn parse_extra_header(raw: &str) -> Option<(String, String)> {
    let (name, value) = raw.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::{HttpFetcher, parse_extra_header};

    #[test]
    fn parses_name_and_value_around_first_colon() {
        let header = parse_extra_header("Authorization: Basic ABC123==").expect("header should parse");
        assert_eq!(header.0, "Authorization");
        assert_eq!(header.1, "Basic ABC123==");
    }

    #[test]
    fn splits_only_on_the_first_colon() {
        let header = parse_extra_header("X-Forward: http://origin:8080").expect("header should parse");
        assert_eq!(header.0, "X-Forward");
        assert_eq!(header.1, "http://origin:8080");
    }

    #[test]
    fn trims_whitespace_on_both_sides() {
        let header = parse_extra_header("  Accept :  application/json  ").expect("header should parse");
        assert_eq!(header.0, "Accept");
        assert_eq!(header.1, "application/json");
    }

    #[test]
    fn ignores_strings_without_a_separator() {
        assert_eq!(parse_extra_header("not-a-header"), None);
        assert_eq!(parse_extra_header(""), None);
    }

    #[test]
    fn ignores_headers_with_an_empty_name() {
        assert_eq!(parse_extra_header(": value-only"), None);
    }

    #[test]
    fn fetcher_exposes_its_parsed_header() {
        let fetcher = HttpFetcher::new("Authorization: Basic ABC123==");
        assert_eq!(fetcher.extra_header(), Some(("Authorization", "Basic ABC123==")));

        let bare = HttpFetcher::new("no separator here");
        assert_eq!(bare.extra_header(), None);
    }
}
