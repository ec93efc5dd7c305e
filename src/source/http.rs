//! HTTP client for fetching tables from a static file server.

use super::DataSource;
use crate::utils::config::DEFAULT_HTTP_TIMEOUT;
use crate::utils::error::SourceError;
use log::{debug, info};
use reqwest::blocking::Client;

/// Fetches tables relative to a base URL
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    /// Create a new HTTP source
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(SourceError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url_for(&self, location: &str) -> String {
        join_url(&self.base_url, location)
    }
}

impl DataSource for HttpSource {
    fn fetch(&self, location: &str) -> Result<String, SourceError> {
        let url = self.url_for(location);
        info!("Fetching table: {}", url);

        let response = self.client.get(&url).send().map_err(SourceError::Http)?;

        // Check HTTP status
        if !response.status().is_success() {
            return Err(SourceError::Status {
                location: url,
                status: response.status().as_u16(),
            });
        }

        let text = response.text().map_err(SourceError::Http)?;
        debug!("Fetched {} bytes from {}", text.len(), url);
        Ok(text)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Join a base URL and a relative location with exactly one slash
fn join_url(base: &str, location: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        location.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:3000/data/", "/event_log.csv"),
            "http://localhost:3000/data/event_log.csv"
        );
        assert_eq!(
            join_url("http://localhost:3000/data", "event_log.csv"),
            "http://localhost:3000/data/event_log.csv"
        );
    }
}
