use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::debug;

use crate::corpus::error::CorpusError;
use crate::corpus::ParagraphSource;

/// Pulls paragraphs from a chunk server over HTTP GET.
///
/// The server answers with the raw chunk text; `404 Not Found` and
/// `410 Gone` mean the server's corpus is exhausted.
pub struct RemoteSource {
    client: Client,
    url: String,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>) -> Result<Self, CorpusError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CorpusError::Remote(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ParagraphSource for RemoteSource {
    fn next_paragraph(&mut self) -> Result<String, CorpusError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| CorpusError::Remote(e.to_string()))?;

        let status = response.status();
        debug!(url = %self.url, %status, "fetched paragraph");
        match status {
            s if s.is_success() => response
                .text()
                .map_err(|e| CorpusError::Remote(e.to_string())),
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(CorpusError::Exhausted),
            s => Err(CorpusError::Remote(format!("{} returned {s}", self.url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_server_is_remote_error() {
        // The .invalid TLD never resolves.
        let mut source = RemoteSource::new("http://paragraphs.invalid/paragraph").unwrap();
        let err = source.next_paragraph().unwrap_err();
        assert!(matches!(err, CorpusError::Remote(_)));
    }
}
