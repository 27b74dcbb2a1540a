use super::client::HttpClient;
use crate::config::FETCH_TIMEOUT_SECS;
use async_trait::async_trait;
use std::time::Duration;

/// `reqwest` client for remote inputs, identified by crate name and version.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    /// Client with the default download timeout.
    pub fn new() -> reqwest::Result<Self> {
        Self::with_timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_without_network() {
        assert!(BasicClient::new().is_ok());
        assert!(BasicClient::with_timeout(Duration::from_millis(1)).is_ok());
    }
}
