use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes the GET requests for remote inputs. Tests substitute a client
/// that never touches the network.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
