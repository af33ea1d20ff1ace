//! Server collaborator
//!
//! The stores never talk HTTP themselves. They receive an `SnsClient`
//! and call its follow request capabilities; `HttpClient` is the
//! implementation used outside of tests.

mod http;

pub use http::HttpClient;

use async_trait::async_trait;

use crate::data::{Account, Response};
use crate::error::RequestError;

/// Follow request capabilities of a Mastodon-compatible server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnsClient: Send + Sync {
    /// GET /api/v1/follow_requests
    async fn get_follow_requests(&self) -> Result<Response<Vec<Account>>, RequestError>;

    /// POST /api/v1/follow_requests/:id/authorize
    async fn accept_follow_request(&self, id: &str) -> Result<Response<()>, RequestError>;

    /// POST /api/v1/follow_requests/:id/reject
    async fn reject_follow_request(&self, id: &str) -> Result<Response<()>, RequestError>;
}
