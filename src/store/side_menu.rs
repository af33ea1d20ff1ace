//! Side menu badge state

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::client::SnsClient;
use crate::data::Account;
use crate::error::RequestError;

/// Unread markers shown next to the side menu entries
///
/// Shared behind `Arc` between the stores that need to refresh it.
pub struct SideMenu {
    client: Arc<dyn SnsClient>,
    unread_follow_requests: AtomicBool,
}

impl SideMenu {
    pub fn new(client: Arc<dyn SnsClient>) -> Self {
        Self {
            client,
            unread_follow_requests: AtomicBool::new(false),
        }
    }

    /// Whether any follow request is waiting
    pub fn unread_follow_requests(&self) -> bool {
        self.unread_follow_requests.load(Ordering::Acquire)
    }

    /// Re-fetch pending follow requests and update the badge
    ///
    /// The badge is untouched when the call fails.
    pub async fn fetch_follow_requests(&self) -> Result<Vec<Account>, RequestError> {
        let response = self.client.get_follow_requests().await.map_err(|error| {
            super::record_failure("side_menu_fetch_follow_requests", &error);
            error
        })?;

        let unread = !response.data.is_empty();
        self.unread_follow_requests.store(unread, Ordering::Release);
        tracing::debug!(
            count = response.data.len(),
            unread,
            "Side menu follow requests refreshed"
        );

        Ok(response.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockSnsClient;
    use crate::data::Response;
    use crate::store::fixtures::account;

    #[tokio::test]
    async fn badge_is_raised_when_requests_are_pending() {
        let mut client = MockSnsClient::new();
        client
            .expect_get_follow_requests()
            .times(1)
            .returning(|| Ok(Response::ok(vec![account("1", "h3poteto")])));

        let side_menu = SideMenu::new(Arc::new(client));
        let fetched = side_menu.fetch_follow_requests().await.unwrap();

        assert_eq!(fetched.len(), 1);
        assert!(side_menu.unread_follow_requests());
    }

    #[tokio::test]
    async fn badge_is_cleared_when_nothing_is_pending() {
        let mut client = MockSnsClient::new();
        let mut responses = vec![vec![], vec![account("1", "h3poteto")]];
        client
            .expect_get_follow_requests()
            .times(2)
            .returning(move || Ok(Response::ok(responses.pop().unwrap_or_default())));

        let side_menu = SideMenu::new(Arc::new(client));
        side_menu.fetch_follow_requests().await.unwrap();
        assert!(side_menu.unread_follow_requests());

        side_menu.fetch_follow_requests().await.unwrap();
        assert!(!side_menu.unread_follow_requests());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_badge() {
        let mut client = MockSnsClient::new();
        let mut calls = 0;
        client
            .expect_get_follow_requests()
            .times(2)
            .returning(move || {
                calls += 1;
                if calls == 1 {
                    Ok(Response::ok(vec![account("1", "h3poteto")]))
                } else {
                    Err(RequestError::Status {
                        status: 502,
                        status_text: "Bad Gateway".to_string(),
                    })
                }
            });

        let side_menu = SideMenu::new(Arc::new(client));
        side_menu.fetch_follow_requests().await.unwrap();

        let error = side_menu
            .fetch_follow_requests()
            .await
            .expect_err("second fetch fails");
        assert!(matches!(error, RequestError::Status { status: 502, .. }));
        assert!(side_menu.unread_follow_requests());
    }
}
