//! Follow request list store
//!
//! Holds the pending follow requests of the signed-in account in display
//! order. Every operation awaits exactly one server call and only then
//! mutates the list, so a failed call never leaves partial state behind.

use std::sync::Arc;

use prometheus::IntGauge;

use super::SideMenu;
use crate::client::SnsClient;
use crate::data::Account;
use crate::error::RequestError;

#[derive(Debug, Clone, Copy)]
enum Resolution {
    Accept,
    Reject,
}

impl Resolution {
    fn operation(self) -> &'static str {
        match self {
            Resolution::Accept => "accept_follow_request",
            Resolution::Reject => "reject_follow_request",
        }
    }
}

/// Pending follow requests
///
/// Operations take `&mut self`; callers serialize access to one store.
pub struct FollowRequests {
    client: Arc<dyn SnsClient>,
    requests: Vec<Account>,
    side_menu: Option<Arc<SideMenu>>,
    /// Mirrors `requests.len()`
    pending_gauge: IntGauge,
}

impl FollowRequests {
    /// Create an empty store
    pub fn new(client: Arc<dyn SnsClient>) -> Self {
        Self::with_requests(client, Vec::new())
    }

    /// Create a store seeded with known requests
    pub fn with_requests(client: Arc<dyn SnsClient>, requests: Vec<Account>) -> Self {
        let pending_gauge = crate::metrics::FOLLOW_REQUESTS_PENDING.clone();
        pending_gauge.set(requests.len() as i64);

        Self {
            client,
            requests,
            side_menu: None,
            pending_gauge,
        }
    }

    /// Refresh this side menu's badge after every accept or reject
    pub fn with_side_menu(mut self, side_menu: Arc<SideMenu>) -> Self {
        self.side_menu = Some(side_menu);
        self
    }

    /// Current requests in display order
    pub fn requests(&self) -> &[Account] {
        &self.requests
    }

    /// Replace the list with the requests currently pending on the server
    ///
    /// # Errors
    /// Returns `RequestError` if the server call fails; the list is kept
    pub async fn refresh(&mut self) -> Result<&[Account], RequestError> {
        let response = self.client.get_follow_requests().await.map_err(|error| {
            super::record_failure("fetch_follow_requests", &error);
            error
        })?;

        self.requests = response.data;
        self.update_pending_gauge();
        tracing::debug!(count = self.requests.len(), "Follow requests refreshed");

        Ok(&self.requests)
    }

    /// Approve `account`'s request and drop it from the list
    ///
    /// Accepting an account that is not in the list only performs the
    /// server call.
    pub async fn accept(&mut self, account: &Account) -> Result<(), RequestError> {
        self.resolve(account, Resolution::Accept).await
    }

    /// Deny `account`'s request and drop it from the list
    pub async fn reject(&mut self, account: &Account) -> Result<(), RequestError> {
        self.resolve(account, Resolution::Reject).await
    }

    async fn resolve(
        &mut self,
        account: &Account,
        resolution: Resolution,
    ) -> Result<(), RequestError> {
        let result = match resolution {
            Resolution::Accept => self.client.accept_follow_request(&account.id).await,
            Resolution::Reject => self.client.reject_follow_request(&account.id).await,
        };
        if let Err(error) = result {
            super::record_failure(resolution.operation(), &error);
            tracing::warn!(
                account_id = %account.id,
                %error,
                "Failed to {}",
                resolution.operation().replace('_', " ")
            );
            return Err(error);
        }

        if let Some(index) = self.requests.iter().position(|request| request == account) {
            self.requests.remove(index);
            self.update_pending_gauge();
        }

        tracing::info!(
            account_id = %account.id,
            acct = %account.acct,
            resolution = ?resolution,
            remaining = self.requests.len(),
            "Follow request resolved"
        );

        self.refresh_side_menu().await;
        Ok(())
    }

    /// Best effort: the resolution already succeeded on the server
    async fn refresh_side_menu(&self) {
        let Some(side_menu) = &self.side_menu else {
            return;
        };

        if let Err(error) = side_menu.fetch_follow_requests().await {
            tracing::warn!(%error, "Failed to refresh side menu follow requests");
        }
    }

    fn update_pending_gauge(&self) {
        self.pending_gauge.set(self.requests.len() as i64);
    }
}
