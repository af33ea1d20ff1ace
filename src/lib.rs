//! ResortDesk - follow request management for a Mastodon/Pleroma desktop client
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Timeline Space                           │
//! │  - One signed-in account                                    │
//! │  - Owns the stores shown by the client                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Store Layer                            │
//! │  - Follow request list (refresh / accept / reject)          │
//! │  - Side menu unread badge                                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Client Layer                            │
//! │  - SnsClient trait (injected)                               │
//! │  - reqwest implementation for the Mastodon REST API         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `client`: Server collaborator trait and HTTP implementation
//! - `store`: Follow request list and side menu state
//! - `data`: Mastodon API entities
//! - `config`: Configuration management
//! - `error`: Error types
//! - `metrics`: Prometheus instruments

pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod store;

use std::sync::Arc;

/// State of one signed-in account
///
/// Wires the server client into the stores that depend on it.
pub struct TimelineSpace {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Server collaborator shared by all stores
    pub client: Arc<dyn client::SnsClient>,

    /// Side menu badges
    pub side_menu: Arc<store::SideMenu>,

    /// Pending follow requests
    pub follow_requests: store::FollowRequests,
}

impl TimelineSpace {
    /// Initialize the timeline space with the HTTP client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built from configuration
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        let http_client = client::HttpClient::new(&config.account, &config.http)?;
        tracing::info!(
            base_url = %config.account.base_url,
            proxy = config.http.proxy.is_some(),
            "HTTP client initialized"
        );

        Ok(Self::with_client(config, Arc::new(http_client)))
    }

    /// Initialize the timeline space with an injected client
    pub fn with_client(config: config::AppConfig, client: Arc<dyn client::SnsClient>) -> Self {
        let side_menu = Arc::new(store::SideMenu::new(client.clone()));
        let follow_requests =
            store::FollowRequests::new(client.clone()).with_side_menu(side_menu.clone());

        Self {
            config: Arc::new(config),
            client,
            side_menu,
            follow_requests,
        }
    }

    /// Accept the pending request of the account with `id`
    ///
    /// Refreshes the list first so the store holds the server's view.
    ///
    /// # Errors
    /// Returns `AppError::Validation` if no pending request has this id
    pub async fn accept_follow_request(&mut self, id: &str) -> error::Result<data::Account> {
        let account = self.find_follow_request(id).await?;
        self.follow_requests.accept(&account).await?;
        Ok(account)
    }

    /// Reject the pending request of the account with `id`
    ///
    /// # Errors
    /// Returns `AppError::Validation` if no pending request has this id
    pub async fn reject_follow_request(&mut self, id: &str) -> error::Result<data::Account> {
        let account = self.find_follow_request(id).await?;
        self.follow_requests.reject(&account).await?;
        Ok(account)
    }

    async fn find_follow_request(&mut self, id: &str) -> error::Result<data::Account> {
        self.follow_requests
            .refresh()
            .await?
            .iter()
            .find(|account| account.id == id)
            .cloned()
            .ok_or_else(|| {
                error::AppError::Validation(format!("no pending follow request from {id}"))
            })
    }
}
