//! Data models
//!
//! Mastodon API entities as received by the client, plus the response
//! wrapper every collaborator call returns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Account
// =============================================================================

/// Remote account (Mastodon API compatible)
///
/// The stores treat it as an opaque value and compare it by equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    /// `user` for local accounts, `user@domain` for remote ones
    pub acct: String,
    pub display_name: String,
    pub locked: bool,
    /// Kept as sent by the server; Pleroma omits the offset
    pub created_at: String,
    pub followers_count: u32,
    pub following_count: u32,
    pub statuses_count: u32,
    pub note: String,
    pub url: String,
    pub avatar: String,
    pub avatar_static: String,
    pub header: String,
    pub header_static: String,
    #[serde(default)]
    pub emojis: Vec<Emoji>,
    #[serde(default)]
    pub moved: Option<Box<Account>>,
    #[serde(default)]
    pub fields: Option<Vec<Field>>,
    #[serde(default)]
    pub bot: Option<bool>,
}

/// Custom emoji
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    pub shortcode: String,
    pub static_url: String,
    pub url: String,
    pub visible_in_picker: bool,
}

/// Profile metadata field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub verified_at: Option<String>,
}

// =============================================================================
// Response wrapper
// =============================================================================

/// Result of a collaborator call
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub data: T,
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
}

impl<T> Response<T> {
    /// Successful response with no headers
    pub fn ok(data: T) -> Self {
        Self {
            data,
            status: 200,
            status_text: "OK".to_string(),
            headers: HashMap::new(),
        }
    }
}
