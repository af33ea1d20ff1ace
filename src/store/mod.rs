//! Timeline space stores
//!
//! In-memory state shown by the client. Stores own their state and
//! reconcile it against the server through an injected `SnsClient`.

mod follow_requests;
mod side_menu;

pub use follow_requests::FollowRequests;
pub use side_menu::SideMenu;

use crate::error::RequestError;

/// Count a failed store operation
fn record_failure(operation: &'static str, error: &RequestError) {
    use crate::metrics::ERRORS_TOTAL;
    ERRORS_TOTAL
        .with_label_values(&[error.kind(), operation])
        .inc();
}
