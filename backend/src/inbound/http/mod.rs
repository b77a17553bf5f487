//! HTTP inbound adapter exposing the guestbook REST endpoints.

pub mod envelope;
pub mod error;
pub mod messages;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod validation;

use actix_web::dev::ConnectionInfo;

pub use envelope::{ApiResult, Envelope};

/// Placeholder recorded when the peer address is unavailable.
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// Caller address, honouring `Forwarded` and `X-Forwarded-For` headers.
///
/// Clients control those headers, so use this for logs and records only.
/// Anything enforcing a per-caller limit uses [`peer_address`].
#[must_use]
pub fn remote_address(info: &ConnectionInfo) -> String {
    info.realip_remote_addr()
        .unwrap_or(UNKNOWN_ADDRESS)
        .to_owned()
}

/// Address of the socket peer, ignoring forwarding headers.
#[must_use]
pub fn peer_address(info: &ConnectionInfo) -> String {
    info.peer_addr().unwrap_or(UNKNOWN_ADDRESS).to_owned()
}
