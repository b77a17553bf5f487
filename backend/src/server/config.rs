//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `GUESTBOOK_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use guestbook::domain::ReviewPolicy;
use guestbook::domain::ports::RateLimitPolicy;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SUBMIT_WINDOW_SECS: u64 = 60;
const DEFAULT_SUBMIT_MAX_COUNT: u32 = 1;

/// Configuration values controlling the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GUESTBOOK")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// Hold new messages for moderation instead of publishing them.
    #[ortho_config(default = false)]
    pub require_review: bool,
    /// Length of the submission rate-limit window, in seconds.
    pub submit_window_secs: Option<u64>,
    /// Submissions allowed per caller within one window.
    pub submit_max_count: Option<u32>,
    /// Identify callers by forwarding headers; enable only behind a trusted
    /// reverse proxy.
    #[ortho_config(default = false)]
    pub trust_forwarded: bool,
}

impl ServerSettings {
    /// Configured bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::UNSPECIFIED,
            DEFAULT_PORT,
        )))
    }

    /// Moderation policy applied to new submissions.
    pub fn review_policy(&self) -> ReviewPolicy {
        if self.require_review {
            ReviewPolicy::RequireApproval
        } else {
            ReviewPolicy::PublishImmediately
        }
    }

    /// Per-caller budget for `POST /messages`.
    pub fn submit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(
            Duration::from_secs(
                self.submit_window_secs
                    .unwrap_or(DEFAULT_SUBMIT_WINDOW_SECS),
            ),
            self.submit_max_count.unwrap_or(DEFAULT_SUBMIT_MAX_COUNT),
        )
    }
}
