//! # relaychat_core
//!
//! Core domain logic for relaychat.
//!
//! - [`models`]: JSON bodies exchanged between the client and the relay
//! - [`upstream`]: the generative-AI provider the relay forwards to
//! - [`upload`]: request-scoped temporary copies of uploaded files

pub mod models;
pub mod upload;
pub mod upstream;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
