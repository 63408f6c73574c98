//! # relaychat_client
//!
//! Client side of relaychat: a typed HTTP client for the relay, the ordered
//! session transcript, and the session that turns user input into relay calls.

pub mod client;
pub mod error;
pub mod session;
pub mod transcript;

pub use client::RelayClient;
pub use error::{ClientError, Result};
pub use session::{ChatSession, DispatchState, TurnId, TurnOutcome};
pub use transcript::{GREETING, ImageRef, Transcript, TranscriptEntry};
