//! TCP transport for the redbank RPC surface (spec §6.1).
//!
//! ```text
//! ┌──────────────┐   one TCP conn per call   ┌─────────────┐
//! │ client / peer│ ────────────────────────▶ │ redbank-net │ ──▶ ReplicaHandle
//! └──────────────┘                            └─────────────┘
//! ```
//!
//! Deliberately out of scope (spec §1 Non-goals carried into this
//! layer): authentication, TLS, retry/backoff beyond the fire-and-forget
//! delivery spec §4.4 describes.

mod client;
mod error;
mod listener;
mod peer_link;

pub use client::{call_dump, call_request};
pub use error::NetError;
pub use listener::serve;
pub use peer_link::TcpPeerLink;
