//! Core domain types shared by every redbank crate: the blue/red [`Color`]
//! classification, client [`Cmd`]/[`ClientRequest`]/[`ClientResponse`]
//! shapes, the protocol constants, and [`RedbankError`].
//!
//! This crate deliberately knows nothing about vector clocks, storage, or
//! the network — see `redbank-clock`, `redbank-store`, `redbank-engine`,
//! and `redbank-wire` for those.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of accounts held by every replica (spec §3, §6.3).
pub const N_ACCOUNTS: u32 = 10_000;

/// Balance every account starts with.
pub const INITIAL_BALANCE: f64 = 1000.0;

/// Interest rate applied by the `INTEREST` command.
pub const INTEREST_RATE: f64 = 0.04;

/// Simulated network delay applied before every peer RPC send.
pub const SERVER_DELAY: Duration = Duration::from_millis(200);

/// How long a replica holds the token before passing it on.
pub const TOKEN_HOLD: Duration = Duration::from_secs(1);

/// An account identifier once it has been validated against
/// `0 <= id < N_ACCOUNTS`. Client-supplied ids arrive as plain `i64` so
/// that out-of-range and negative values can be rejected uniformly.
pub type AccountId = u32;

/// The 0-based index of a replica within the cluster, `0 <= id < K`.
pub type ReplicaId = usize;

/// Validates a raw client-supplied account id, producing the internal
/// [`AccountId`] representation on success.
pub fn validate_account_id(raw: i64) -> Option<AccountId> {
    if raw < 0 || raw >= i64::from(N_ACCOUNTS) {
        None
    } else {
        Some(raw as AccountId)
    }
}

/// Blue operations commute and may be applied anywhere without
/// coordination; red operations require the rotating token's total
/// order. Serialized on the wire as `0`/`1` (spec §6.1) — see
/// `redbank-wire` for the byte-exact mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Red,
}

impl Color {
    #[must_use]
    pub fn as_wire(self) -> u8 {
        match self {
            Color::Blue => 0,
            Color::Red => 1,
        }
    }

    #[must_use]
    pub fn from_wire(value: u8) -> Color {
        if value == 0 { Color::Blue } else { Color::Red }
    }
}

/// The four client-issued operation kinds (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Cmd {
    Deposit,
    Withdraw,
    Interest,
    Check,
}

/// A client request as received over `request()` (spec §6.1). `aid` is
/// left unvalidated here — bounds checking happens in the replica engine
/// so that the rejection itself is observable protocol behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRequest {
    pub cmd: Cmd,
    pub aid: i64,
    #[serde(default)]
    pub amount: f64,
}

impl ClientRequest {
    #[must_use]
    pub fn new(cmd: Cmd, aid: i64, amount: f64) -> Self {
        Self { cmd, aid, amount }
    }
}

/// The reply to a `request()` call (spec §6.1). `status` is `0` on
/// success and `-1` on a client-visible failure; `message` is a
/// human-readable explanation, empty on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientResponse {
    pub status: i32,
    pub balance: f64,
    #[serde(default)]
    pub message: String,
}

impl ClientResponse {
    #[must_use]
    pub fn ok(balance: f64) -> Self {
        Self { status: 0, balance, message: String::new() }
    }

    #[must_use]
    pub fn rejected(balance: f64, message: impl Into<String>) -> Self {
        Self { status: -1, balance, message: message.into() }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 0
    }
}

/// Errors surfaced by the redbank core. These are never shown to a
/// client as part of normal protocol operation (spec §7): client-visible
/// failures are plain `ClientResponse { status: -1, .. }` values.
/// `RedbankError` covers configuration mistakes and internal invariant
/// violations that a correct implementation must never actually hit.
#[derive(Debug, Error)]
pub enum RedbankError {
    #[error("replica cluster must have at least one address")]
    EmptyCluster,

    #[error("replica index {index} out of range for cluster of size {cluster_size}")]
    ReplicaIndexOutOfRange { index: usize, cluster_size: usize },

    #[error(
        "red request replayed from red_list was rejected after becoming primary: {0} \
         (this is a protocol invariant violation)"
    )]
    RedInvariantViolated(String),

    #[error("dependency vector clock length {got} does not match cluster size {expected}")]
    ClusterSizeMismatch { expected: usize, got: usize },
}
