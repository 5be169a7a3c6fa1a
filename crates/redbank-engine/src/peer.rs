//! The peer link abstraction (spec §4.4): a replica's outbound adapter to
//! exactly one remote replica.
//!
//! A peer link is not a reference to another replica's engine — it is a
//! *client of* a remote replica's RPC surface, even in an in-process test
//! harness (spec §9 "Cyclic-reference risk"). That keeps the transport
//! (`redbank-net`'s `TcpPeerLink`) and in-process testing (`memory`
//! module) interchangeable behind the same trait.
//!
//! Both methods are synchronous and fire-and-forget: an implementation
//! is expected to spawn its own task (sleeping ~[`redbank_types::SERVER_DELAY`]
//! to emulate a WAN) and return immediately, per spec §5's "Fire-and-
//! forget outbound RPC with simulated delay" note.

use crate::shadow::ShadowOp;

/// Outbound adapter to one remote replica.
pub trait PeerLink: Send + Sync {
    /// Submits `pass_token(max_r)`, non-blocking.
    fn pass_token(&self, max_r: u64);

    /// Submits `add_shadow_op(shadow)`, non-blocking.
    fn add_shadow_op_async(&self, shadow: ShadowOp);
}
