//! Structural types for the three named RPC methods (spec §6.1) plus the
//! framing envelope `redbank-net` ships them in.

use redbank_clock::VectorClock;
use redbank_engine::ShadowOp;
use redbank_types::{AccountId, ClientRequest, ClientResponse, Color, ReplicaId};
use serde::{Deserialize, Serialize};

/// `request({cmd, aid, amount?})` (spec §6.1). `ClientRequest` already
/// serializes to exactly this shape, so the wire type is the domain type.
pub type WireRequest = ClientRequest;

/// `{status, balance, message}` (spec §6.1).
pub type WireResponse = ClientResponse;

/// `shadow_struct` (spec §6.1): `{aid, server_id, amount, color, depend}`.
/// Field names and the `color` 0/1 encoding must match the wire exactly
/// so heterogeneous-language replicas interoperate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireShadow {
    pub aid: AccountId,
    pub server_id: ReplicaId,
    pub amount: f64,
    pub color: u8,
    pub depend: VectorClock,
}

impl From<&ShadowOp> for WireShadow {
    fn from(s: &ShadowOp) -> Self {
        WireShadow {
            aid: s.aid,
            server_id: s.author_id,
            amount: s.amount,
            color: s.color.as_wire(),
            depend: s.depend.clone(),
        }
    }
}

impl From<WireShadow> for ShadowOp {
    fn from(w: WireShadow) -> Self {
        ShadowOp {
            aid: w.aid,
            author_id: w.server_id,
            depend: w.depend,
            amount: w.amount,
            color: Color::from_wire(w.color),
        }
    }
}

/// The one frame type every connection exchanges. `redbank-net` decodes
/// one of these per frame and dispatches to the matching mailbox; none of
/// this envelope is itself part of spec §6.1 (which names three bare
/// methods plus a diagnostic), it only exists because a single TCP
/// connection needs to multiplex them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum WireEnvelope {
    Request { payload: WireRequest },
    Response { payload: WireResponse },
    PassToken { max_r: u64 },
    AddShadowOp { shadow: WireShadow },
    Dump,
    DumpReply { text: String },
}
