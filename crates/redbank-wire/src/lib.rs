//! Wire types for the redbank RPC surface (spec §6.1) and a length-
//! prefixed frame codec so `redbank-net` can ship them over a TCP
//! connection without pulling in a full HTTP stack for three methods.

mod codec;
mod dto;
mod error;

pub use codec::{MAX_FRAME_LEN, read_frame, write_frame};
pub use dto::{WireEnvelope, WireRequest, WireResponse, WireShadow};
pub use error::WireError;
