//! A blocking-free client for the `request()`/`dump()` RPC methods, used
//! by `redbank-cli`'s `repl` and `sim` subcommands (spec §1: "any
//! interactive test clients" are an external collaborator of the core,
//! but still talk to a replica over the same wire protocol as a peer).
//!
//! Unlike [`crate::TcpPeerLink`] (fire-and-forget, no reply expected),
//! a client call opens a connection, writes one frame, and waits for
//! exactly one reply frame before closing it — mirroring the Python
//! original's synchronous `ServerProxy.request()`/`.dump()` calls.

use std::net::SocketAddr;

use redbank_types::{ClientRequest, ClientResponse};
use redbank_wire::{WireEnvelope, read_frame, write_frame};
use tokio::net::TcpStream;

use crate::error::NetError;

/// Sends a `request()` call to the replica at `addr` and waits for its
/// response (spec §6.1).
pub async fn call_request(addr: SocketAddr, request: ClientRequest) -> Result<ClientResponse, NetError> {
    let mut stream = TcpStream::connect(addr).await?;
    write_frame(&mut stream, &WireEnvelope::Request { payload: request }).await?;
    match read_frame(&mut stream).await? {
        WireEnvelope::Response { payload } => Ok(payload),
        other => Err(NetError::UnexpectedReply { what: format!("{other:?}") }),
    }
}

/// Sends a `dump()` call to the replica at `addr` and returns its
/// diagnostic clock dump (spec §4.3).
pub async fn call_dump(addr: SocketAddr) -> Result<String, NetError> {
    let mut stream = TcpStream::connect(addr).await?;
    write_frame(&mut stream, &WireEnvelope::Dump).await?;
    match read_frame(&mut stream).await? {
        WireEnvelope::DumpReply { text } => Ok(text),
        other => Err(NetError::UnexpectedReply { what: format!("{other:?}") }),
    }
}
