//! The inbound side: one TCP connection per RPC call (the protocol has
//! no need for persistent multiplexed connections — spec §6.1 names
//! three independent methods), decoded and pushed onto a replica's
//! mailboxes via its [`ReplicaHandle`].

use std::net::SocketAddr;

use redbank_engine::ReplicaHandle;
use redbank_wire::{WireEnvelope, read_frame, write_frame};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::error::NetError;

/// Binds `addr` and serves RPC calls for `handle` until the listener
/// errors. Runs forever on success; the caller typically spawns this.
pub async fn serve(addr: SocketAddr, handle: ReplicaHandle) -> Result<(), NetError> {
    let listener =
        TcpListener::bind(addr).await.map_err(|source| NetError::BindFailed { addr, source })?;
    info!(replica = handle.id(), %addr, "replica listening");

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let handle = handle.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(stream, &handle).await {
                debug!(%peer_addr, %err, "connection ended");
            }
        });
    }
}

async fn handle_connection(mut stream: TcpStream, handle: &ReplicaHandle) -> Result<(), NetError> {
    let envelope: WireEnvelope = read_frame(&mut stream).await?;
    match envelope {
        WireEnvelope::Request { payload } => {
            let response = handle.request(payload).await;
            write_frame(&mut stream, &WireEnvelope::Response { payload: response }).await?;
        }
        WireEnvelope::PassToken { max_r } => handle.pass_token(max_r),
        WireEnvelope::AddShadowOp { shadow } => handle.add_shadow_op(shadow.into()),
        WireEnvelope::Dump => {
            let text = handle.dump().await.unwrap_or_default();
            write_frame(&mut stream, &WireEnvelope::DumpReply { text }).await?;
        }
        WireEnvelope::Response { .. } | WireEnvelope::DumpReply { .. } => {
            warn!("received a reply-shaped frame on the listening side, discarding");
        }
    }
    Ok(())
}
