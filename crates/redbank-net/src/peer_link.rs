//! The outbound side: a [`PeerLink`] that dials a remote replica fresh
//! for every call (spec §4.4).

use std::net::SocketAddr;

use redbank_engine::{PeerLink, ShadowOp};
use redbank_types::SERVER_DELAY;
use redbank_wire::{WireEnvelope, WireShadow, write_frame};
use tokio::net::TcpStream;
use tracing::warn;

/// Fire-and-forget outbound RPC to one peer replica, over a TCP
/// connection opened per call and closed after sending.
pub struct TcpPeerLink {
    addr: SocketAddr,
}

impl TcpPeerLink {
    #[must_use]
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    async fn send(addr: SocketAddr, envelope: WireEnvelope) {
        tokio::time::sleep(SERVER_DELAY).await;
        let outcome: std::io::Result<()> = async {
            let mut stream = TcpStream::connect(addr).await?;
            write_frame(&mut stream, &envelope).await.map_err(std::io::Error::other)
        }
        .await;
        if let Err(err) = outcome {
            warn!(%addr, %err, "peer send failed");
        }
    }
}

impl PeerLink for TcpPeerLink {
    fn pass_token(&self, max_r: u64) {
        let addr = self.addr;
        tokio::spawn(Self::send(addr, WireEnvelope::PassToken { max_r }));
    }

    fn add_shadow_op_async(&self, shadow: ShadowOp) {
        let addr = self.addr;
        let shadow = WireShadow::from(&shadow);
        tokio::spawn(Self::send(addr, WireEnvelope::AddShadowOp { shadow }));
    }
}
