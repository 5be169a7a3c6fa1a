//! An in-process [`PeerLink`] used by tests and by `redbank sim` demo
//! scenarios that run a whole cluster inside one process. It talks to the
//! peer through the exact same [`ReplicaHandle`] surface a networked peer
//! would use, per spec §9's note that even in-process harnesses should go
//! through the RPC surface rather than reach into the peer's engine.

use redbank_types::SERVER_DELAY;

use crate::peer::PeerLink;
use crate::replica::ReplicaHandle;
use crate::shadow::ShadowOp;

/// A [`PeerLink`] that delivers to another in-process [`Replica`](crate::Replica)
/// after the same simulated delay a networked link would apply.
pub struct InProcessPeerLink {
    target: ReplicaHandle,
}

impl InProcessPeerLink {
    #[must_use]
    pub fn new(target: ReplicaHandle) -> Self {
        Self { target }
    }
}

impl PeerLink for InProcessPeerLink {
    fn pass_token(&self, max_r: u64) {
        let target = self.target.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SERVER_DELAY).await;
            target.pass_token(max_r);
        });
    }

    fn add_shadow_op_async(&self, shadow: ShadowOp) {
        let target = self.target.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SERVER_DELAY).await;
            target.add_shadow_op(shadow);
        });
    }
}
