//! The client-request mailbox item and the handle used to submit work to
//! a running [`crate::Replica`].

use redbank_types::{ClientRequest, ClientResponse};
use tokio::sync::oneshot;

/// A client request bundled with its single-use reply channel (spec §3).
/// `respond` consumes `self`, so the type system enforces the invariant
/// that every request item is answered exactly once.
#[derive(Debug)]
pub struct RequestItem {
    pub request: ClientRequest,
    reply: oneshot::Sender<ClientResponse>,
}

impl RequestItem {
    #[must_use]
    pub fn new(request: ClientRequest) -> (Self, oneshot::Receiver<ClientResponse>) {
        let (reply, rx) = oneshot::channel();
        (Self { request, reply }, rx)
    }

    /// Writes the (only) response for this request. The receiver may
    /// already be gone if the caller stopped waiting; that is not this
    /// replica's problem (spec §7: client-visible failures are either
    /// answered or the caller's channel is abandoned, never re-raised).
    pub fn respond(self, response: ClientResponse) {
        let _ = self.reply.send(response);
    }
}
