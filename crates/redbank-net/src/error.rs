use std::net::SocketAddr;

use redbank_wire::WireError;
use thiserror::Error;

/// Errors from the TCP transport.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("failed to bind to {addr}: {source}")]
    BindFailed { addr: SocketAddr, source: std::io::Error },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wire protocol error: {0}")]
    Wire(#[from] WireError),

    #[error("unexpected reply frame: {what}")]
    UnexpectedReply { what: String },
}
