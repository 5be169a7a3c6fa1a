use thiserror::Error;

/// Errors from encoding, decoding, or framing a wire message.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("frame of {len} bytes exceeds the {limit} byte limit")]
    FrameTooLarge { len: u32, limit: u32 },

    #[error("connection closed before a full frame was read")]
    ConnectionClosed,
}
