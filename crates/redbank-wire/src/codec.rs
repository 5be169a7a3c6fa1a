//! A length-prefixed JSON frame codec: a 4-byte big-endian length
//! followed by that many bytes of `serde_json`-encoded payload.
//!
//! The wire protocol (spec §6.1) only fixes the *structural* shape of
//! each method's payload, not a transport framing; this crate picks one
//! concrete, debuggable encoding so `redbank-net` has something to ship
//! over a raw TCP stream without reaching for a full HTTP stack for
//! three RPC methods.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::WireError;

/// Frames larger than this are rejected rather than trusted to allocate.
pub const MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

/// Serializes `value` and writes it as one length-prefixed frame.
pub async fn write_frame<W, T>(writer: &mut W, value: &T) -> Result<(), WireError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let body = serde_json::to_vec(value)?;
    let len = u32::try_from(body.len()).map_err(|_| WireError::FrameTooLarge {
        len: u32::MAX,
        limit: MAX_FRAME_LEN,
    })?;
    if len > MAX_FRAME_LEN {
        return Err(WireError::FrameTooLarge { len, limit: MAX_FRAME_LEN });
    }
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one length-prefixed frame and deserializes it as `T`.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<T, WireError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            return Err(WireError::ConnectionClosed);
        }
        Err(e) => return Err(e.into()),
    }
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(WireError::FrameTooLarge { len, limit: MAX_FRAME_LEN });
    }
    let mut body = vec![0u8; len as usize];
    reader.read_exact(&mut body).await?;
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_a_frame_through_an_in_memory_pipe() {
        let (mut client, mut server) = tokio::io::duplex(4096);

        let envelope = crate::WireEnvelope::PassToken { max_r: 7 };
        write_frame(&mut client, &envelope).await.unwrap();

        let decoded: crate::WireEnvelope = read_frame(&mut server).await.unwrap();
        match decoded {
            crate::WireEnvelope::PassToken { max_r } => assert_eq!(max_r, 7),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[tokio::test]
    async fn reading_from_a_closed_pipe_reports_connection_closed() {
        let (client, mut server) = tokio::io::duplex(4096);
        drop(client);
        let err = read_frame::<_, crate::WireEnvelope>(&mut server).await.unwrap_err();
        assert!(matches!(err, WireError::ConnectionClosed));
    }
}
