//! Byte relay from a child output stream to a supervisor stream.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Fixed transfer buffer size for a relay task.
pub const RELAY_BUFFER_LEN: usize = 8 * 1024;

/// Copy bytes from `source` to `dest` until end-of-stream or an I/O error.
///
/// Each chunk is written and flushed as soon as it is read, preserving
/// arrival order. Failures on either side end the relay silently; losing
/// output mirroring must never disturb the child or the supervisor. Both
/// streams are owned by the relay and dropped (closed) when it returns.
pub async fn relay<R, W>(mut source: R, mut dest: W)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; RELAY_BUFFER_LEN];
    loop {
        let n = match source.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                tracing::debug!(error = %e, "Relay source read failed");
                break;
            }
        };
        if let Err(e) = dest.write_all(&buf[..n]).await {
            tracing::debug!(error = %e, "Relay destination write failed");
            break;
        }
        if let Err(e) = dest.flush().await {
            tracing::debug!(error = %e, "Relay destination flush failed");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_relay_copies_in_order_until_eof() {
        let (mut src_tx, src_rx) = tokio::io::duplex(64);
        let (dst_tx, mut dst_rx) = tokio::io::duplex(64);

        let task = tokio::spawn(relay(src_rx, dst_tx));

        src_tx.write_all(b"hello ").await.unwrap();
        src_tx.write_all(b"world").await.unwrap();
        drop(src_tx); // EOF ends the relay, which closes its destination.

        task.await.unwrap();

        let mut out = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut dst_rx, &mut out)
            .await
            .unwrap();
        assert_eq!(out, b"hello world");
    }

    #[tokio::test]
    async fn test_relay_ends_silently_on_destination_error() {
        let (mut src_tx, src_rx) = tokio::io::duplex(64);
        let (dst_tx, dst_rx) = tokio::io::duplex(16);

        // Closing the read side makes every write to dst_tx fail.
        drop(dst_rx);

        let task = tokio::spawn(relay(src_rx, dst_tx));

        // The relay must terminate on its own without surfacing the error.
        src_tx.write_all(&[0u8; 48]).await.unwrap();
        let _ = src_tx.flush().await;

        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("relay should end on write failure")
            .unwrap();
    }

    #[tokio::test]
    async fn test_relay_handles_chunks_larger_than_pipe() {
        let (mut src_tx, src_rx) = tokio::io::duplex(8);
        let (dst_tx, mut dst_rx) = tokio::io::duplex(8);

        let task = tokio::spawn(relay(src_rx, dst_tx));

        let payload: Vec<u8> = (0..=255).collect();
        let writer = {
            let payload = payload.clone();
            tokio::spawn(async move {
                src_tx.write_all(&payload).await.unwrap();
                drop(src_tx);
            })
        };

        let mut out = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut dst_rx, &mut out)
            .await
            .unwrap();

        writer.await.unwrap();
        task.await.unwrap();
        assert_eq!(out, payload);
    }
}
