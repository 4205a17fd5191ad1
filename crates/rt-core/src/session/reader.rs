//! Inbound reader: remote bytes to local output

use futures::StreamExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use super::manager::InboundStream;

/// Why the inbound reader stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEnd {
    /// The remote service closed the stream
    Closed,
    /// Reading the stream, or writing local output, failed
    Failed(String),
    /// The session was terminated from elsewhere
    Cancelled,
}

/// Copy remote chunks to `output` until the stream ends
///
/// Each chunk is flushed before the next one is taken. However the loop
/// ends, `terminated` is set on the way out. Errors are reduced to the
/// returned [`InboundEnd`]; they never propagate to the dispatcher.
pub async fn run_inbound<W>(
    mut stream: InboundStream,
    mut output: W,
    terminated: CancellationToken,
) -> InboundEnd
where
    W: AsyncWrite + Unpin,
{
    let end = loop {
        let next = tokio::select! {
            biased;
            _ = terminated.cancelled() => break InboundEnd::Cancelled,
            next = stream.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                if let Err(e) = write_chunk(&mut output, &chunk).await {
                    break InboundEnd::Failed(format!("local output: {}", e));
                }
            }
            Some(Err(e)) => break InboundEnd::Failed(e.to_string()),
            None => break InboundEnd::Closed,
        }
    };

    // Still in raw mode here; the caller reports failures once the terminal is restored
    match &end {
        InboundEnd::Closed => tracing::info!("Remote stream closed"),
        InboundEnd::Failed(reason) => tracing::debug!("Remote stream failed: {}", reason),
        InboundEnd::Cancelled => tracing::debug!("Inbound reader cancelled"),
    }

    terminated.cancel();
    end
}

async fn write_chunk<W: AsyncWrite + Unpin>(output: &mut W, chunk: &[u8]) -> std::io::Result<()> {
    output.write_all(chunk).await?;
    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConnectionError;
    use bytes::Bytes;
    use futures::stream;
    use tokio::io::AsyncReadExt;

    fn inbound(chunks: Vec<Result<Bytes, ConnectionError>>) -> InboundStream {
        InboundStream::new(stream::iter(chunks).boxed())
    }

    #[tokio::test]
    async fn test_copies_chunks_in_order_then_signals() {
        let (writer, mut reader) = tokio::io::duplex(64);
        let terminated = CancellationToken::new();

        let end = run_inbound(
            inbound(vec![
                Ok(Bytes::from_static(b"ok")),
                Ok(Bytes::from_static(b"\n")),
            ]),
            writer,
            terminated.clone(),
        )
        .await;

        assert_eq!(end, InboundEnd::Closed);
        assert!(terminated.is_cancelled());

        let mut received = Vec::new();
        reader.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"ok\n");
    }

    #[tokio::test]
    async fn test_stream_error_ends_reader() {
        let terminated = CancellationToken::new();

        let end = run_inbound(
            inbound(vec![
                Err(ConnectionError::Transport("reset".into())),
                Ok(Bytes::from_static(b"never")),
            ]),
            tokio::io::sink(),
            terminated.clone(),
        )
        .await;

        assert!(matches!(end, InboundEnd::Failed(_)));
        assert!(terminated.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_while_waiting() {
        let terminated = CancellationToken::new();
        terminated.cancel();

        let end = run_inbound(
            InboundStream::new(stream::pending().boxed()),
            tokio::io::sink(),
            terminated,
        )
        .await;

        assert_eq!(end, InboundEnd::Cancelled);
    }
}
