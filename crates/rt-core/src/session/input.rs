//! Local input pump
//!
//! Blocking single-byte reads from the terminal happen on a dedicated
//! thread and are handed to the async side over a channel. The channel
//! closing is end-of-input.

use std::io::{ErrorKind, Read};

use tokio::sync::mpsc;

/// Bytes buffered between the input thread and the dispatcher
const INPUT_BUFFER: usize = 256;

/// Pump standard input into a channel, one byte per message
pub fn spawn_stdin_pump() -> mpsc::Receiver<u8> {
    spawn_input_pump(std::io::stdin())
}

/// Pump any blocking reader into a channel, one byte per message
///
/// The thread is detached: it exits when the reader reaches end-of-input,
/// fails, or the receiver is dropped (noticed on the next byte).
pub fn spawn_input_pump<R>(mut reader: R) -> mpsc::Receiver<u8>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);

    std::thread::spawn(move || {
        let mut byte = [0u8; 1];
        loop {
            match reader.read(&mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.blocking_send(byte[0]).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!("Local input failed: {}", e);
                    break;
                }
            }
        }
        tracing::debug!("Local input ended");
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn test_pump_delivers_bytes_then_closes() {
        let mut rx = spawn_input_pump(Cursor::new(b"hi".to_vec()));

        assert_eq!(rx.recv().await, Some(b'h'));
        assert_eq!(rx.recv().await, Some(b'i'));
        assert_eq!(rx.recv().await, None);
    }
}
