//! Test doubles for relay sessions

#![allow(dead_code)]

use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::Bytes;
use futures::channel::mpsc as chunk_channel;
use futures::stream::{self, StreamExt};
use tokio::io::AsyncWrite;
use tokio::sync::oneshot;

use rt_core::session::TerminalMode;
use rt_core::{ChunkStream, ConnectionError, ConnectionId, ConnectionParams, RemoteConnection};

type Chunk = Result<Bytes, ConnectionError>;

/// In-memory remote connection service
///
/// The read stream is fed through [`FakeRemote::push`] and ends on
/// [`FakeRemote::close`] or when `stop` is honored.
pub struct FakeRemote {
    opened: Mutex<Vec<ConnectionParams>>,
    writes: Mutex<Vec<Bytes>>,
    stops: AtomicUsize,
    feed: Mutex<Option<chunk_channel::UnboundedSender<Chunk>>>,
    stream: Mutex<Option<ChunkStream>>,
    reject_open: bool,
    fail_writes: bool,
    fail_stop: bool,
}

impl FakeRemote {
    pub fn new() -> Self {
        let (tx, rx) = chunk_channel::unbounded();
        Self {
            opened: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
            feed: Mutex::new(Some(tx)),
            stream: Mutex::new(Some(rx.boxed())),
            reject_open: false,
            fail_writes: false,
            fail_stop: false,
        }
    }

    /// Remote that sends `chunks` and then closes the stream
    pub fn with_chunks(chunks: Vec<Chunk>) -> Self {
        let remote = Self::new();
        for chunk in chunks {
            remote.push(chunk);
        }
        remote.close();
        remote
    }

    /// Remote whose stream never produces anything and never ends
    pub fn hanging() -> Self {
        let remote = Self::new();
        *remote.stream.lock().unwrap() = Some(stream::pending().boxed());
        remote
    }

    pub fn rejecting_open(mut self) -> Self {
        self.reject_open = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn push(&self, chunk: Chunk) {
        if let Some(tx) = self.feed.lock().unwrap().as_ref() {
            let _ = tx.unbounded_send(chunk);
        }
    }

    pub fn close(&self) {
        self.feed.lock().unwrap().take();
    }

    pub fn opened(&self) -> Vec<ConnectionParams> {
        self.opened.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Bytes> {
        self.writes.lock().unwrap().clone()
    }

    pub fn written_bytes(&self) -> Vec<u8> {
        self.writes().iter().flat_map(|b| b.iter().copied()).collect()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteConnection for FakeRemote {
    async fn open(&self, params: &ConnectionParams) -> Result<ConnectionId, ConnectionError> {
        if self.reject_open {
            return Err(ConnectionError::Rejected("no such device".into()));
        }
        self.opened.lock().unwrap().push(params.clone());
        Ok(ConnectionId::new("conn-1"))
    }

    async fn read_stream(&self, _id: &ConnectionId) -> Result<ChunkStream, ConnectionError> {
        self.stream
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| ConnectionError::Transport("stream already subscribed".into()))
    }

    async fn write(&self, _id: &ConnectionId, data: Bytes) -> Result<(), ConnectionError> {
        if self.fail_writes {
            return Err(ConnectionError::Transport("broken pipe".into()));
        }
        self.writes.lock().unwrap().push(data);
        Ok(())
    }

    async fn stop(&self, _id: &ConnectionId) -> Result<(), ConnectionError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop {
            return Err(ConnectionError::NotFound("conn-1".into()));
        }
        self.close();
        Ok(())
    }
}

/// Terminal that counts mode transitions
#[derive(Clone, Default)]
pub struct FakeTerminal {
    entered: Arc<AtomicUsize>,
    restored: Arc<AtomicUsize>,
    fail_enter: bool,
    fail_restore: bool,
}

impl FakeTerminal {
    /// Terminal that refuses raw mode (e.g. stdin is not a tty)
    pub fn failing_enter() -> Self {
        Self {
            fail_enter: true,
            ..Self::default()
        }
    }

    /// Terminal whose mode cannot be put back
    pub fn failing_restore() -> Self {
        Self {
            fail_restore: true,
            ..Self::default()
        }
    }

    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    pub fn restored(&self) -> usize {
        self.restored.load(Ordering::SeqCst)
    }
}

impl TerminalMode for FakeTerminal {
    fn enter_raw(&mut self) -> io::Result<()> {
        if self.fail_enter {
            return Err(io::Error::new(io::ErrorKind::Other, "not a terminal"));
        }
        self.entered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        self.restored.fetch_add(1, Ordering::SeqCst);
        if self.fail_restore {
            return Err(io::Error::new(io::ErrorKind::Other, "tcsetattr failed"));
        }
        Ok(())
    }
}

/// Local output that accepts nothing, ever
///
/// Fires `entered` the first time a write is attempted.
pub struct StalledOutput {
    entered: Option<oneshot::Sender<()>>,
}

impl StalledOutput {
    pub fn new() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self { entered: Some(tx) }, rx)
    }
}

impl AsyncWrite for StalledOutput {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if let Some(tx) = self.entered.take() {
            let _ = tx.send(());
        }
        Poll::Pending
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Pending
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Pending
    }
}
