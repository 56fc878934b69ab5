use crate::net::BindAddress;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::collections::{BTreeMap, VecDeque};
use std::future::poll_fn;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncRead;
use tokio::net::TcpListener;
#[cfg(unix)]
use tokio::net::UnixListener;
use tokio_util::codec::{AnyDelimiterCodec, FramedRead};

/// Identifies one accepted connection for as long as it stays open.
pub type ConnectionId = u64;

type ClientStream = Pin<Box<dyn AsyncRead + Send>>;
type LineReader = FramedRead<ClientStream, AnyDelimiterCodec>;

enum Listener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl Listener {
    async fn bind(address: &BindAddress) -> io::Result<Self> {
        match address {
            BindAddress::Tcp { host, port } => {
                Ok(Listener::Tcp(TcpListener::bind((host.as_str(), *port)).await?))
            }
            #[cfg(unix)]
            BindAddress::Unix(path) => Ok(Listener::Unix(UnixListener::bind(path)?)),
            #[cfg(not(unix))]
            BindAddress::Unix(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "unix sockets are not supported on this platform",
            )),
        }
    }

    fn poll_accept(&self, cx: &mut Context<'_>) -> Poll<io::Result<(ClientStream, String)>> {
        match self {
            Listener::Tcp(listener) => listener.poll_accept(cx).map_ok(|(stream, peer)| {
                if let Err(e) = stream.set_nodelay(true) {
                    tracing::debug!(error = %e, "failed to set TCP_NODELAY");
                }
                (Box::pin(stream) as ClientStream, peer.to_string())
            }),
            #[cfg(unix)]
            Listener::Unix(listener) => listener
                .poll_accept(cx)
                .map_ok(|(stream, _)| (Box::pin(stream) as ClientStream, "unix".to_string())),
        }
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        match self {
            Listener::Tcp(listener) => listener.local_addr().ok(),
            #[cfg(unix)]
            Listener::Unix(_) => None,
        }
    }
}

/// Accepts clients and multiplexes line reads across all of them on the
/// calling task.
///
/// Each wake-up is one cycle: accept at most one pending client, then poll
/// every open connection once, queueing at most one line from each. The
/// queued lines are handed out before the next cycle starts, so a chatty
/// client cannot starve the others. A cycle is O(open connections), which is
/// fine for a log viewer and not meant for large fan-in.
///
/// The sequence of lines never ends; it only yields when a line is available.
pub struct SocketMultiplexer {
    listener: Listener,
    registry: BTreeMap<ConnectionId, LineReader>,
    ready: VecDeque<(ConnectionId, Bytes)>,
    last_id: ConnectionId,
}

impl SocketMultiplexer {
    pub async fn bind(address: &BindAddress) -> io::Result<Self> {
        let listener = Listener::bind(address).await?;

        Ok(Self {
            listener,
            registry: BTreeMap::new(),
            ready: VecDeque::new(),
            last_id: 0,
        })
    }

    /// The bound TCP address; `None` for unix sockets.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn open_connections(&self) -> usize {
        self.registry.len()
    }

    /// Wait for the next line from any client.
    ///
    /// The line is returned without its `\n`. A client that closes mid-line
    /// still delivers the partial line before its connection is dropped.
    pub async fn next_line(&mut self) -> (ConnectionId, Bytes) {
        poll_fn(|cx| self.poll_next_line(cx)).await
    }

    pub fn poll_next_line(&mut self, cx: &mut Context<'_>) -> Poll<(ConnectionId, Bytes)> {
        loop {
            if let Some(line) = self.ready.pop_front() {
                return Poll::Ready(line);
            }

            // Only park once every handle has registered interest.
            if !self.poll_cycle(cx) {
                return Poll::Pending;
            }
        }
    }

    /// One readiness cycle. Returns whether anything happened.
    fn poll_cycle(&mut self, cx: &mut Context<'_>) -> bool {
        let mut progressed = false;

        match self.listener.poll_accept(cx) {
            Poll::Ready(Ok((stream, peer))) => {
                self.register(stream, &peer);
                progressed = true;
            }
            Poll::Ready(Err(e)) => {
                tracing::warn!(error = %e, "failed to accept connection");
                // Errored accepts do not register a waker; retry on the next turn.
                cx.waker().wake_by_ref();
            }
            Poll::Pending => {}
        }

        let mut closed = Vec::new();
        for (&id, reader) in self.registry.iter_mut() {
            match reader.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(line))) => {
                    self.ready.push_back((id, line));
                    progressed = true;
                }
                Poll::Ready(Some(Err(e))) => {
                    tracing::debug!(connection = id, error = %e, "read failed, closing connection");
                    closed.push(id);
                }
                Poll::Ready(None) => closed.push(id),
                Poll::Pending => {}
            }
        }

        for id in closed {
            self.registry.remove(&id);
            tracing::debug!(
                connection = id,
                open = self.registry.len(),
                "connection closed"
            );
            progressed = true;
        }

        progressed
    }

    fn register(&mut self, stream: ClientStream, peer: &str) {
        self.last_id += 1;
        let id = self.last_id;

        let codec = AnyDelimiterCodec::new(b"\n".to_vec(), Vec::new());
        self.registry.insert(id, FramedRead::new(stream, codec));

        tracing::debug!(
            connection = id,
            peer,
            open = self.registry.len(),
            "connection accepted"
        );
    }
}

impl Stream for SocketMultiplexer {
    type Item = (ConnectionId, Bytes);

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_next_line(cx).map(Some)
    }
}
