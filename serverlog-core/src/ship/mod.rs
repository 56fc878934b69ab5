//! Client side of the wire protocol: connects to a running viewer and sends
//! records as frames.

#[cfg(test)]
mod tests;

use crate::record::{LogRecord, encode};
use std::io;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

pub struct LogShipper {
    stream: TcpStream,
}

impl LogShipper {
    /// `address` is `host:port`, optionally prefixed with `tcp://`.
    pub async fn connect(address: &str) -> io::Result<Self> {
        let address = address.strip_prefix("tcp://").unwrap_or(address);
        let stream = TcpStream::connect(address).await?;
        stream.set_nodelay(true)?;

        tracing::debug!(address, "connected to log server");
        Ok(Self { stream })
    }

    pub async fn send(&mut self, record: &LogRecord) -> io::Result<()> {
        let frame = encode(record).map_err(io::Error::other)?;
        self.send_raw(frame.as_bytes()).await
    }

    /// Writes `line` followed by a newline, as is.
    pub async fn send_raw(&mut self, line: &[u8]) -> io::Result<()> {
        self.stream.write_all(line).await?;
        self.stream.write_all(b"\n").await
    }

    pub async fn close(mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
