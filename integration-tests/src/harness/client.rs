use serverlog_core::record::{LogRecord, encode};
use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream};

/// Blocking client writing frames the way a shipping application would.
pub struct TestClient {
    stream: TcpStream,
}

impl TestClient {
    pub fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).expect("failed to connect to test server");
        stream.set_nodelay(true).unwrap();
        Self { stream }
    }

    pub fn send(&mut self, record: &LogRecord) {
        let frame = encode(record).expect("record encodes");
        self.send_raw(frame.as_bytes());
    }

    /// Writes `line` and a newline.
    pub fn send_raw(&mut self, line: &[u8]) {
        self.stream.write_all(line).unwrap();
        self.stream.write_all(b"\n").unwrap();
    }

    /// Writes bytes without a trailing newline.
    pub fn send_partial(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).unwrap();
    }

    pub fn close(self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}
