use crate::harness::{TestClient, captured_events, init_test_tracing};
use serverlog_core::conf::ViewerConfig;
use serverlog_core::server::LogServer;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Output sink the test can read while the server writes to it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Handle to a viewer running on its own thread and runtime.
pub struct TestServer {
    addr: SocketAddr,
    output: SharedBuffer,
    exit: Receiver<Result<(), String>>,
}

impl TestServer {
    /// Start a server on an ephemeral loopback port.
    ///
    /// The listen address in `config` is replaced; everything else is used
    /// as given.
    pub fn start(mut config: ViewerConfig) -> Self {
        init_test_tracing(captured_events());

        config.listen = "127.0.0.1:0".parse().unwrap();
        let output = SharedBuffer::default();
        let sink = output.clone();

        let (bound_tx, bound_rx) = mpsc::channel();
        let (exit_tx, exit) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");

            runtime.block_on(async move {
                let server = LogServer::bind(&config, sink)
                    .await
                    .expect("failed to bind test server");
                bound_tx
                    .send(server.local_addr().expect("tcp listener"))
                    .unwrap();

                let res = server.run().await.map_err(|e| e.to_string());
                let _ = exit_tx.send(res);
            });
        });

        let addr = bound_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("server failed to start");

        Self { addr, output, exit }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn connect(&self) -> TestClient {
        TestClient::connect(self.addr)
    }

    pub fn output(&self) -> String {
        self.output.contents()
    }

    /// Poll the output until `needle` shows up (or panic).
    pub fn wait_for_output(&self, needle: &str) -> String {
        let deadline = Instant::now() + Duration::from_secs(2);

        loop {
            let output = self.output();
            if output.contains(needle) {
                return output;
            }
            if Instant::now() > deadline {
                panic!("{needle:?} never appeared in output:\n{output}");
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    /// The error that stopped the server, if it stopped within `timeout`.
    pub fn wait_for_exit(&self, timeout: Duration) -> Option<Result<(), String>> {
        self.exit.recv_timeout(timeout).ok()
    }
}
