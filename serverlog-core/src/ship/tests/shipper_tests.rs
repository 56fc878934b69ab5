use crate::net::SocketMultiplexer;
use crate::record::{Level, LogRecord, decode};
use crate::ship::LogShipper;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn shipped_records_decode_on_the_server_side() {
    // Arrange
    let mut mux = SocketMultiplexer::bind(&"127.0.0.1:0".parse().unwrap())
        .await
        .unwrap();
    let addr = mux.local_addr().unwrap();
    let record = LogRecord::new(Level::NOTICE, "app", "hi")
        .with_context("user", "alice")
        .with_log_id("req-7");

    // Act
    let mut shipper = LogShipper::connect(&format!("tcp://{addr}")).await.unwrap();
    shipper.send(&record).await.unwrap();
    shipper.send_raw(b"garbage").await.unwrap();
    shipper.close().await.unwrap();

    // Assert
    let (id, line) = timeout(Duration::from_secs(2), mux.next_line())
        .await
        .unwrap();
    assert_eq!(id, 1);
    assert_eq!(decode(&line), Some(record));

    let (_, line) = timeout(Duration::from_secs(2), mux.next_line())
        .await
        .unwrap();
    assert_eq!(decode(&line), None);
}

#[tokio::test]
async fn connect_failure_is_an_error() {
    let free = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = free.local_addr().unwrap();
    drop(free);

    assert!(LogShipper::connect(&addr.to_string()).await.is_err());
}
