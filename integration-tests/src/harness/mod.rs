pub mod client;
pub mod server;
pub mod tracing;

pub use client::TestClient;
pub use server::{SharedBuffer, TestServer};
pub use self::tracing::{CapturedEvent, captured_events, init_test_tracing};
