mod bind_address;
mod multiplexer;

#[cfg(test)]
mod tests;

pub use bind_address::{BindAddress, BindAddressError, DEFAULT_BIND_ADDRESS};
pub use multiplexer::{ConnectionId, SocketMultiplexer};
