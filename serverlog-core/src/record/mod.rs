mod codec;
mod level;
mod types;

#[cfg(test)]
mod tests;

pub use codec::{DecodeError, PROTOCOL_VERSION, decode, encode, try_decode};
pub use level::Level;
pub use types::LogRecord;
