pub mod serve;
pub mod ship;
