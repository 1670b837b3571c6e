pub mod aggregate;
pub mod board;
