pub mod aggregate;
pub mod list;
pub mod message;
pub mod status;
