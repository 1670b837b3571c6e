pub mod list;
pub mod message_repository;
pub mod repository;
pub mod service;
