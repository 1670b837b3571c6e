pub mod repository;
pub mod routing;
pub mod service;
