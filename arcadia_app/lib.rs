pub mod config;
pub mod repository;
pub mod services;
pub mod test_utils;
pub mod uow;
