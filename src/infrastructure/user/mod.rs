//! User infrastructure module
//!
//! Stores for the users collection (JSON file and in-memory) and the
//! service that validates and applies changes to it.

mod json_file_store;
mod repository;
mod service;

pub use json_file_store::JsonFileUserStore;
pub use repository::InMemoryUserStore;
pub use service::UserRecordService;
