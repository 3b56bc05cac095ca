//! Infrastructure layer - storage, hashing, tokens and logging

pub mod account;
pub mod auth;
pub mod logging;
pub mod storage;
pub mod user;
