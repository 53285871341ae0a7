pub mod account_service;
pub mod auth_service;
pub mod like_engine;
pub mod message_service;
pub mod profile_service;
