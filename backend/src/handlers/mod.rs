pub mod admin;
pub mod auth;
pub mod batches;
pub mod departments;
pub mod manage;
pub mod properties;
pub mod users;
