pub mod attachment;
pub mod auth;
pub mod config;
pub mod data;
pub mod route;
pub mod token;
pub mod users;
