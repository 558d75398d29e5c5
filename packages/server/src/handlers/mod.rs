pub mod auth;
pub mod component;
pub mod export;
pub mod project;
pub mod user;
