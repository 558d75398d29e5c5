pub mod auth;
pub mod component;
pub mod project;
pub mod shared;
pub mod user;
