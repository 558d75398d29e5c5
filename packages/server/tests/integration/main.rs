
mod auth;
mod link;
mod project;
