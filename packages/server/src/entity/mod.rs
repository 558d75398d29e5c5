pub mod component;
pub mod project;
pub mod project_component;
pub mod user;
