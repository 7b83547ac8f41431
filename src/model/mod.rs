pub mod config;
pub mod patch;
pub mod project;
