pub mod app;
pub mod config;
pub mod incident;
pub mod report;
pub mod user;
