pub mod api;
pub mod config;
pub mod http_probe;
pub mod report;
pub mod runner;
