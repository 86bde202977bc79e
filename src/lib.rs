pub mod config;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod models;
pub mod providers;
pub mod server;
