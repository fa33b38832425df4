pub mod api;
pub mod bootstrap;
pub mod config;
pub mod coordinator;
pub mod database;
pub mod events;
pub mod models;
pub mod services;
pub mod workers;

pub use config::Config;
pub use database::Database;
