pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod executor;
pub mod services;
pub mod store;
pub mod types;
pub mod utils;
