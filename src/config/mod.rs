pub mod catalog;
pub mod connection;
pub mod log;
pub mod runner;
pub mod settings;

pub use catalog::CatalogConfig;
pub use connection::{ConnectionConfig, ResolvedConnection};
pub use log::LogConfig;
pub use runner::RunnerConfig;
pub use settings::Settings;
