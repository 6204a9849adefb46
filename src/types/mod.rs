mod exit_policy;
mod migration_kind;
mod migration_status;
mod run_policy;
mod run_summary;

pub use exit_policy::ExitPolicy;
pub use migration_kind::MigrationKind;
pub use migration_status::MigrationStatus;
pub use run_policy::RunPolicy;
pub use run_summary::RunSummary;
