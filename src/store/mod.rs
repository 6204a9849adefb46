mod record;
mod state_store;

pub use record::MigrationRecord;
pub use state_store::{StateMap, StateStore};
