//! Run-scoped aggregation state

mod run_state;

pub use run_state::{Item, RunState};
