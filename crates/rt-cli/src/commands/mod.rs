//! CLI command implementations

mod connect;
mod profile;

pub use connect::connect_command;
pub use profile::{profile_delete, profile_list, profile_save, profile_use};
