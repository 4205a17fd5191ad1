//! Profile command implementations

use anyhow::{Context, Result};

use rt_core::config::{ClientConfig, ProfileStore};
use rt_core::session::SessionEnd;
use rt_core::ConnectionParams;

use super::connect_command;
use crate::output::{format_profiles, print_success, print_warning};

/// List saved profiles
pub fn profile_list(store: &ProfileStore) {
    println!("{}", format_profiles(&store.list()));
}

/// Create or overwrite a profile
pub fn profile_save(store: &mut ProfileStore, name: &str, params: ConnectionParams) -> Result<()> {
    let description = params.to_string();
    store
        .save(name, params)
        .with_context(|| format!("Failed to save profile to {:?}", store.path()))?;

    print_success(&format!("Saved profile '{}' ({})", name, description));
    Ok(())
}

/// Delete a profile
pub fn profile_delete(store: &mut ProfileStore, name: &str) -> Result<()> {
    if store.delete(name)? {
        print_success(&format!("Deleted profile '{}'", name));
    } else {
        print_warning(&format!("No profile named '{}'", name));
    }
    Ok(())
}

/// Open a relay session with a saved profile
pub async fn profile_use(
    store: &ProfileStore,
    config: &ClientConfig,
    name: &str,
) -> Result<SessionEnd> {
    let params = store.get(name)?.clone();
    connect_command(config, params.into()).await
}
