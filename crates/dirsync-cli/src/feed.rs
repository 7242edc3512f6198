//! Desired-state feed loading.

use std::path::Path;

use tracing::info;

use dirsync_core::{Error, Result};
use dirsync_reconcile::DesiredState;

/// Read and parse a JSON desired-state document.
pub fn load(path: &Path) -> Result<DesiredState> {
    let data = std::fs::read_to_string(path)?;
    let state = parse(&data)?;
    info!(
        "Feed {}: {} identities, {} groups",
        path.display(),
        state.identities.len(),
        state.groups.len()
    );
    Ok(state)
}

pub fn parse(data: &str) -> Result<DesiredState> {
    let state: DesiredState = serde_json::from_str(data)?;

    if let Some(identity) = state.identities.iter().find(|i| i.username.trim().is_empty()) {
        return Err(Error::Feed(format!(
            "identity without username (email {:?})",
            identity.email
        )));
    }
    if state.groups.iter().any(|g| g.name.trim().is_empty()) {
        return Err(Error::Feed("group without name".into()));
    }

    Ok(state)
}
