//! Desired state supplied by the source of truth.

use serde::{Deserialize, Serialize};

/// One identity the directory should contain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredIdentity {
    pub username: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    /// Raw `<type> <material> <label>` lines.
    #[serde(default)]
    pub ssh_public_keys: Vec<String>,
}

/// One group and the usernames that should be in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredGroup {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Complete desired model for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesiredState {
    #[serde(default)]
    pub identities: Vec<DesiredIdentity>,
    #[serde(default)]
    pub groups: Vec<DesiredGroup>,
}
