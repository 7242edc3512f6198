//! In-memory model of the remote directory.

use std::collections::BTreeMap;

use dirsync_client::RemoteIdentity;

/// A remote identity plus its per-run mark.
#[derive(Debug, Clone)]
pub struct Identity {
    pub record: RemoteIdentity,
    /// Declared by this run's desired set. Unchecked identities are swept.
    pub checked: bool,
}

impl Identity {
    /// Identity found at load time, not yet confirmed.
    pub fn discovered(record: RemoteIdentity) -> Self {
        Self {
            record,
            checked: false,
        }
    }

    /// Identity created during this run.
    pub fn created(record: RemoteIdentity) -> Self {
        Self {
            record,
            checked: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn username(&self) -> &str {
        &self.record.username
    }
}

/// A remote group and its membership marks.
#[derive(Debug, Clone)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// identity id -> still desired in this run
    pub members: BTreeMap<String, bool>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members: BTreeMap::new(),
        }
    }

    /// Members not confirmed by any desired group.
    pub fn stale_members(&self) -> Vec<String> {
        self.members
            .iter()
            .filter(|(_, desired)| !**desired)
            .map(|(id, _)| id.clone())
            .collect()
    }
}
