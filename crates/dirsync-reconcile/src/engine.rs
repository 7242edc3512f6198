//! Engine value and the state loader.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{info, warn};

use dirsync_client::{Directory, DirectoryApi};
use dirsync_core::{same_key, Error, Result};

use crate::desired::DesiredState;
use crate::model::{Group, Identity};
use crate::report::RunReport;

/// Owns the in-memory model for the duration of one run.
pub struct Engine<A> {
    pub(crate) directory: Directory<A>,
    pub(crate) identities: BTreeMap<String, Identity>,
    pub(crate) groups: BTreeMap<String, Group>,
    pub(crate) report: RunReport,
}

impl<A: DirectoryApi> Engine<A> {
    /// Pull the complete remote snapshot: identities, groups, memberships.
    ///
    /// Any failure here is fatal. A partial snapshot would make the sweep
    /// delete memberships and groups that merely failed to load.
    pub fn load(api: A) -> Result<Self> {
        let directory = Directory::new(api);

        let mut identities = BTreeMap::new();
        for record in directory
            .list_identities()
            .map_err(|e| Error::Api(format!("Failed to list identities: {}", e)))?
        {
            identities.insert(record.id.clone(), Identity::discovered(record));
        }

        let mut groups = BTreeMap::new();
        for record in directory
            .list_groups()
            .map_err(|e| Error::Api(format!("Failed to list groups: {}", e)))?
        {
            groups.insert(record.id.clone(), Group::new(record.id, record.name));
        }

        let mut memberships = 0;
        for identity_id in identities.keys() {
            let member_of = directory.groups_of(identity_id).map_err(|e| {
                Error::Api(format!("Failed to list groups of {}: {}", identity_id, e))
            })?;

            for remote in member_of {
                match groups.get_mut(&remote.id) {
                    Some(group) => {
                        group.members.insert(identity_id.clone(), false);
                        memberships += 1;
                    }
                    None => warn!(
                        "Identity {} is member of unlisted group {}, ignoring",
                        identity_id, remote.id
                    ),
                }
            }
        }

        info!(
            "Engine: {} identities, {} groups, {} memberships loaded",
            identities.len(),
            groups.len(),
            memberships
        );

        Ok(Self {
            directory,
            identities,
            groups,
            report: RunReport::new(),
        })
    }

    /// Reconcile a complete desired state and sweep.
    pub fn run(&mut self, desired: &DesiredState) -> Result<RunReport> {
        for identity in &desired.identities {
            self.reconcile_identity(identity)?;
        }
        for group in &desired.groups {
            self.reconcile_group(group);
        }
        Ok(self.sweep())
    }

    // ---------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------

    /// Identity id for a username, compared case-insensitively.
    pub fn lookup_identity(&self, username: &str) -> Option<String> {
        self.identities
            .values()
            .find(|identity| same_key(identity.username(), username))
            .map(|identity| identity.id().to_string())
    }

    /// Group id for a name, compared case-insensitively.
    pub fn lookup_group(&self, name: &str) -> Option<String> {
        self.groups
            .values()
            .find(|group| same_key(&group.name, name))
            .map(|group| group.id.clone())
    }

    pub fn identity(&self, id: &str) -> Option<&Identity> {
        self.identities.get(id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.identities.values()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }
}

impl<A> fmt::Display for Engine<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checked = self.identities.values().filter(|i| i.checked).count();
        let memberships: usize = self.groups.values().map(|g| g.members.len()).sum();
        write!(
            f,
            "Identities: {} ({} checked), Groups: {} ({} memberships)",
            self.identities.len(),
            checked,
            self.groups.len(),
            memberships
        )
    }
}
