//! Cleanup sweep: stale memberships, then empty groups, then unchecked
//! identities.

use tracing::{info, warn};

use dirsync_client::{DirectoryApi, MembershipOp};

use crate::engine::Engine;
use crate::report::RunReport;

impl<A: DirectoryApi> Engine<A> {
    /// Delete everything this run did not confirm. Call once, last.
    ///
    /// Stale members are dropped from the model only once their removal call
    /// succeeds, not unconditionally. A membership whose removal fails stays,
    /// so its group is not considered empty and survives. Deleting something that is already
    /// gone (404) counts as done.
    pub fn sweep(&mut self) -> RunReport {
        info!("Cleaning: {}", self);

        let mut deleted_groups = Vec::new();
        for (group_id, group) in self.groups.iter_mut() {
            for identity_id in group.stale_members() {
                info!("Removing {} from group {}", identity_id, group.name);
                match self
                    .directory
                    .change_membership(group_id, MembershipOp::Remove, &identity_id)
                {
                    Ok(_) => {
                        group.members.remove(&identity_id);
                        self.report.memberships_removed += 1;
                    }
                    Err(e) => {
                        warn!("Failed to remove {} from group {}: {}", identity_id, group.name, e);
                        self.report.failed_calls += 1;
                    }
                }
            }

            if group.members.is_empty() {
                info!("Deleting group {} ({})", group.name, group_id);
                match self.directory.delete_group(group_id) {
                    Ok(_) => {
                        deleted_groups.push(group_id.clone());
                        self.report.groups_deleted += 1;
                    }
                    Err(e) if e.is_not_found() => {
                        info!("Group {} already gone", group.name);
                        deleted_groups.push(group_id.clone());
                    }
                    Err(e) => {
                        warn!("Failed to delete group {}: {}", group.name, e);
                        self.report.failed_calls += 1;
                    }
                }
            }
        }
        for group_id in deleted_groups {
            self.groups.remove(&group_id);
        }

        let mut deleted_identities = Vec::new();
        for (identity_id, identity) in &self.identities {
            if identity.checked {
                continue;
            }
            info!("Deleting identity {} ({})", identity.username(), identity_id);
            match self.directory.delete_identity(identity_id) {
                Ok(_) => {
                    deleted_identities.push(identity_id.clone());
                    self.report.identities_deleted += 1;
                }
                Err(e) if e.is_not_found() => {
                    info!("Identity {} already gone", identity.username());
                    deleted_identities.push(identity_id.clone());
                }
                Err(e) => {
                    warn!("Failed to delete identity {}: {}", identity.username(), e);
                    self.report.failed_calls += 1;
                }
            }
        }
        for identity_id in deleted_identities {
            self.identities.remove(&identity_id);
        }

        self.report.finished_at = Some(chrono::Utc::now());
        info!("Run complete: {}", self.report);
        self.report.clone()
    }
}
