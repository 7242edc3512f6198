//! Group reconciliation: find or create, then add missing members.

use tracing::{info, warn};

use dirsync_client::{DirectoryApi, MembershipOp};

use crate::desired::DesiredGroup;
use crate::engine::Engine;
use crate::model::Group;

impl<A: DirectoryApi> Engine<A> {
    /// Ensure the group exists and confirm every resolvable member.
    pub fn reconcile_group(&mut self, desired: &DesiredGroup) {
        let group_id = match self.lookup_group(&desired.name) {
            Some(id) => id,
            None => {
                info!("Group {} does not yet exist", desired.name);
                match self.directory.create_group(&desired.name) {
                    Ok(record) => {
                        let name = if record.name.is_empty() {
                            desired.name.clone()
                        } else {
                            record.name
                        };
                        self.groups
                            .insert(record.id.clone(), Group::new(record.id.clone(), name));
                        self.report.groups_created += 1;
                        record.id
                    }
                    Err(e) => {
                        warn!("Failed to create group {}: {}", desired.name, e);
                        self.report.failed_calls += 1;
                        return;
                    }
                }
            }
        };

        for username in &desired.members {
            let Some(identity_id) = self.lookup_identity(username) else {
                info!(
                    "Member {} of group {} skipped: no such identity",
                    username, desired.name
                );
                self.report.members_unresolved += 1;
                continue;
            };

            let Some(group) = self.groups.get_mut(&group_id) else {
                return;
            };

            if !group.members.contains_key(&identity_id) {
                info!("Adding {} to group {}", username, desired.name);
                match self
                    .directory
                    .change_membership(&group_id, MembershipOp::Add, &identity_id)
                {
                    Ok(_) => self.report.memberships_added += 1,
                    Err(e) => {
                        warn!("Failed to add {} to group {}: {}", username, desired.name, e);
                        self.report.failed_calls += 1;
                    }
                }
            }

            group.members.insert(identity_id, true);
        }
    }
}
