//! Per-run counters.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a run changed, and what it could not.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    pub identities_created: usize,
    pub identities_updated: usize,
    pub identities_deleted: usize,
    pub identities_skipped: usize,
    pub keys_added: usize,
    pub keys_removed: usize,
    pub groups_created: usize,
    pub groups_deleted: usize,
    pub memberships_added: usize,
    pub memberships_removed: usize,
    pub members_unresolved: usize,
    pub failed_calls: usize,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            identities_created: 0,
            identities_updated: 0,
            identities_deleted: 0,
            identities_skipped: 0,
            keys_added: 0,
            keys_removed: 0,
            groups_created: 0,
            groups_deleted: 0,
            memberships_added: 0,
            memberships_removed: 0,
            members_unresolved: 0,
            failed_calls: 0,
        }
    }

    /// Number of successful mutations.
    pub fn changes(&self) -> usize {
        self.identities_created
            + self.identities_updated
            + self.identities_deleted
            + self.keys_added
            + self.keys_removed
            + self.groups_created
            + self.groups_deleted
            + self.memberships_added
            + self.memberships_removed
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "identities +{} ~{} -{} (skipped {}), keys +{} -{}, groups +{} -{}, memberships +{} -{}, unresolved members {}, failed calls {}",
            self.identities_created,
            self.identities_updated,
            self.identities_deleted,
            self.identities_skipped,
            self.keys_added,
            self.keys_removed,
            self.groups_created,
            self.groups_deleted,
            self.memberships_added,
            self.memberships_removed,
            self.members_unresolved,
            self.failed_calls,
        )
    }
}
