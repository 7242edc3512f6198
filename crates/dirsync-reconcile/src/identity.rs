//! Identity reconciliation: find or create, fix drifted names, sync keys.

use tracing::{info, warn};

use dirsync_client::{DirectoryApi, NameUpdate, NewIdentity, NewKey};
use dirsync_core::{same_key, Error, Result};

use crate::credential::{self, Credential};
use crate::desired::DesiredIdentity;
use crate::engine::Engine;
use crate::model::Identity;

/// Creation attempts before the run is aborted.
pub const MAX_CREATE_ATTEMPTS: usize = 5;

impl<A: DirectoryApi> Engine<A> {
    /// Bring one identity in line with its desired record.
    ///
    /// Only fails when creation is impossible after every attempt, which
    /// means the directory is unusable and the run must stop before sweeping.
    pub fn reconcile_identity(&mut self, desired: &DesiredIdentity) -> Result<()> {
        let credentials = credential::parse_all(&desired.ssh_public_keys);

        if desired.email.trim().is_empty() {
            info!(
                "Identity {} ({} {}) skipped: no email address",
                desired.username, desired.firstname, desired.lastname
            );
            self.report.identities_skipped += 1;
            return Ok(());
        }

        let id = match self.lookup_identity(&desired.username) {
            Some(id) => {
                self.refresh_identity(&id, desired);
                id
            }
            None => self.create_identity(desired)?,
        };

        self.reconcile_keys(&id, &credentials);
        Ok(())
    }

    fn refresh_identity(&mut self, id: &str, desired: &DesiredIdentity) {
        let Some(identity) = self.identities.get_mut(id) else {
            return;
        };
        // Marked before anything below can fail.
        identity.checked = true;

        if same_key(&identity.record.firstname, &desired.firstname)
            && same_key(&identity.record.lastname, &desired.lastname)
        {
            return;
        }

        info!(
            "Updating identity {}: {} {}",
            desired.username, desired.firstname, desired.lastname
        );
        let update = NameUpdate {
            firstname: &desired.firstname,
            lastname: &desired.lastname,
        };
        match self.directory.update_identity(id, &update) {
            Ok(_) => {
                identity.record.firstname = desired.firstname.clone();
                identity.record.lastname = desired.lastname.clone();
                self.report.identities_updated += 1;
            }
            Err(e) => {
                warn!("Failed to update identity {}: {}", desired.username, e);
                self.report.failed_calls += 1;
            }
        }
    }

    fn create_identity(&mut self, desired: &DesiredIdentity) -> Result<String> {
        let mut email = desired.email.clone();

        for attempt in 0..MAX_CREATE_ATTEMPTS {
            if attempt > 0 {
                email = email_alias(&desired.email, attempt);
            }
            info!(
                "Adding identity {} <{}> (attempt {}/{})",
                desired.username,
                email,
                attempt + 1,
                MAX_CREATE_ATTEMPTS
            );

            let new = NewIdentity {
                username: &desired.username,
                email: &email,
                firstname: &desired.firstname,
                lastname: &desired.lastname,
            };
            match self.directory.create_identity(&new) {
                Ok(record) => {
                    let id = record.id.clone();
                    self.identities.insert(id.clone(), Identity::created(record));
                    self.report.identities_created += 1;
                    return Ok(id);
                }
                Err(e) => {
                    warn!("Failed to add identity {} <{}>: {}", desired.username, email, e);
                    self.report.failed_calls += 1;
                }
            }
        }

        Err(Error::Creation {
            username: desired.username.clone(),
            email,
        })
    }

    /// Make the remote key set equal the desired one by key material.
    fn reconcile_keys(&mut self, id: &str, desired: &[Credential]) {
        let Some(identity) = self.identities.get_mut(id) else {
            return;
        };
        let existing = identity.record.ssh_keys.clone();

        for credential in desired {
            if existing
                .iter()
                .any(|key| same_key(&key.public_key, &credential.public_key))
            {
                continue;
            }

            info!("Adding key {} to {}", credential.name, identity.record.username);
            let new = NewKey {
                public_key: &credential.public_key,
                name: &credential.name,
            };
            match self.directory.add_key(id, &new) {
                Ok(key) => {
                    identity.record.ssh_keys.push(key);
                    self.report.keys_added += 1;
                }
                Err(e) => {
                    warn!(
                        "Failed to add key {} to {}: {}",
                        credential.name, identity.record.username, e
                    );
                    self.report.failed_calls += 1;
                }
            }
        }

        for key in existing {
            if desired
                .iter()
                .any(|credential| same_key(&key.public_key, &credential.public_key))
            {
                continue;
            }

            info!("Deleting key {} from {}", key.name, identity.record.username);
            match self.directory.remove_key(id, &key.id) {
                Ok(_) => {
                    identity.record.ssh_keys.retain(|k| k.id != key.id);
                    self.report.keys_removed += 1;
                }
                Err(e) => {
                    warn!(
                        "Failed to delete key {} from {}: {}",
                        key.name, identity.record.username, e
                    );
                    self.report.failed_calls += 1;
                }
            }
        }
    }
}

/// `local+N@domain`, replacing any existing `+suffix` on the local part.
pub fn email_alias(email: &str, attempt: usize) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let base = local.split('+').next().unwrap_or(local);
            format!("{}+{}@{}", base, attempt, domain)
        }
        None => email.to_string(),
    }
}
