//! In-memory directory service for engine tests.
//!
//! Routes requests by method and path the way the real API does, keeps the
//! resulting state, and records every call so tests can assert on traffic.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Value};

use dirsync_client::{
    ApiError, ApiResponse, ApiResult, DirectoryApi, Method, RemoteGroup, RemoteIdentity, RemoteKey,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    identities: BTreeMap<String, RemoteIdentity>,
    groups: BTreeMap<String, RemoteGroup>,
    /// group id -> identity ids
    members: BTreeMap<String, BTreeSet<String>>,
    next_id: u64,
    calls: Vec<Call>,
    /// (method, path prefix) pairs that answer 500
    failing: Vec<(Method, String)>,
}

impl State {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }
}

#[derive(Default)]
pub struct FakeDirectory {
    state: RefCell<State>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------
    // Seeding (not recorded as calls)
    // ---------------------------------------------------------------

    pub fn seed_identity(&self, username: &str, firstname: &str, lastname: &str, email: &str) -> String {
        let mut state = self.state.borrow_mut();
        let id = state.next("u");
        state.identities.insert(
            id.clone(),
            RemoteIdentity {
                id: id.clone(),
                username: username.into(),
                firstname: firstname.into(),
                lastname: lastname.into(),
                email: email.into(),
                ssh_keys: Vec::new(),
            },
        );
        id
    }

    pub fn seed_key(&self, identity_id: &str, public_key: &str, name: &str) -> String {
        let mut state = self.state.borrow_mut();
        let id = state.next("k");
        let key = RemoteKey {
            id: id.clone(),
            public_key: public_key.into(),
            name: name.into(),
        };
        state
            .identities
            .get_mut(identity_id)
            .expect("seeded identity")
            .ssh_keys
            .push(key);
        id
    }

    pub fn seed_group(&self, name: &str) -> String {
        let mut state = self.state.borrow_mut();
        let id = state.next("g");
        state.groups.insert(
            id.clone(),
            RemoteGroup {
                id: id.clone(),
                name: name.into(),
            },
        );
        state.members.insert(id.clone(), BTreeSet::new());
        id
    }

    pub fn seed_membership(&self, group_id: &str, identity_id: &str) {
        self.state
            .borrow_mut()
            .members
            .entry(group_id.to_string())
            .or_default()
            .insert(identity_id.to_string());
    }

    /// Remove an identity behind the engine's back.
    pub fn forget_identity(&self, identity_id: &str) {
        let mut state = self.state.borrow_mut();
        state.identities.remove(identity_id);
        for ids in state.members.values_mut() {
            ids.remove(identity_id);
        }
    }

    /// Make every later `method` call whose path starts with `prefix` fail.
    pub fn fail(&self, method: Method, prefix: &str) {
        self.state
            .borrow_mut()
            .failing
            .push((method, prefix.to_string()));
    }

    pub fn heal(&self) {
        self.state.borrow_mut().failing.clear();
    }

    // ---------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method.is_mutating())
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .borrow()
            .identities
            .values()
            .map(|i| i.username.to_lowercase())
            .collect();
        names.sort();
        names
    }

    pub fn identity_by_username(&self, username: &str) -> Option<RemoteIdentity> {
        self.state
            .borrow()
            .identities
            .values()
            .find(|i| i.username.eq_ignore_ascii_case(username))
            .cloned()
    }

    pub fn keys_of(&self, username: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .identity_by_username(username)
            .map(|i| i.ssh_keys.into_iter().map(|k| k.public_key).collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn group_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .state
            .borrow()
            .groups
            .values()
            .map(|g| g.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Usernames in a group, sorted. Empty if the group does not exist.
    pub fn members_of(&self, group_name: &str) -> Vec<String> {
        let state = self.state.borrow();
        let Some(group) = state.groups.values().find(|g| g.name == group_name) else {
            return Vec::new();
        };
        let mut names: Vec<String> = state
            .members
            .get(&group.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.identities.get(id))
                    .map(|i| i.username.clone())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    // ---------------------------------------------------------------
    // Routing
    // ---------------------------------------------------------------

    fn route(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<ApiResponse> {
        let mut state = self.state.borrow_mut();
        let (path, query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let field = |name: &str| {
            body.and_then(|b| b.get(name))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        match (method, segments.as_slice()) {
            (Method::Get, ["identities"]) => {
                let results: Vec<&RemoteIdentity> = state.identities.values().collect();
                Ok(json_response(json!({ "totalCount": results.len(), "results": results })))
            }
            (Method::Post, ["identities"]) => {
                let username = field("username");
                let email = field("email");
                let taken = state.identities.values().any(|i| {
                    i.username.eq_ignore_ascii_case(&username) || i.email.eq_ignore_ascii_case(&email)
                });
                if taken {
                    return Err(status(409, "duplicate username or email"));
                }
                let id = state.next("u");
                let record = RemoteIdentity {
                    id: id.clone(),
                    username,
                    firstname: field("firstname"),
                    lastname: field("lastname"),
                    email,
                    ssh_keys: Vec::new(),
                };
                state.identities.insert(id, record.clone());
                Ok(json_response(json!(record)))
            }
            (Method::Put, ["identities", id]) => {
                let firstname = field("firstname");
                let lastname = field("lastname");
                let identity = state.identities.get_mut(*id).ok_or_else(not_found)?;
                identity.firstname = firstname;
                identity.lastname = lastname;
                Ok(json_response(json!(identity)))
            }
            (Method::Delete, ["identities", id]) => {
                state.identities.remove(*id).ok_or_else(not_found)?;
                for ids in state.members.values_mut() {
                    ids.remove(*id);
                }
                Ok(ApiResponse::Empty)
            }
            (Method::Post, ["identities", id, "keys"]) => {
                let key_id = state.next("k");
                let key = RemoteKey {
                    id: key_id,
                    public_key: field("public_key"),
                    name: field("name"),
                };
                let identity = state.identities.get_mut(*id).ok_or_else(not_found)?;
                identity.ssh_keys.push(key.clone());
                Ok(json_response(json!(key)))
            }
            (Method::Delete, ["identities", id, "keys", key_id]) => {
                let identity = state.identities.get_mut(*id).ok_or_else(not_found)?;
                let before = identity.ssh_keys.len();
                identity.ssh_keys.retain(|k| k.id != *key_id);
                if identity.ssh_keys.len() == before {
                    return Err(not_found());
                }
                Ok(ApiResponse::Empty)
            }
            (Method::Get, ["groups"]) => {
                let groups: Vec<&RemoteGroup> = state.groups.values().collect();
                Ok(json_response(json!(groups)))
            }
            (Method::Get, ["groups", "memberof"]) => {
                let identity_id = query.strip_prefix("identity=").unwrap_or_default();
                // a membership may reference a group the listing does not show
                let groups: Vec<RemoteGroup> = state
                    .members
                    .iter()
                    .filter(|(_, ids)| ids.contains(identity_id))
                    .map(|(group_id, _)| {
                        state.groups.get(group_id).cloned().unwrap_or_else(|| RemoteGroup {
                            id: group_id.clone(),
                            name: String::new(),
                        })
                    })
                    .collect();
                Ok(json_response(json!(groups)))
            }
            (Method::Post, ["groups"]) => {
                let id = state.next("g");
                let group = RemoteGroup {
                    id: id.clone(),
                    name: field("name"),
                };
                state.groups.insert(id.clone(), group.clone());
                state.members.insert(id, BTreeSet::new());
                Ok(json_response(json!(group)))
            }
            (Method::Delete, ["groups", id]) => {
                state.groups.remove(*id).ok_or_else(not_found)?;
                state.members.remove(*id);
                Ok(ApiResponse::Empty)
            }
            (Method::Post, ["groups", id, "members"]) => {
                let member = field("id");
                let op = field("op");
                let ids = state.members.get_mut(*id).ok_or_else(not_found)?;
                match op.as_str() {
                    "add" => {
                        ids.insert(member);
                    }
                    "remove" => {
                        ids.remove(&member);
                    }
                    _ => return Err(status(400, "bad op")),
                }
                Ok(ApiResponse::Empty)
            }
            _ => Err(not_found()),
        }
    }
}

impl DirectoryApi for FakeDirectory {
    fn call(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResult<ApiResponse> {
        let failing = {
            let mut state = self.state.borrow_mut();
            state.calls.push(Call {
                method,
                path: path.to_string(),
                body: body.cloned(),
            });
            state
                .failing
                .iter()
                .any(|(m, prefix)| *m == method && path.starts_with(prefix.as_str()))
        };

        if failing {
            return Err(status(500, "injected failure"));
        }
        self.route(method, path, body)
    }
}

fn json_response(value: Value) -> ApiResponse {
    ApiResponse::Json(value)
}

fn status(code: u16, body: &str) -> ApiError {
    ApiError::Status {
        status: code,
        body: body.to_string(),
    }
}

fn not_found() -> ApiError {
    status(404, "not found")
}

pub fn identity(username: &str, first: &str, last: &str, email: &str, keys: &[&str]) -> dirsync_reconcile::DesiredIdentity {
    dirsync_reconcile::DesiredIdentity {
        username: username.into(),
        firstname: first.into(),
        lastname: last.into(),
        email: email.into(),
        ssh_public_keys: keys.iter().map(|k| k.to_string()).collect(),
    }
}

pub fn group(name: &str, members: &[&str]) -> dirsync_reconcile::DesiredGroup {
    dirsync_reconcile::DesiredGroup {
        name: name.into(),
        members: members.iter().map(|m| m.to_string()).collect(),
    }
}
