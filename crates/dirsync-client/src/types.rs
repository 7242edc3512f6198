//! Record shapes exchanged with the directory API.

use serde::{Deserialize, Serialize};

/// Identity record as returned by the directory.
///
/// The identifier may arrive as `id`, `_id` or both; `id` wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawIdentity")]
pub struct RemoteIdentity {
    pub id: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub ssh_keys: Vec<RemoteKey>,
}

/// Public key attached to an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawKey")]
pub struct RemoteKey {
    pub id: String,
    pub public_key: String,
    pub name: String,
}

/// Group record as returned by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGroup")]
pub struct RemoteGroup {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
struct RawIdentity {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    underscore_id: Option<String>,
    username: String,
    #[serde(default)]
    firstname: String,
    #[serde(default)]
    lastname: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    ssh_keys: Option<Vec<RemoteKey>>,
    #[serde(default)]
    keys: Option<Vec<RemoteKey>>,
}

#[derive(Deserialize)]
struct RawKey {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    underscore_id: Option<String>,
    public_key: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct RawGroup {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    underscore_id: Option<String>,
    #[serde(default)]
    name: String,
}

/// `id` if present and non-empty, else `_id`.
fn pick_id(id: Option<String>, underscore_id: Option<String>, kind: &str) -> Result<String, String> {
    id.filter(|v| !v.is_empty())
        .or(underscore_id.filter(|v| !v.is_empty()))
        .ok_or_else(|| format!("{} record without id or _id", kind))
}

impl TryFrom<RawIdentity> for RemoteIdentity {
    type Error = String;

    fn try_from(raw: RawIdentity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: pick_id(raw.id, raw.underscore_id, "identity")?,
            username: raw.username,
            firstname: raw.firstname,
            lastname: raw.lastname,
            email: raw.email,
            ssh_keys: raw.ssh_keys.or(raw.keys).unwrap_or_default(),
        })
    }
}

impl TryFrom<RawKey> for RemoteKey {
    type Error = String;

    fn try_from(raw: RawKey) -> Result<Self, Self::Error> {
        Ok(Self {
            id: pick_id(raw.id, raw.underscore_id, "key")?,
            public_key: raw.public_key,
            name: raw.name,
        })
    }
}

impl TryFrom<RawGroup> for RemoteGroup {
    type Error = String;

    fn try_from(raw: RawGroup) -> Result<Self, Self::Error> {
        Ok(Self {
            id: pick_id(raw.id, raw.underscore_id, "group")?,
            name: raw.name,
        })
    }
}

/// Body of `POST /identities`.
#[derive(Debug, Clone, Serialize)]
pub struct NewIdentity<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub firstname: &'a str,
    pub lastname: &'a str,
}

/// Body of `PUT /identities/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct NameUpdate<'a> {
    pub firstname: &'a str,
    pub lastname: &'a str,
}

/// Body of `POST /identities/{id}/keys`.
#[derive(Debug, Clone, Serialize)]
pub struct NewKey<'a> {
    pub public_key: &'a str,
    pub name: &'a str,
}

/// Body of `POST /groups`.
#[derive(Debug, Clone, Serialize)]
pub struct NewGroup<'a> {
    pub name: &'a str,
}

/// Membership operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipOp {
    Add,
    Remove,
}

/// Body of `POST /groups/{id}/members`.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipChange<'a> {
    pub op: MembershipOp,
    #[serde(rename = "type")]
    pub member_type: &'static str,
    pub id: &'a str,
}

impl<'a> MembershipChange<'a> {
    pub fn user(op: MembershipOp, id: &'a str) -> Self {
        Self {
            op,
            member_type: "user",
            id,
        }
    }
}
