//! Typed endpoints over a [`DirectoryApi`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::gateway::{ApiError, ApiResponse, ApiResult, DirectoryApi, Method};
use crate::types::*;

/// Typed access to the directory's identity, group and membership endpoints.
///
/// Every response is validated here: a record missing a required field
/// becomes [`ApiError::Decode`] instead of reaching the caller half-formed.
pub struct Directory<A> {
    api: A,
}

impl<A: DirectoryApi> Directory<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    pub fn list_identities(&self) -> ApiResult<Vec<RemoteIdentity>> {
        let response = self.api.call(Method::Get, "/identities", None)?;
        decode_list(response, "identity list")
    }

    pub fn list_groups(&self) -> ApiResult<Vec<RemoteGroup>> {
        let response = self.api.call(Method::Get, "/groups", None)?;
        decode_list(response, "group list")
    }

    /// Groups that contain the given identity.
    pub fn groups_of(&self, identity_id: &str) -> ApiResult<Vec<RemoteGroup>> {
        let path = format!("/groups/memberof?identity={}", identity_id);
        let response = self.api.call(Method::Get, &path, None)?;
        decode_list(response, "membership list")
    }

    // ---------------------------------------------------------------
    // Identities
    // ---------------------------------------------------------------

    pub fn create_identity(&self, new: &NewIdentity<'_>) -> ApiResult<RemoteIdentity> {
        let response = self.send(Method::Post, "/identities", Some(new))?;
        decode_record(response, "identity")
    }

    pub fn update_identity(&self, id: &str, update: &NameUpdate<'_>) -> ApiResult<ApiResponse> {
        self.send(Method::Put, &format!("/identities/{}", id), Some(update))
    }

    pub fn delete_identity(&self, id: &str) -> ApiResult<ApiResponse> {
        self.api.call(Method::Delete, &format!("/identities/{}", id), None)
    }

    pub fn add_key(&self, identity_id: &str, key: &NewKey<'_>) -> ApiResult<RemoteKey> {
        let path = format!("/identities/{}/keys", identity_id);
        let response = self.send(Method::Post, &path, Some(key))?;
        decode_record(response, "key")
    }

    pub fn remove_key(&self, identity_id: &str, key_id: &str) -> ApiResult<ApiResponse> {
        let path = format!("/identities/{}/keys/{}", identity_id, key_id);
        self.api.call(Method::Delete, &path, None)
    }

    // ---------------------------------------------------------------
    // Groups
    // ---------------------------------------------------------------

    pub fn create_group(&self, name: &str) -> ApiResult<RemoteGroup> {
        let response = self.send(Method::Post, "/groups", Some(&NewGroup { name }))?;
        decode_record(response, "group")
    }

    pub fn delete_group(&self, id: &str) -> ApiResult<ApiResponse> {
        self.api.call(Method::Delete, &format!("/groups/{}", id), None)
    }

    pub fn change_membership(
        &self,
        group_id: &str,
        op: MembershipOp,
        identity_id: &str,
    ) -> ApiResult<ApiResponse> {
        let path = format!("/groups/{}/members", group_id);
        self.send(Method::Post, &path, Some(&MembershipChange::user(op, identity_id)))
    }

    fn send<B: Serialize>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<ApiResponse> {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::decode("request", e.to_string()))?;
        self.api.call(method, path, body.as_ref())
    }
}

/// Decode a listing, bare (`[...]`) or wrapped (`{"results": [...]}`).
fn decode_list<T: DeserializeOwned>(response: ApiResponse, context: &str) -> ApiResult<Vec<T>> {
    let value = response
        .into_json()
        .ok_or_else(|| ApiError::decode(context, "no JSON body"))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => return Err(ApiError::decode(context, "object without a results array")),
        },
        other => return Err(ApiError::decode(context, format!("not a list: {}", other))),
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| ApiError::decode(context, e.to_string())))
        .collect()
}

fn decode_record<T: DeserializeOwned>(response: ApiResponse, context: &str) -> ApiResult<T> {
    let value = response
        .into_json()
        .ok_or_else(|| ApiError::decode(context, "no JSON body"))?;
    serde_json::from_value(value).map_err(|e| ApiError::decode(context, e.to_string()))
}
