//! Remote directory API gateway.
//!
//! [`DirectoryApi`] is the single seam to the remote service: one call per
//! request, typed success or typed failure, never a panic. [`HttpGateway`]
//! implements it over reqwest; [`Directory`] layers the typed endpoints and
//! record shapes on top of any implementation.

pub mod directory;
pub mod gateway;
pub mod http;
pub mod types;

pub use directory::Directory;
pub use gateway::{ApiError, ApiResponse, ApiResult, DirectoryApi, Method};
pub use http::HttpGateway;
pub use types::*;
