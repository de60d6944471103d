//! Granary is a permission directory service. It keeps a catalog of named
//! permissions and per-login grant sets, and serves both over an HTTP API that
//! is itself guarded by those permissions.
//!
//! The crate is split along the same seams as the server it runs:
//!
//! - [`directory`]: the `PermissionDirectory` trait and its in-memory and
//!   file-backed implementations
//! - [`authn`]: resolving request credentials to an identity (server feature)
//! - [`authz`]: deciding whether an identity holds a required permission
//!   (server feature)
//! - [`server`]: the warp HTTP frontend (server feature)
//! - [`client`]: a reqwest client for consuming the API (client feature)
//! - [`testing`]: fixtures for exercising the API in tests (test-tools
//!   feature)

#[cfg(feature = "server")]
pub mod authn;
#[cfg(feature = "server")]
pub mod authz;
#[cfg(feature = "client")]
pub mod client;
pub mod directory;
#[cfg(feature = "server")]
pub mod server;
#[cfg(feature = "test-tools")]
pub mod testing;

use serde::{Deserialize, Serialize};

/// The header carrying the identity token, e.g. `X-Authorization: Bearer <token>`
pub const X_AUTHORIZATION_HEADER: &str = "X-Authorization";

/// The header naming the permission a route demands. The route's own
/// requirement is authoritative; this header is validated against it when
/// present
pub const ROUTING_KEY_HEADER: &str = "Routing-Key";

/// The permission required to call either of the permission-listing endpoints
pub const PERMISSION_LIST: &str = "permission.list";

/// A named capability. Permissions are unique by name and immutable once
/// defined; the full set of them is owned by the directory catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(deny_unknown_fields)]
pub struct Permission {
    pub name: String,
}

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Permission { name: name.into() }
    }
}

/// A string error message returned from the server
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
