//! Types and traits for use in authentication. This module is only available if the `server`
//! feature is enabled

pub mod always;
pub mod bearer;
pub mod http_basic;

use crate::authz::Authorizable;

/// A trait that can be implemented by any system able to resolve request credentials to an
/// identity
#[async_trait::async_trait]
pub trait Authenticator {
    /// The authorizable item type that is returned from the `authenticate` method
    type Item: Authorizable + Send + Sync + 'static;

    /// Authenticate the request given the arbitrary `auth_data`, returning an arbitrary error in
    /// case of a failure. This data will be the raw value of the `X-Authorization` header (for
    /// example `Bearer <token>` or `Basic <base64>`). A request that carried no credentials will
    /// pass an empty string
    async fn authenticate(&self, auth_data: &str) -> anyhow::Result<Self::Item>;
}
