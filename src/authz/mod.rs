//! Types and traits for use in authorization. This module is only available if the `server` feature
//! is enabled

pub mod always;
pub mod directory;

use thiserror::Error;

/// A custom shorthand result type for [`Authorizer`](Authorizer) implementations
pub type Result<T> = core::result::Result<T, AuthzError>;

/// Describes why an authorization check did not succeed.
///
/// Only `Denied` is a decision; the other variants are infrastructure faults
/// and surface as server errors rather than as an access-denied outcome.
#[derive(Error, Debug)]
pub enum AuthzError {
    /// The identity is valid but does not hold the required permission
    #[error("principal {login} does not hold {required}")]
    Denied { login: String, required: String },
    /// The grant-set lookup did not complete within the configured timeout
    #[error("permission lookup for {login} timed out")]
    Timeout { login: String },
    /// The directory failed while resolving the grant set
    #[error(transparent)]
    Directory(#[from] crate::directory::DirectoryError),
}

impl AuthzError {
    pub(crate) fn denied(login: &str, required: &str) -> Self {
        AuthzError::Denied {
            login: login.to_owned(),
            required: required.to_owned(),
        }
    }
}

/// A trait that can be implemented on any type (such as a custom `User` or token type) so that it
/// can be authorized by an [`Authorizer`](Authorizer)
pub trait Authorizable {
    /// Returns the unique login of the authenticated identity
    fn login(&self) -> &str;
}

/// A trait for any system that can authorize an [`Authorizable`](Authorizable) type against a
/// required permission name
#[async_trait::async_trait]
pub trait Authorizer {
    /// Decides whether `item` may perform an operation demanding the named permission. Allow is
    /// `Ok(())`; a denial (or an infrastructure fault during the check) is the error
    async fn authorize<A: Authorizable + Send + Sync>(&self, item: &A, required: &str)
        -> Result<()>;
}
