//! A permit-everything authorizer for use when authorization is not desired or for development
//! environments
use super::{Authorizable, Authorizer, Result};

/// An anonymous user
#[derive(Debug, Clone)]
pub struct Anonymous;

impl Authorizable for Anonymous {
    fn login(&self) -> &str {
        "anonymous"
    }
}

/// An authorizer that always returns success
#[derive(Debug, Clone)]
pub struct AlwaysAuthorize;

#[async_trait::async_trait]
impl Authorizer for AlwaysAuthorize {
    async fn authorize<A: Authorizable + Send + Sync>(&self, _: &A, _: &str) -> Result<()> {
        Ok(())
    }
}
