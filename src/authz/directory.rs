//! The directory-backed authorizer: the production implementation of the
//! authorization decision. Allow iff the required permission is a member of
//! the identity's grant set.

use std::time::Duration;

use tracing::trace;

use super::{Authorizable, Authorizer, AuthzError, Result};
use crate::directory::PermissionDirectory;

/// The default bound on the grant-set lookup. The check sits in the
/// request-serving hot path, so a hung directory must not hang the request
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(500);

/// An [`Authorizer`](super::Authorizer) that consults a
/// [`PermissionDirectory`](crate::directory::PermissionDirectory) for the
/// grant set of the identity being checked.
///
/// The check itself is stateless; clones share nothing but the underlying
/// directory handle, so any number of checks can run concurrently.
#[derive(Clone)]
pub struct DirectoryAuthorizer<D> {
    directory: D,
    lookup_timeout: Duration,
}

impl<D> DirectoryAuthorizer<D> {
    pub fn new(directory: D) -> Self {
        DirectoryAuthorizer {
            directory,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Overrides the grant-set lookup timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl<D> Authorizer for DirectoryAuthorizer<D>
where
    D: PermissionDirectory + Send + Sync,
{
    async fn authorize<A: Authorizable + Send + Sync>(
        &self,
        item: &A,
        required: &str,
    ) -> Result<()> {
        let login = item.login();
        let grants = tokio::time::timeout(
            self.lookup_timeout,
            self.directory.get_by_login(login),
        )
        .await
        .map_err(|_| AuthzError::Timeout {
            login: login.to_owned(),
        })??;

        if grants.contains(required) {
            trace!(%login, %required, "authorization granted");
            Ok(())
        } else {
            Err(AuthzError::denied(login, required))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::directory::memory::MemoryDirectory;
    use crate::directory::Result as DirectoryResult;
    use crate::Permission;

    use std::collections::BTreeSet;

    use rstest::rstest;

    struct Login(&'static str);

    impl Authorizable for Login {
        fn login(&self) -> &str {
            self.0
        }
    }

    fn authorizer() -> DirectoryAuthorizer<MemoryDirectory> {
        let directory = MemoryDirectory::builder()
            .permission("permission.list")
            .permission("permission.update")
            .grant("admin", "permission.list")
            .grant("admin", "permission.update")
            .build()
            .expect("directory should build");
        DirectoryAuthorizer::new(directory)
    }

    #[rstest]
    #[case::held("admin", "permission.list", true)]
    #[case::also_held("admin", "permission.update", true)]
    #[case::not_in_catalog("admin", "permission.delete", false)]
    #[case::no_grants("guest", "permission.list", false)]
    #[case::unknown_login("stranger", "permission.list", false)]
    #[tokio::test]
    async fn test_membership_decides(
        #[case] login: &'static str,
        #[case] required: &str,
        #[case] allowed: bool,
    ) {
        let res = authorizer().authorize(&Login(login), required).await;
        if allowed {
            res.expect("check should allow");
        } else {
            assert!(matches!(
                res.expect_err("check should deny"),
                AuthzError::Denied { .. }
            ));
        }
    }

    #[derive(Clone)]
    struct StalledDirectory;

    #[async_trait::async_trait]
    impl crate::directory::PermissionDirectory for StalledDirectory {
        async fn list(&self) -> DirectoryResult<Vec<Permission>> {
            Ok(Vec::new())
        }

        async fn get_by_login(&self, _login: &str) -> DirectoryResult<BTreeSet<String>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(BTreeSet::new())
        }
    }

    #[tokio::test]
    async fn test_slow_lookup_times_out() {
        let authz =
            DirectoryAuthorizer::new(StalledDirectory).with_timeout(Duration::from_millis(10));
        let err = authz
            .authorize(&Login("admin"), "permission.list")
            .await
            .expect_err("stalled lookup should time out");
        assert!(matches!(err, AuthzError::Timeout { .. }));
    }
}
