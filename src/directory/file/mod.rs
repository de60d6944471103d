//! A `PermissionDirectory` backed by a TOML directory file.
//!
//! The file is read once at startup and validated against the grant/catalog
//! invariant; lookups are then served from memory. The expected shape:
//!
//! ```toml
//! [[permission]]
//! name = "permission.list"
//!
//! [[permission]]
//! name = "permission.update"
//!
//! [grants]
//! admin = ["permission.list", "permission.update"]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use super::memory::MemoryDirectory;
use super::{DirectoryError, PermissionDirectory, Result};
use crate::Permission;

/// The serialized form of a directory file
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DirectoryFile {
    #[serde(default, alias = "permissions")]
    permission: Vec<Permission>,
    #[serde(default)]
    grants: BTreeMap<String, BTreeSet<String>>,
}

/// A directory loaded from a TOML file. Lookups never touch the disk after
/// [`load`](FileDirectory::load) returns.
#[derive(Clone, Debug)]
pub struct FileDirectory {
    inner: MemoryDirectory,
}

impl FileDirectory {
    /// Reads and validates the directory file at the given path.
    ///
    /// Fails with [`DirectoryError::DuplicatePermission`] if the catalog
    /// defines a name twice and with [`DirectoryError::UnknownPermission`] if
    /// a grant names a permission missing from the catalog
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = tokio::fs::read(path.as_ref()).await?;
        let parsed: DirectoryFile = toml::from_slice(&raw)?;

        let mut seen = BTreeSet::new();
        let mut builder = MemoryDirectory::builder();
        for perm in &parsed.permission {
            if !seen.insert(perm.name.clone()) {
                return Err(DirectoryError::DuplicatePermission(perm.name.clone()));
            }
            builder = builder.permission(&perm.name);
        }
        let mut logins = 0;
        for (login, names) in &parsed.grants {
            logins += 1;
            for name in names {
                builder = builder.grant(login, name);
            }
        }

        let inner = builder.build()?;
        info!(
            path = %path.as_ref().display(),
            permissions = parsed.permission.len(),
            logins,
            "loaded permission directory"
        );
        Ok(FileDirectory { inner })
    }
}

#[async_trait::async_trait]
impl PermissionDirectory for FileDirectory {
    async fn list(&self) -> Result<Vec<Permission>> {
        debug!("listing permission catalog");
        self.inner.list().await
    }

    async fn get_by_login(&self, login: &str) -> Result<BTreeSet<String>> {
        debug!(%login, "fetching grant set");
        self.inner.get_by_login(login).await
    }
}
