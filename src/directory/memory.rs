//! An in-memory `PermissionDirectory` for testing and embedded use.
//!
//! The directory is built once through [`MemoryDirectoryBuilder`] and is
//! immutable afterwards, so clones share the data through an `Arc` and lookups
//! never contend.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::{DirectoryError, PermissionDirectory, Result};
use crate::Permission;

#[derive(Clone, Default, Debug)]
pub struct MemoryDirectory {
    inner: Arc<Inner>,
}

#[derive(Default, Debug)]
struct Inner {
    // Keyed by name, which keeps the catalog ordered and unique
    catalog: BTreeMap<String, Permission>,
    grants: BTreeMap<String, BTreeSet<String>>,
}

impl MemoryDirectory {
    pub fn builder() -> MemoryDirectoryBuilder {
        MemoryDirectoryBuilder::default()
    }
}

#[async_trait::async_trait]
impl PermissionDirectory for MemoryDirectory {
    async fn list(&self) -> Result<Vec<Permission>> {
        Ok(self.inner.catalog.values().cloned().collect())
    }

    async fn get_by_login(&self, login: &str) -> Result<BTreeSet<String>> {
        Ok(self.inner.grants.get(login).cloned().unwrap_or_default())
    }
}

/// Builder for a [`MemoryDirectory`](MemoryDirectory). Grants may be added in
/// any order relative to permissions; the grant/catalog invariant is checked
/// once at [`build`](MemoryDirectoryBuilder::build) time.
#[derive(Default)]
pub struct MemoryDirectoryBuilder {
    catalog: BTreeMap<String, Permission>,
    grants: BTreeMap<String, BTreeSet<String>>,
}

impl MemoryDirectoryBuilder {
    /// Defines a permission in the catalog
    pub fn permission(mut self, name: &str) -> Self {
        self.catalog
            .insert(name.to_owned(), Permission::new(name));
        self
    }

    /// Grants the named permission to the given login
    pub fn grant(mut self, login: &str, name: &str) -> Self {
        self.grants
            .entry(login.to_owned())
            .or_default()
            .insert(name.to_owned());
        self
    }

    /// Validates that every granted name exists in the catalog and returns the
    /// finished directory
    pub fn build(self) -> Result<MemoryDirectory> {
        for (login, names) in &self.grants {
            for name in names {
                if !self.catalog.contains_key(name) {
                    return Err(DirectoryError::UnknownPermission {
                        login: login.clone(),
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(MemoryDirectory {
            inner: Arc::new(Inner {
                catalog: self.catalog,
                grants: self.grants,
            }),
        })
    }
}
