//! The `PermissionDirectory` trait definition and its implementations.
//!
//! A directory is the source of truth for two things: the catalog of
//! permissions defined in the system, and the grant set (the permission names
//! held) of each login. Directories are read-only from the perspective of this
//! crate; mutation, if any, happens out of band (for the file-backed
//! implementation, by editing the directory file and restarting).

pub mod file;
pub mod memory;

use std::collections::BTreeSet;

use thiserror::Error;

use crate::Permission;

/// A custom shorthand result type that always has an error type of
/// [`DirectoryError`](DirectoryError)
pub type Result<T> = core::result::Result<T, DirectoryError>;

/// The basic functionality required of a permission directory.
///
/// Implementations must be safe to query concurrently; every lookup is
/// independent and nothing here mutates.
#[async_trait::async_trait]
pub trait PermissionDirectory {
    /// Returns the full catalog of defined permissions, ordered by name
    async fn list(&self) -> Result<Vec<Permission>>;

    /// Returns the set of permission names granted to the given login.
    ///
    /// An unknown login is indistinguishable from a known login with no
    /// grants: both yield an empty set rather than an error
    async fn get_by_login(&self, login: &str) -> Result<BTreeSet<String>>;
}

/// DirectoryError describes the possible error states when loading and
/// querying a permission directory.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Any errors that occur due to IO issues. Contains the underlying IO `Error`
    #[error("directory could not be loaded: {0:?}")]
    Io(#[from] std::io::Error),
    /// The directory data cannot be properly deserialized from TOML
    #[error("directory is malformed: {0:?}")]
    Malformed(#[from] toml::de::Error),
    /// The same permission name was defined more than once in the catalog
    #[error("permission {0} is defined more than once")]
    DuplicatePermission(String),
    /// A grant references a permission name that does not exist in the catalog
    #[error("grant for {login} references undefined permission {name}")]
    UnknownPermission { login: String, name: String },
    /// A catch-all for uncategorized errors. Contains an error message
    /// describing the underlying issue
    #[error("{0}")]
    Other(String),
}
