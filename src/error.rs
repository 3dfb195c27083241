//! Typed error kinds for the cataloger.
//!
//! `NoRepodata` is deliberately not a variant here: a missing
//! `repomd.xml` or missing database is not an error, it yields an empty catalog
//! (see [`crate::repomd::discover`]). `PerRowFailure` and `PerJarFailure` are not
//! variants either — those are logged via `log::warn!` and the pipeline continues,
//! they never produce an `Err`. Only the genuinely fatal kinds are represented.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("corrupt repodata metadata: {0}")]
    CorruptMetadata(String),

    #[error("failed to set up scratch directory: {0}")]
    TempSetupFailure(String),

    #[error("virtual filesystem error: {0}")]
    Vfs(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
