//! # repodata-cataloger
//!
//! Catalogs RPM packages and embedded JAR artifacts from an RPM-based Linux
//! installation medium, by reading its `repodata/` metadata directly rather
//! than invoking `rpm`/`createrepo` tooling.
//!
//! Given an ISO9660 image or an already-mounted directory tree, the cataloger:
//!
//! 1. Locates and parses `repodata/repomd.xml` ([`repomd`]).
//! 2. Decompresses the three bzip2-framed SQLite databases it references
//!    ([`decompress`]).
//! 3. Runs SQL queries against them to recover package rows, `mvn(...)`
//!    Maven provides, and JAR filelists ([`query`], [`maven_coord`]).
//! 4. For RPMs with embedded JARs, extracts the xz/cpio payload and computes
//!    SHA-1 digests ([`rpm_payload`], [`cpio`]).
//! 5. Assembles `Package` and `Relationship` records ([`package`]) and
//!    partitions generated PURLs into internal vs. external references
//!    ([`external_ref`]).
//!
//! ```rust,no_run
//! use repodata_cataloger::{catalog, CatalogerConfig};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = CatalogerConfig::default();
//! let result = catalog(Path::new("/mnt/dvd"), &config)?;
//! println!("cataloged {} packages", result.packages.len());
//! # Ok(())
//! # }
//! ```

pub mod cataloger;
pub mod cli;
pub mod config;
pub mod cpio;
pub mod decompress;
pub mod error;
pub mod external_ref;
pub mod hash;
pub mod maven_coord;
pub mod package;
pub mod purl;
pub mod query;
pub mod repomd;
pub mod rpm_payload;
pub mod vfs;

/// Synthetic repodata fixture builder shared by unit tests and
/// `tests/cataloger_integration.rs`. Not gated behind `#[cfg(test)]` because
/// integration tests link the crate as an ordinary dependency and can't see
/// test-only items; kept out of the crate's public-facing documentation
/// surface by convention rather than by visibility.
pub mod testutil;

pub use cataloger::{catalog, CatalogResult};
pub use config::CatalogerConfig;
pub use error::{CatalogError, Result};
pub use package::{Package, Relationship};
