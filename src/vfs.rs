//! Unified file access over an ISO9660 image or an already-extracted directory
//! tree.
//!
//! Paths are always given in POSIX form (`/`-separated) relative to the medium
//! root, even in directory mode on non-POSIX hosts — translating separators
//! for the host filesystem is out of scope.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::{CatalogError, Result};

/// The two media shapes this cataloger accepts.
pub enum IsoSource {
    ImageFile { path: PathBuf },
    Directory { root: PathBuf },
}

impl IsoSource {
    /// Detects the medium shape at `path`: a single root-level regular file
    /// whose name ends in `iso` is treated as an image; anything else
    /// (including a directory holding more than one entry, or one entry that
    /// isn't an `.iso` file) is treated as an already-mounted directory tree.
    pub fn detect(path: &Path) -> Result<Self> {
        if path.is_file() {
            return Ok(if is_iso_name(path) {
                IsoSource::ImageFile { path: path.to_path_buf() }
            } else {
                IsoSource::Directory { root: path.to_path_buf() }
            });
        }

        let mut only_entry = None;
        let mut count = 0;
        for entry in std::fs::read_dir(path).map_err(|e| CatalogError::Vfs(e.to_string()))? {
            let entry = entry.map_err(|e| CatalogError::Vfs(e.to_string()))?;
            count += 1;
            if count > 1 {
                return Ok(IsoSource::Directory { root: path.to_path_buf() });
            }
            only_entry = Some(entry);
        }

        match only_entry {
            Some(entry)
                if entry.file_type().map(|t| t.is_file()).unwrap_or(false)
                    && is_iso_name(&entry.path()) =>
            {
                Ok(IsoSource::ImageFile { path: entry.path() })
            }
            _ => Ok(IsoSource::Directory { root: path.to_path_buf() }),
        }
    }
}

fn is_iso_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("iso"))
}

/// Reads from either an ISO9660 image or a plain directory tree through the
/// same `open_path` call.
pub enum Vfs {
    Image { image: cdfs::ISO9660<File> },
    Directory { root: PathBuf },
}

impl Vfs {
    pub fn open(source: IsoSource) -> Result<Self> {
        match source {
            IsoSource::ImageFile { path } => {
                let file =
                    File::open(&path).map_err(|e| CatalogError::Vfs(format!("opening {path:?}: {e}")))?;
                let image = cdfs::ISO9660::new(file).map_err(|e| CatalogError::Vfs(e.to_string()))?;
                Ok(Vfs::Image { image })
            }
            IsoSource::Directory { root } => Ok(Vfs::Directory { root }),
        }
    }

    /// Opens `relative_path` (POSIX-separated, relative to the medium root)
    /// for reading.
    pub fn open_path(&self, relative_path: &str) -> Result<Box<dyn Read>> {
        match self {
            Vfs::Image { image } => {
                let full = format!("/{}", relative_path.trim_start_matches('/'));
                let entry = image
                    .open(&full)
                    .map_err(|e| CatalogError::Vfs(e.to_string()))?
                    .ok_or_else(|| CatalogError::Vfs(format!("{full} not found on image")))?;
                match entry {
                    cdfs::ISO9660Entry::File(mut file) => {
                        let mut buf = Vec::new();
                        file.read_to_end(&mut buf)
                            .map_err(|e| CatalogError::Vfs(format!("reading {full}: {e}")))?;
                        Ok(Box::new(Cursor::new(buf)))
                    }
                    cdfs::ISO9660Entry::Directory(_) => {
                        Err(CatalogError::Vfs(format!("{full} is a directory")))
                    }
                }
            }
            Vfs::Directory { root } => {
                let full = root.join(relative_path);
                Ok(Box::new(
                    File::open(&full).map_err(|e| CatalogError::Vfs(format!("opening {full:?}: {e}")))?,
                ))
            }
        }
    }

    /// Present for parity with a `close(reader)` operation on the VFS; in
    /// Rust the reader's `Drop` impl already releases any held resources, so
    /// this is a no-op beyond making the intent explicit at call sites.
    pub fn close(_reader: Box<dyn Read>) {}
}
