//! Decompresses the three bz2-compressed repodata SQLite databases into a
//! scratch directory.
//!
//! The scratch directory is an RAII `tempfile::TempDir` guard, so cleanup is
//! wired up before any fallible step runs, rather
//! than via a manually-called cleanup function.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use bzip2::read::BzDecoder;

use crate::error::{CatalogError, Result};
use crate::repomd::RepodataFileList;
use crate::vfs::Vfs;

/// Hard cap on decompressed bytes per database, guarding against decompression bombs.
const MAX_DECOMPRESSED_BYTES: u64 = 4 * 1024 * 1024 * 1024;

pub struct ScratchDir {
    dir: tempfile::TempDir,
}

impl ScratchDir {
    pub fn new(prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("{prefix}-"))
            .tempdir()
            .map_err(|e| CatalogError::TempSetupFailure(e.to_string()))?;
        fs::create_dir_all(dir.path().join("repodata"))
            .map_err(|e| CatalogError::TempSetupFailure(e.to_string()))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Decompresses `files.primary`, `.filelists`, and `.other` in place, filling
/// in each `unbz2_path`.
pub fn decompress_all(vfs: &Vfs, files: &mut RepodataFileList, scratch: &ScratchDir) -> Result<()> {
    for entry in [&mut files.primary, &mut files.filelists, &mut files.other] {
        let bz2_path = entry
            .bz2_path
            .clone()
            .ok_or_else(|| CatalogError::CorruptMetadata("repomd entry missing location".into()))?;
        entry.unbz2_path = Some(decompress_one(vfs, &bz2_path, scratch.path())?);
    }
    Ok(())
}

fn decompress_one(vfs: &Vfs, bz2_path: &str, scratch_root: &Path) -> Result<PathBuf> {
    let basename = Path::new(bz2_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CatalogError::CorruptMetadata(format!("unusable repodata path {bz2_path}")))?;
    let out_path = scratch_root.join("repodata").join(basename);

    let reader = vfs
        .open_path(bz2_path)
        .map_err(|e| CatalogError::CorruptMetadata(format!("opening {bz2_path}: {e}")))?;
    let mut decoder = BzDecoder::new(reader);
    let mut out = File::create(&out_path)
        .map_err(|e| CatalogError::CorruptMetadata(format!("creating {out_path:?}: {e}")))?;

    let written = copy_capped(&mut decoder, &mut out, MAX_DECOMPRESSED_BYTES)
        .map_err(|e| CatalogError::CorruptMetadata(format!("decompressing {bz2_path}: {e}")))?;
    log::debug!("decompressed {bz2_path} to {out_path:?} ({written} bytes)");

    Ok(out_path)
}

fn copy_capped<R: Read, W: Write>(reader: &mut R, writer: &mut W, cap: u64) -> io::Result<u64> {
    let mut buf = [0u8; 64 * 1024];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        total += n as u64;
        if total > cap {
            return Err(io::Error::other("decompressed payload exceeds the safety cap"));
        }
        writer.write_all(&buf[..n])?;
    }
    Ok(total)
}
