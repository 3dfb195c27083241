//! Extracts `.jar` members from an RPM's CPIO payload.
//!
//! The `rpm` crate parses the lead and header and leaves the remainder of the
//! stream as the raw payload bytes in `Package.content`; because that field is
//! already fully materialized by the time `Package::parse` returns, there is
//! no second reader positioned over the same stream — a double-read bug
//! doesn't arise here in the first place.

use std::io::Read;
use std::path::{Path, PathBuf};

use liblzma::read::XzDecoder;

use crate::cpio;
use crate::error::{CatalogError, Result};

pub struct JarExtraction {
    pub jar_paths: Vec<PathBuf>,
}

pub fn extract_jars(mut rpm_reader: impl Read, target_dir: &Path) -> Result<JarExtraction> {
    let pkg = rpm::Package::parse(&mut rpm_reader)
        .map_err(|e| CatalogError::CorruptMetadata(format!("parsing RPM header: {e}")))?;

    let format = pkg
        .metadata
        .get_payload_format()
        .map_err(|e| CatalogError::CorruptMetadata(format!("missing payload format tag: {e}")))?;
    if format != "cpio" {
        return Err(CatalogError::CorruptMetadata(format!("unsupported RPM payload format {format}")));
    }

    let compressor = pkg.metadata.get_payload_compressor().unwrap_or("xz");
    let payload: Box<dyn Read> = match compressor {
        "xz" | "lzma" => Box::new(XzDecoder::new(pkg.content.as_slice())),
        other => {
            return Err(CatalogError::CorruptMetadata(format!(
                "unsupported RPM payload compressor {other}"
            )));
        }
    };

    let jar_paths = cpio::extract_jars(payload, target_dir)
        .map_err(|e| CatalogError::CorruptMetadata(format!("reading cpio payload: {e}")))?;

    Ok(JarExtraction { jar_paths })
}
