//! Discovers the three repodata SQLite databases referenced from
//! `repodata/repomd.xml`.

use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{CatalogError, Result};
use crate::vfs::Vfs;

#[derive(Debug, Default, Clone)]
pub struct RepodataEntry {
    pub bz2_path: Option<String>,
    pub unbz2_path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct RepodataFileList {
    pub primary: RepodataEntry,
    pub filelists: RepodataEntry,
    pub other: RepodataEntry,
}

impl RepodataFileList {
    fn is_complete(&self) -> bool {
        self.primary.bz2_path.is_some()
            && self.filelists.bz2_path.is_some()
            && self.other.bz2_path.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct Repomd {
    #[serde(rename = "data", default)]
    data: Vec<RepomdData>,
}

#[derive(Debug, Deserialize)]
struct RepomdData {
    #[serde(rename = "@type")]
    kind: String,
    location: RepomdLocation,
}

#[derive(Debug, Deserialize)]
struct RepomdLocation {
    #[serde(rename = "@href")]
    href: String,
}

/// Reads and parses `repodata/repomd.xml`, returning only `primary_db`,
/// `filelists_db`, and `other_db` entries. A missing
/// `repomd.xml` or an incomplete set of the three databases is not an error:
/// it yields `Ok(None)`, which callers treat as an empty catalog.
pub fn discover(vfs: &Vfs) -> Result<Option<RepodataFileList>> {
    let mut reader = match vfs.open_path("repodata/repomd.xml") {
        Ok(r) => r,
        Err(e) => {
            log::info!("repomd.xml not found: {e}");
            return Ok(None);
        }
    };

    let mut xml = String::new();
    reader
        .read_to_string(&mut xml)
        .map_err(|e| CatalogError::CorruptMetadata(format!("reading repomd.xml: {e}")))?;

    let repomd: Repomd = quick_xml::de::from_str(&xml)
        .map_err(|e| CatalogError::CorruptMetadata(format!("parsing repomd.xml: {e}")))?;

    let mut files = RepodataFileList::default();
    for data in repomd.data {
        let entry = RepodataEntry { bz2_path: Some(data.location.href), unbz2_path: None };
        match data.kind.as_str() {
            "primary_db" => files.primary = entry,
            "filelists_db" => files.filelists = entry,
            "other_db" => files.other = entry,
            other => log::debug!("ignoring repomd data type {other}"),
        }
    }

    if files.is_complete() {
        Ok(Some(files))
    } else {
        log::info!("repomd.xml present but missing one or more of primary/filelists/other db");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<repomd xmlns="http://linux.duke.edu/metadata/repo">
  <data type="primary_db">
    <location href="repodata/abc-primary.sqlite.bz2"/>
  </data>
  <data type="filelists_db">
    <location href="repodata/def-filelists.sqlite.bz2"/>
  </data>
  <data type="other_db">
    <location href="repodata/ghi-other.sqlite.bz2"/>
  </data>
  <data type="primary">
    <location href="repodata/abc-primary.xml.gz"/>
  </data>
</repomd>
"#;

    #[test]
    fn parses_the_three_sqlite_entries_and_ignores_the_rest() {
        let repomd: Repomd = quick_xml::de::from_str(SAMPLE).unwrap();
        assert_eq!(repomd.data.len(), 4);
        let primary = repomd.data.iter().find(|d| d.kind == "primary_db").unwrap();
        assert_eq!(primary.location.href, "repodata/abc-primary.sqlite.bz2");
    }
}
