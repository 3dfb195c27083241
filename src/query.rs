//! SQL queries over the three decompressed repodata SQLite databases.
//! The SQL text here is load-bearing — these are the exact
//! shapes the repodata schema requires, not a convenience rewrite.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::error::{CatalogError, Result};
use crate::maven_coord::{self, MavenCoord};
use crate::repomd::RepodataFileList;

pub struct Databases {
    pub primary: Connection,
    pub filelists: Connection,
}

#[derive(Debug, Clone)]
pub struct PackageRow {
    pub pkg_id: String,
    pub pkg_key: i64,
    pub name: String,
    pub arch: String,
    pub version: String,
    pub epoch: Option<i64>,
    pub release: String,
    pub summary: String,
    pub description: String,
    pub source_rpm: String,
    pub vendor: String,
    pub packager: String,
    pub license: String,
    pub size_installed: i64,
    pub homepage: String,
    pub checksum_type: String,
    pub location_href: String,
}

#[derive(Debug, Clone)]
pub struct DependencyEdge {
    pub from_name: String,
    pub from_version: String,
    pub to_name: String,
    pub to_version: String,
}

impl Databases {
    pub fn open(files: &RepodataFileList) -> Result<Self> {
        let open = |path: &Path| -> Result<Connection> {
            Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
                .map_err(|e| CatalogError::CorruptMetadata(format!("opening {path:?}: {e}")))
        };
        let primary_path = files
            .primary
            .unbz2_path
            .as_deref()
            .ok_or_else(|| CatalogError::CorruptMetadata("primary.sqlite not decompressed".into()))?;
        let filelists_path = files
            .filelists
            .unbz2_path
            .as_deref()
            .ok_or_else(|| CatalogError::CorruptMetadata("filelists.sqlite not decompressed".into()))?;
        Ok(Self { primary: open(primary_path)?, filelists: open(filelists_path)? })
    }

    /// `packages` rows from `primary.sqlite`.
    pub fn packages(&self) -> Result<Vec<PackageRow>> {
        let mut stmt = self
            .primary
            .prepare(
                "SELECT pkgId, pkgKey, name, arch, version, epoch, release, \
                 IFNULL(summary,''), IFNULL(description,''), rpm_sourcerpm, \
                 rpm_vendor, IFNULL(rpm_packager,''), rpm_license, \
                 size_installed, IFNULL(url,''), checksum_type, location_href \
                 FROM packages",
            )
            .map_err(|e| CatalogError::CorruptMetadata(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let epoch_text: Option<String> = row.get(5)?;
                Ok(PackageRow {
                    pkg_id: row.get(0)?,
                    pkg_key: row.get(1)?,
                    name: row.get(2)?,
                    arch: row.get(3)?,
                    version: row.get(4)?,
                    epoch: epoch_text
                        .filter(|s| !s.is_empty())
                        .map(|s| s.parse::<i64>().unwrap_or(0)),
                    release: row.get(6)?,
                    summary: row.get(7)?,
                    description: row.get(8)?,
                    source_rpm: row.get(9)?,
                    vendor: row.get(10)?,
                    packager: row.get(11)?,
                    license: row.get(12)?,
                    size_installed: row.get(13)?,
                    homepage: row.get(14)?,
                    checksum_type: row.get(15)?,
                    location_href: row.get(16)?,
                })
            })
            .map_err(|e| CatalogError::CorruptMetadata(e.to_string()))?;

        let mut out = Vec::new();
        for row in rows {
            match row {
                Ok(r) => out.push(r),
                Err(e) => log::warn!("skipping malformed packages row: {e}"),
            }
        }
        Ok(out)
    }

    /// Maven coordinates a package advertises via `mvn(...)` provides.
    pub fn maven_provides(&self, pkg_key: i64, rpm_version: &str) -> Result<Vec<MavenCoord>> {
        let mut stmt = self
            .primary
            .prepare(
                "SELECT name, IFNULL(version,'') FROM provides \
                 WHERE pkgKey = ?1 \
                   AND name LIKE 'mvn(%' \
                   AND name NOT LIKE '%:pom:%' \
                   AND name NOT LIKE '%:xml:%' \
                   AND name NOT LIKE '%:sources:%' \
                   AND name NOT LIKE '%:sources-feature:%'",
            )
            .map_err(|e| CatalogError::CorruptMetadata(e.to_string()))?;

        let rows = stmt
            .query_map([pkg_key], |row| {
                let name: String = row.get(0)?;
                let provides_version: String = row.get(1)?;
                Ok((name, provides_version))
            })
            .map_err(|e| CatalogError::CorruptMetadata(e.to_string()))?;

        let mut dedup: HashMap<String, MavenCoord> = HashMap::new();
        for row in rows {
            let (name, provides_version) = match row {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("skipping malformed provides row: {e}");
                    continue;
                }
            };
            let Some((group_id, artifact_id, coord_version)) = maven_coord::parse_mvn_provides(&name) else {
                log::warn!("unparseable maven provides string {name:?}");
                continue;
            };
            let version = if !coord_version.is_empty() {
                coord_version
            } else if !provides_version.is_empty() {
                provides_version
            } else {
                rpm_version.to_string()
            };
            let coord = MavenCoord::new(group_id, artifact_id, version);
            dedup.entry(coord.dedup_key()).or_insert(coord);
        }
        Ok(dedup.into_values().collect())
    }

    /// `filename → dirname/filename` for every JAR in a package's filelist
    /// outside `/usr/share/java*`.
    pub fn jar_filelist(&self, pkg_key: i64) -> Result<HashMap<String, String>> {
        let mut stmt = self
            .filelists
            .prepare(
                "SELECT dirname, filenames FROM filelist \
                 WHERE pkgKey = ?1 \
                   AND filenames LIKE '%.jar%' \
                   AND dirname NOT LIKE '/usr/share/java%'",
            )
            .map_err(|e| CatalogError::CorruptMetadata(e.to_string()))?;

        let rows = stmt
            .query_map([pkg_key], |row| {
                let dirname: String = row.get(0)?;
                let filenames: String = row.get(1)?;
                Ok((dirname, filenames))
            })
            .map_err(|e| CatalogError::CorruptMetadata(e.to_string()))?;

        let mut out = HashMap::new();
        for row in rows {
            let (dirname, filenames) = match row {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("skipping malformed filelist row: {e}");
                    continue;
                }
            };
            for filename in filenames.split('/') {
                if filename.ends_with(".jar") {
                    out.insert(filename.to_string(), format!("{dirname}/{filename}"));
                }
            }
        }
        Ok(out)
    }

    /// `DependsOn` edges joining `requires` to `provides` by name.
    pub fn dependency_edges(&self) -> Result<Vec<DependencyEdge>> {
        let mut stmt = self
            .primary
            .prepare(
                "SELECT DISTINCT fromPkg.name, fromPkg.version, \
                                 toPkg.name,   toPkg.version \
                 FROM requires r, provides pro \
                 LEFT JOIN packages fromPkg ON fromPkg.pkgKey = r.pkgKey \
                 LEFT JOIN packages toPkg   ON toPkg.pkgKey   = pro.pkgKey \
                 WHERE r.name = pro.name \
                 ORDER BY r.pkgKey, pro.pkgKey",
            )
            .map_err(|e| CatalogError::CorruptMetadata(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })
            .map_err(|e| CatalogError::CorruptMetadata(e.to_string()))?;

        let mut out = Vec::new();
        for row in rows {
            match row {
                Ok((Some(from_name), Some(from_version), Some(to_name), Some(to_version))) => {
                    out.push(DependencyEdge { from_name, from_version, to_name, to_version })
                }
                Ok(_) => {}
                Err(e) => log::warn!("skipping malformed requires/provides row: {e}"),
            }
        }
        Ok(out)
    }
}
