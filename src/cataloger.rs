//! Orchestrates the repodata cataloger pipeline end to end.
//!
//! Dataflow: VFS adapter (A) → repomd parser (B) → decompression (C) → for
//! each package row, the query layer (E) feeds Maven provides (F) and the JAR
//! filelist, which drives per-RPM payload extraction (D); the assembler (G)
//! builds `Package`s while the external-ref bookkeeper (H) partitions PURLs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::CatalogerConfig;
use crate::decompress::{self, ScratchDir};
use crate::error::{CatalogError, Result};
use crate::external_ref::ExternalCounter;
use crate::hash::sha1_hex;
use crate::maven_coord::MavenCoord;
use crate::package::{self, Package, Relationship, RelationshipKind};
use crate::purl::{build_maven_purl, build_rpm_purl};
use crate::query::Databases;
use crate::repomd;
use crate::rpm_payload;
use crate::vfs::{IsoSource, Vfs};

const APP_NAME: &str = "repodata-cataloger";

pub struct CatalogResult {
    pub packages: Vec<Package>,
    pub relationships: Vec<Relationship>,
    pub external: ExternalCounter,
}

/// Runs the full cataloger pipeline against `source_path` (an ISO image file
/// or an already-mounted directory tree).
pub fn catalog(source_path: &Path, config: &CatalogerConfig) -> Result<CatalogResult> {
    let source = IsoSource::detect(source_path)?;
    let vfs = Vfs::open(source)?;

    let Some(mut files) = repomd::discover(&vfs)? else {
        log::info!("no repodata found in {source_path:?}; returning an empty catalog");
        return Ok(CatalogResult {
            packages: Vec::new(),
            relationships: Vec::new(),
            external: ExternalCounter::new(config.format.count_external),
        });
    };

    let scratch = ScratchDir::new(APP_NAME)?;
    decompress::decompress_all(&vfs, &mut files, &scratch)?;
    log::info!("decompressed primary/filelists/other databases to {:?}", scratch.path());

    let primary_location = files
        .primary
        .bz2_path
        .clone()
        .ok_or_else(|| CatalogError::CorruptMetadata("primary.sqlite location missing".into()))?;

    let db = Databases::open(&files)?;
    let rows = db.packages()?;
    log::info!("found {} package rows in primary.sqlite", rows.len());

    let mut packages = Vec::with_capacity(rows.len());
    let mut external = ExternalCounter::new(config.format.count_external);

    for row in &rows {
        let rpm_provides = db.maven_provides(row.pkg_key, &row.version).unwrap_or_else(|e| {
            log::warn!("skipping maven provides for {}: {e}", row.name);
            Vec::new()
        });

        let jar_filelist = db.jar_filelist(row.pkg_key).unwrap_or_else(|e| {
            log::warn!("skipping jar filelist for {}: {e}", row.name);
            HashMap::new()
        });

        let ext_package = if jar_filelist.is_empty() {
            Vec::new()
        } else {
            extract_embedded_jars(&vfs, &scratch, &row.location_href, &row.name, &jar_filelist)
        };

        let pkg = package::assemble_package(row, rpm_provides, ext_package, &primary_location);

        let own_purl = build_rpm_purl(&row.name, &pkg.version, &row.arch, row.epoch, &row.source_rpm);
        let (provides_purls, external_purls) = match &pkg.metadata {
            package::PackageMetadata::Rpm(metadata) => (
                metadata.rpm_provides.iter().filter_map(build_maven_purl).collect::<Vec<_>>(),
                metadata.ext_package.iter().filter_map(build_maven_purl).collect::<Vec<_>>(),
            ),
        };

        external.record_package(&row.name, own_purl.as_deref(), &[], config.format.include_cpe, &provides_purls, &external_purls);

        packages.push(pkg);
    }

    let relationships = db
        .dependency_edges()?
        .into_iter()
        .map(|edge| Relationship {
            from: Package::rpm_identity(&edge.from_name, &edge.from_version),
            to: Package::rpm_identity(&edge.to_name, &edge.to_version),
            kind: RelationshipKind::DependsOn,
        })
        .collect();

    external.print_count_info();

    Ok(CatalogResult { packages, relationships, external })
}

/// JAR extraction policy per RPM: build a per-RPM scratch
/// subdirectory, extract the payload into it, resolve each filelist entry
/// against it (skipping entries the payload doesn't actually contain), hash
/// whatever resolves, and release the subdirectory before moving to the next
/// RPM.
fn extract_embedded_jars(
    vfs: &Vfs,
    scratch: &ScratchDir,
    rpm_location_href: &str,
    rpm_name: &str,
    jar_filelist: &HashMap<String, String>,
) -> Vec<MavenCoord> {
    let rpm_basename = Path::new(rpm_location_href)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(rpm_name);
    let rpm_scratch = scratch.path().join(rpm_basename);

    let coords = (|| -> Vec<MavenCoord> {
        if let Err(e) = std::fs::create_dir_all(&rpm_scratch) {
            log::warn!("cannot create scratch dir for {rpm_name}: {e}");
            return Vec::new();
        }

        let reader = match vfs.open_path(rpm_location_href) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("cannot open RPM payload for {rpm_name}: {e}");
                return Vec::new();
            }
        };

        match rpm_payload::extract_jars(reader, &rpm_scratch) {
            Ok(_) => {}
            Err(e) => {
                log::warn!("cannot extract RPM payload for {rpm_name}: {e}");
                return Vec::new();
            }
        }

        let mut dedup: HashMap<String, MavenCoord> = HashMap::new();
        for (filename, dirname_and_filename) in jar_filelist {
            let relative = dirname_and_filename.trim_start_matches('/');
            let path: PathBuf = rpm_scratch.join(relative);
            if !path.exists() {
                log::debug!("filelist entry {filename} not present in {rpm_name}'s payload, skipping");
                continue;
            }
            match std::fs::read(&path) {
                Ok(bytes) => {
                    let coord = MavenCoord::new("sha1", sha1_hex(&bytes), "1.0.0");
                    dedup.entry(coord.dedup_key()).or_insert(coord);
                }
                Err(e) => log::warn!("cannot read extracted jar {filename} for {rpm_name}: {e}"),
            }
        }
        dedup.into_values().collect()
    })();

    if let Err(e) = std::fs::remove_dir_all(&rpm_scratch) {
        log::debug!("cleanup of {rpm_scratch:?} failed (already removed or never created): {e}");
    }

    coords
}
