//! Builds `Package` records and `DependsOn` relationships.

use derive_builder::Builder;
use serde::Serialize;

use crate::maven_coord::MavenCoord;
use crate::query::PackageRow;

#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub algorithm: String,
    pub value: String,
}

#[derive(Debug, Clone, Builder, Serialize)]
#[builder(setter(into))]
pub struct RpmRepodata {
    pub name: String,
    pub version: String,
    pub release: String,
    pub epoch: Option<i64>,
    pub arch: String,
    pub source_rpm: String,
    pub vendor: String,
    pub packager: String,
    pub license: String,
    pub homepage: String,
    pub summary: String,
    pub description: String,
    pub size: i64,
    pub digests: Vec<Digest>,
    /// Maven coordinates this RPM advertises via `mvn(...)` provides.
    pub rpm_provides: Vec<MavenCoord>,
    /// Maven coordinates synthesized for JARs embedded in this RPM's payload.
    pub ext_package: Vec<MavenCoord>,
}

/// Tagged sum over the kinds of metadata a `Package` can carry, replacing
/// runtime type discrimination over a `Metadata` field with a closed enum.
/// Only the RPM variant is populated by this cataloger;
/// accessors are exhaustive matches so a future back-end can add a variant
/// without silently breaking callers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "metadata_type", content = "metadata")]
pub enum PackageMetadata {
    Rpm(RpmRepodata),
}

impl PackageMetadata {
    pub fn description(&self) -> &str {
        match self {
            PackageMetadata::Rpm(r) => &r.description,
        }
    }

    pub fn homepage(&self) -> &str {
        match self {
            PackageMetadata::Rpm(r) => &r.homepage,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            PackageMetadata::Rpm(r) => &r.summary,
        }
    }

    /// Vendor if present, else packager, else empty.
    pub fn supplier(&self) -> &str {
        match self {
            PackageMetadata::Rpm(r) => {
                if !r.vendor.is_empty() {
                    &r.vendor
                } else {
                    &r.packager
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub version: String,
    pub locations: Vec<Location>,
    pub licenses: Vec<String>,
    pub found_by: &'static str,
    #[serde(rename = "type")]
    pub package_type: &'static str,
    pub metadata: PackageMetadata,
}

impl Package {
    /// `rpm-{name}-{raw-version}`, the stable join key for relationships.
    /// Uses the *raw* version column, distinct from
    /// the composed EL version carried in `Package::version`.
    pub fn rpm_identity(name: &str, raw_version: &str) -> String {
        format!("rpm-{name}-{raw_version}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    DependsOn,
}

#[derive(Debug, Clone, Serialize)]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub kind: RelationshipKind,
}

/// Composes `"{epoch}:{version}-{release}"` (epoch present) or
/// `"{version}-{release}"` (absent) — the user-facing version wherever one is
/// required.
pub fn to_el_version(epoch: Option<i64>, version: &str, release: &str) -> String {
    match epoch {
        Some(e) => format!("{e}:{version}-{release}"),
        None => format!("{version}-{release}"),
    }
}

/// `primary_location` is the bz2 path of the primary database this row was
/// read from — every `Package`'s `locations` points there, not at the RPM's
/// own path, matching how the original cataloger locates a package by where
/// its metadata was found rather than where its payload lives.
pub fn assemble_package(
    row: &PackageRow,
    rpm_provides: Vec<MavenCoord>,
    ext_package: Vec<MavenCoord>,
    primary_location: &str,
) -> Package {
    let el_version = to_el_version(row.epoch, &row.version, &row.release);

    let mut digests = Vec::new();
    if !row.checksum_type.is_empty() && !row.pkg_id.is_empty() {
        digests.push(Digest { algorithm: row.checksum_type.clone(), value: row.pkg_id.clone() });
    }

    let metadata = RpmRepodataBuilder::default()
        .name(row.name.clone())
        .version(row.version.clone())
        .release(row.release.clone())
        .epoch(row.epoch)
        .arch(row.arch.clone())
        .source_rpm(row.source_rpm.clone())
        .vendor(row.vendor.clone())
        .packager(row.packager.clone())
        .license(row.license.clone())
        .homepage(row.homepage.clone())
        .summary(row.summary.clone())
        .description(row.description.clone())
        .size(row.size_installed)
        .digests(digests)
        .rpm_provides(rpm_provides)
        .ext_package(ext_package)
        .build()
        .expect("RpmRepodataBuilder not completely initialized");

    Package {
        id: Package::rpm_identity(&row.name, &row.version),
        name: row.name.clone(),
        version: el_version,
        locations: vec![Location { path: primary_location.to_string() }],
        licenses: if row.license.is_empty() { Vec::new() } else { vec![row.license.clone()] },
        found_by: "repodata-cataloger",
        package_type: "Repodata",
        metadata: PackageMetadata::Rpm(metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> PackageRow {
        PackageRow {
            pkg_id: "abc123".into(),
            pkg_key: 1,
            name: "foo".into(),
            arch: "x86_64".into(),
            version: "1.0".into(),
            epoch: None,
            release: "2".into(),
            summary: String::new(),
            description: String::new(),
            source_rpm: "foo-1.0-2.src.rpm".into(),
            vendor: String::new(),
            packager: String::new(),
            license: "MIT".into(),
            size_installed: 1024,
            homepage: String::new(),
            checksum_type: "sha256".into(),
            location_href: "Packages/foo-1.0-2.x86_64.rpm".into(),
        }
    }

    #[test]
    fn identity_uses_raw_version_not_composed_el_version() {
        let pkg = assemble_package(&sample_row(), Vec::new(), Vec::new(), "repodata/primary.sqlite.bz2");
        assert_eq!(pkg.id, "rpm-foo-1.0");
        assert_eq!(pkg.version, "1.0-2");
    }

    #[test]
    fn locations_point_at_the_primary_db_not_the_rpm_path() {
        let pkg = assemble_package(&sample_row(), Vec::new(), Vec::new(), "repodata/primary.sqlite.bz2");
        assert_eq!(pkg.locations.len(), 1);
        assert_eq!(pkg.locations[0].path, "repodata/primary.sqlite.bz2");
    }

    #[test]
    fn el_version_includes_epoch_when_present() {
        assert_eq!(to_el_version(Some(7), "1.0", "2"), "7:1.0-2");
        assert_eq!(to_el_version(None, "1.0", "2"), "1.0-2");
    }

    #[test]
    fn supplier_falls_back_from_vendor_to_packager() {
        let mut row = sample_row();
        row.vendor = String::new();
        row.packager = "Jane Packager".into();
        let pkg = assemble_package(&row, Vec::new(), Vec::new(), "repodata/primary.sqlite.bz2");
        assert_eq!(pkg.metadata.supplier(), "Jane Packager");
    }
}
