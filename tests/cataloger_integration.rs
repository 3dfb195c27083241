//! End-to-end coverage of `cataloger::catalog` against synthetic repodata
//! trees built by [`repodata_cataloger::testutil`]. Covers repomd discovery,
//! package assembly, Maven-provides parsing, and dependency edges; embedded
//! JAR extraction needs a real RPM payload and is instead covered at the
//! `cpio`/`rpm_payload` unit-test layer against hand-built cpio streams.

use repodata_cataloger::config::CatalogerConfig;
use repodata_cataloger::package::PackageMetadata;
use repodata_cataloger::testutil::{build_empty_root, build_incomplete_repo, build_repo, PackageFixture};
use repodata_cataloger::{catalog, CatalogResult};

#[test]
fn no_repodata_directory_yields_an_empty_catalog_without_error() {
    let root = build_empty_root();
    let config = CatalogerConfig::default();

    let result: CatalogResult = catalog(root.path(), &config).expect("catalog should not error");

    assert!(result.packages.is_empty());
    assert!(result.relationships.is_empty());
}

#[test]
fn incomplete_database_set_yields_an_empty_catalog_without_error() {
    let fixture = build_incomplete_repo();
    let config = CatalogerConfig::default();

    let result = catalog(fixture.root(), &config).expect("catalog should not error");

    assert!(result.packages.is_empty());
    assert!(result.relationships.is_empty());
}

#[test]
fn minimal_rpm_row_produces_one_package_with_raw_version_identity() {
    let fixture = build_repo(&[PackageFixture::new(1, "foo", "1.0", "2")]);
    let config = CatalogerConfig::default();

    let result = catalog(fixture.root(), &config).expect("catalog should succeed");

    assert_eq!(result.packages.len(), 1);
    let pkg = &result.packages[0];
    assert_eq!(pkg.id, "rpm-foo-1.0");
    assert_eq!(pkg.name, "foo");
    assert_eq!(pkg.version, "1.0-2");

    let PackageMetadata::Rpm(metadata) = &pkg.metadata;
    assert!(metadata.rpm_provides.is_empty());
    assert!(metadata.ext_package.is_empty());
}

#[test]
fn maven_provides_row_is_captured_on_the_package() {
    let fixture = build_repo(&[PackageFixture::new(1, "foo", "1.0", "2")
        .with_provides("mvn(org.example:lib:3.4.5)", "")]);
    let config = CatalogerConfig::default();

    let result = catalog(fixture.root(), &config).expect("catalog should succeed");

    let pkg = &result.packages[0];
    let PackageMetadata::Rpm(metadata) = &pkg.metadata;
    assert_eq!(metadata.rpm_provides.len(), 1);
    let coord = &metadata.rpm_provides[0];
    assert_eq!(coord.group_id, "org.example");
    assert_eq!(coord.artifact_id, "lib");
    assert_eq!(coord.version, "3.4.5");
}

#[test]
fn sources_classified_provides_row_is_filtered_out() {
    let fixture =
        build_repo(&[PackageFixture::new(1, "foo", "1.0", "2").with_provides("mvn(a:b::sources:)", "")]);
    let config = CatalogerConfig::default();

    let result = catalog(fixture.root(), &config).expect("catalog should succeed");

    let pkg = &result.packages[0];
    let PackageMetadata::Rpm(metadata) = &pkg.metadata;
    assert!(metadata.rpm_provides.is_empty());
}

#[test]
fn requires_provides_pair_produces_one_depends_on_edge() {
    let fixture = build_repo(&[
        PackageFixture::new(1, "pkg-a", "1.0", "1").with_requires("x"),
        PackageFixture::new(2, "pkg-b", "2.0", "1").with_provides("x", ""),
    ]);
    let config = CatalogerConfig::default();

    let result = catalog(fixture.root(), &config).expect("catalog should succeed");

    assert_eq!(result.relationships.len(), 1);
    let edge = &result.relationships[0];
    assert_eq!(edge.from, "rpm-pkg-a-1.0");
    assert_eq!(edge.to, "rpm-pkg-b-2.0");
}

#[test]
fn every_package_location_points_at_the_primary_db_not_its_own_rpm_path() {
    let fixture = build_repo(&[
        PackageFixture::new(1, "pkg-a", "1.0", "1"),
        PackageFixture::new(2, "pkg-b", "2.0", "1"),
    ]);
    let config = CatalogerConfig::default();

    let result = catalog(fixture.root(), &config).expect("catalog should succeed");

    assert_eq!(result.packages.len(), 2);
    for pkg in &result.packages {
        assert_eq!(pkg.locations.len(), 1);
        assert_eq!(pkg.locations[0].path, "repodata/primary.sqlite.bz2");
    }
}
