//! Builds a synthetic repodata tree under a temp directory: a `repomd.xml`
//! plus the three bz2-compressed SQLite databases it references, with rows
//! supplied by the caller. Used by this crate's own unit tests and by
//! `tests/cataloger_integration.rs`.
//!
//! Deliberately stops short of building a real RPM payload (lead, header,
//! xz/cpio signing) — no example in the surrounding codebase constructs one,
//! and the `rpm` crate's own write-side API isn't exercised anywhere this
//! cataloger can learn it from. JAR-embedding coverage instead lives at the
//! `cpio`/`rpm_payload` unit-test layer, against hand-built cpio streams.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use bzip2::write::BzEncoder;
use bzip2::Compression;
use rusqlite::Connection;
use tempfile::TempDir;

/// One synthetic `packages`/`provides`/`requires`/`filelist` row set.
pub struct PackageFixture {
    pub pkg_key: i64,
    pub name: String,
    pub arch: String,
    pub version: String,
    pub epoch: Option<i64>,
    pub release: String,
    pub checksum_type: String,
    pub pkg_id: String,
    pub location_href: String,
    pub provides: Vec<(String, String)>,
    pub requires: Vec<String>,
    pub filelist: Vec<(String, String)>,
}

impl PackageFixture {
    pub fn new(pkg_key: i64, name: &str, version: &str, release: &str) -> Self {
        Self {
            pkg_key,
            name: name.to_string(),
            arch: "x86_64".to_string(),
            version: version.to_string(),
            epoch: None,
            release: release.to_string(),
            checksum_type: "sha256".to_string(),
            pkg_id: format!("{pkg_key:064x}"),
            location_href: format!("Packages/{name}-{version}-{release}.x86_64.rpm"),
            provides: Vec::new(),
            requires: Vec::new(),
            filelist: Vec::new(),
        }
    }

    pub fn with_provides(mut self, name: &str, version: &str) -> Self {
        self.provides.push((name.to_string(), version.to_string()));
        self
    }

    pub fn with_requires(mut self, name: &str) -> Self {
        self.requires.push(name.to_string());
        self
    }

    pub fn with_filelist(mut self, dirname: &str, filenames: &str) -> Self {
        self.filelist.push((dirname.to_string(), filenames.to_string()));
        self
    }
}

/// A built fixture tree. Keeping the `TempDir` alive for the fixture's
/// lifetime is what keeps the tree from being cleaned up before a test reads it.
pub struct RepoFixture {
    dir: TempDir,
}

impl RepoFixture {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

/// Builds `root/repodata/{repomd.xml, primary.sqlite.bz2, filelists.sqlite.bz2,
/// other.sqlite.bz2}` from the given package rows.
pub fn build_repo(packages: &[PackageFixture]) -> RepoFixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let repodata = dir.path().join("repodata");
    fs::create_dir_all(&repodata).expect("create repodata dir");

    write_repomd(&repodata);

    let primary_path = repodata.join("primary.sqlite");
    build_primary_db(&primary_path, packages);
    compress_bz2(&primary_path, &repodata.join("primary.sqlite.bz2"));

    let filelists_path = repodata.join("filelists.sqlite");
    build_filelists_db(&filelists_path, packages);
    compress_bz2(&filelists_path, &repodata.join("filelists.sqlite.bz2"));

    let other_path = repodata.join("other.sqlite");
    build_other_db(&other_path);
    compress_bz2(&other_path, &repodata.join("other.sqlite.bz2"));

    RepoFixture { dir }
}

fn write_repomd(repodata: &Path) {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<repomd xmlns="http://linux.duke.edu/metadata/repo">
  <data type="primary_db">
    <location href="repodata/primary.sqlite.bz2"/>
  </data>
  <data type="filelists_db">
    <location href="repodata/filelists.sqlite.bz2"/>
  </data>
  <data type="other_db">
    <location href="repodata/other.sqlite.bz2"/>
  </data>
</repomd>
"#;
    File::create(repodata.join("repomd.xml"))
        .and_then(|mut f| f.write_all(xml.as_bytes()))
        .expect("write repomd.xml");
}

fn build_primary_db(path: &Path, packages: &[PackageFixture]) {
    let conn = Connection::open(path).expect("open primary.sqlite");
    conn.execute_batch(
        "CREATE TABLE packages (
            pkgId TEXT, pkgKey INTEGER, name TEXT, arch TEXT, version TEXT,
            epoch TEXT, release TEXT, summary TEXT, description TEXT,
            rpm_sourcerpm TEXT, rpm_vendor TEXT, rpm_packager TEXT, rpm_license TEXT,
            size_installed INTEGER, url TEXT, checksum_type TEXT, location_href TEXT
        );
        CREATE TABLE provides (pkgKey INTEGER, name TEXT, version TEXT);
        CREATE TABLE requires (pkgKey INTEGER, name TEXT, version TEXT);",
    )
    .expect("create primary.sqlite schema");

    for pkg in packages {
        conn.execute(
            "INSERT INTO packages \
             (pkgId, pkgKey, name, arch, version, epoch, release, summary, description, \
              rpm_sourcerpm, rpm_vendor, rpm_packager, rpm_license, size_installed, url, \
              checksum_type, location_href) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,'','',?8,'','','MIT',1024,'',?9,?10)",
            rusqlite::params![
                pkg.pkg_id,
                pkg.pkg_key,
                pkg.name,
                pkg.arch,
                pkg.version,
                pkg.epoch.map(|e| e.to_string()),
                pkg.release,
                format!("{}-{}-{}.src.rpm", pkg.name, pkg.version, pkg.release),
                pkg.checksum_type,
                pkg.location_href,
            ],
        )
        .expect("insert packages row");

        for (name, version) in &pkg.provides {
            conn.execute(
                "INSERT INTO provides (pkgKey, name, version) VALUES (?1, ?2, ?3)",
                rusqlite::params![pkg.pkg_key, name, version],
            )
            .expect("insert provides row");
        }
        for name in &pkg.requires {
            conn.execute(
                "INSERT INTO requires (pkgKey, name, version) VALUES (?1, ?2, '')",
                rusqlite::params![pkg.pkg_key, name],
            )
            .expect("insert requires row");
        }
    }
}

fn build_filelists_db(path: &Path, packages: &[PackageFixture]) {
    let conn = Connection::open(path).expect("open filelists.sqlite");
    conn.execute_batch("CREATE TABLE filelist (pkgKey INTEGER, dirname TEXT, filenames TEXT);")
        .expect("create filelists.sqlite schema");
    for pkg in packages {
        for (dirname, filenames) in &pkg.filelist {
            conn.execute(
                "INSERT INTO filelist (pkgKey, dirname, filenames) VALUES (?1, ?2, ?3)",
                rusqlite::params![pkg.pkg_key, dirname, filenames],
            )
            .expect("insert filelist row");
        }
    }
}

fn build_other_db(path: &Path) {
    let conn = Connection::open(path).expect("open other.sqlite");
    conn.execute_batch("CREATE TABLE changelog (pkgKey INTEGER, author TEXT, date INTEGER, changelog TEXT);")
        .expect("create other.sqlite schema");
}

fn compress_bz2(src: &Path, dest: &Path) {
    let data = fs::read(src).expect("read uncompressed db");
    let out = File::create(dest).expect("create bz2 file");
    let mut encoder = BzEncoder::new(out, Compression::best());
    encoder.write_all(&data).expect("write bz2 payload");
    encoder.finish().expect("finish bz2 stream");
}

/// A directory containing no `repodata/` subdirectory at all, for exercising
/// the "no repodata found" policy.
pub fn build_empty_root() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("unrelated")).expect("create unrelated dir");
    dir
}

/// A `repodata/` tree with a `repomd.xml` that only advertises `primary_db`,
/// for exercising the "incomplete database set" policy.
pub fn build_incomplete_repo() -> RepoFixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let repodata = dir.path().join("repodata");
    fs::create_dir_all(&repodata).expect("create repodata dir");

    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<repomd xmlns="http://linux.duke.edu/metadata/repo">
  <data type="primary_db">
    <location href="repodata/primary.sqlite.bz2"/>
  </data>
</repomd>
"#;
    File::create(repodata.join("repomd.xml"))
        .and_then(|mut f| f.write_all(xml.as_bytes()))
        .expect("write repomd.xml");

    build_primary_db(&repodata.join("primary.sqlite"), &[]);
    compress_bz2(&repodata.join("primary.sqlite"), &repodata.join("primary.sqlite.bz2"));

    RepoFixture { dir }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_repo_produces_the_three_bz2_databases() {
        let fixture = build_repo(&[PackageFixture::new(1, "foo", "1.0", "2")]);
        let repodata = fixture.root().join("repodata");
        assert!(repodata.join("repomd.xml").is_file());
        assert!(repodata.join("primary.sqlite.bz2").is_file());
        assert!(repodata.join("filelists.sqlite.bz2").is_file());
        assert!(repodata.join("other.sqlite.bz2").is_file());
    }

    #[test]
    fn build_incomplete_repo_omits_filelists_and_other() {
        let fixture = build_incomplete_repo();
        let repodata = fixture.root().join("repodata");
        assert!(repodata.join("primary.sqlite.bz2").is_file());
        assert!(!repodata.join("filelists.sqlite.bz2").exists());
    }
}
