//! Builds `pkg:rpm/...` and `pkg:maven/...` Package URLs, and the
//! `mergePURLs` law used by downstream SBOM consumers.

use packageurl::PackageUrl;

use crate::maven_coord::MavenCoord;

pub fn build_rpm_purl(name: &str, version: &str, arch: &str, epoch: Option<i64>, source_rpm: &str) -> Option<String> {
    let mut purl = PackageUrl::new("rpm", name).ok()?;
    if !version.is_empty() {
        purl.with_version(version).ok()?;
    }
    if !arch.is_empty() {
        purl.add_qualifier("arch", arch).ok()?;
    }
    if let Some(epoch) = epoch {
        purl.add_qualifier("epoch", epoch.to_string()).ok()?;
    }
    if !source_rpm.is_empty() {
        purl.add_qualifier("upstream", source_rpm).ok()?;
    }
    Some(purl.to_string())
}

/// Maven PURLs are built by hand rather than through `PackageUrl::with_namespace`:
/// the crate percent-encodes the `/` between groupId and artifactId
/// (`pkg:maven/groupId%2FartifactId`), but the PackageURL spec requires it to
/// stay unencoded (`pkg:maven/groupId/artifactId@version`).
pub fn build_maven_purl(coord: &MavenCoord) -> Option<String> {
    if coord.group_id.is_empty() || coord.artifact_id.is_empty() {
        return None;
    }
    let mut purl = format!("pkg:maven/{}/{}", coord.group_id, coord.artifact_id);
    if !coord.version.is_empty() {
        purl = format!("{purl}@{}", coord.version);
    }
    Some(purl)
}

/// Sorted, deduplicated union of two PURL lists: `mergePURLs(a,
/// []) == sort(dedupe(a))` and `mergePURLs(a, b) == mergePURLs(b, a)` up to
/// sort order, both guaranteed by sorting the combined set before dedup.
pub fn merge_purls(a: &[String], b: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = a.iter().cloned().chain(b.iter().cloned()).collect();
    merged.sort();
    merged.dedup();
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_purls_is_commutative_up_to_order() {
        let a = vec!["pkg:maven/g/a@1".to_string(), "pkg:rpm/foo@1".to_string()];
        let b = vec!["pkg:rpm/foo@1".to_string(), "pkg:maven/g/b@1".to_string()];
        assert_eq!(merge_purls(&a, &b), merge_purls(&b, &a));
    }

    #[test]
    fn merge_purls_with_empty_is_sorted_dedup() {
        let a = vec!["pkg:rpm/b@1".to_string(), "pkg:rpm/a@1".to_string(), "pkg:rpm/a@1".to_string()];
        assert_eq!(merge_purls(&a, &[]), vec!["pkg:rpm/a@1".to_string(), "pkg:rpm/b@1".to_string()]);
    }

    #[test]
    fn rpm_purl_carries_arch_epoch_and_upstream_qualifiers() {
        let purl = build_rpm_purl("foo", "1.0-2", "x86_64", Some(7), "foo-1.0-2.src.rpm").unwrap();
        assert!(purl.contains("arch=x86_64"));
        assert!(purl.contains("epoch=7"));
        assert!(purl.contains("upstream=foo-1.0-2.src.rpm"));
    }

    #[test]
    fn rpm_purl_omits_epoch_qualifier_when_absent() {
        let purl = build_rpm_purl("foo", "1.0-2", "x86_64", None, "").unwrap();
        assert!(!purl.contains("epoch="));
        assert!(!purl.contains("upstream="));
    }

    #[test]
    fn maven_sha1_purl_starts_with_maven_sha1() {
        let coord = MavenCoord::new("sha1", "da39a3ee5e6b4b0d3255bfef95601890afd80709", "1.0.0");
        let purl = build_maven_purl(&coord).unwrap();
        assert!(purl.starts_with("pkg:maven/sha1"));
    }
}
