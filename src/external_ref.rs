//! Partitions generated PURLs into package-provided vs externally-referenced,
//! and emits the SBOM-consumer-facing reference records.
//!
//! `count_external` is threaded in explicitly at construction rather than
//! read from a process-wide config singleton.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceType {
    Cpe23,
    Purl,
    Checksum,
}

#[derive(Debug, Clone)]
pub struct Reference {
    pub reference_type: ReferenceType,
    pub value: String,
    pub comment: Option<String>,
}

#[derive(Debug, Default)]
pub struct ExternalCounter {
    count_external: bool,
    pub provide_map: HashMap<String, String>,
    pub external_map: HashMap<String, String>,
    pub external_pkg_map: HashMap<String, Vec<String>>,
}

impl ExternalCounter {
    pub fn new(count_external: bool) -> Self {
        Self { count_external, ..Default::default() }
    }

    /// Records one package's references and returns the reference records an
    /// SBOM emitter would attach to it.
    pub fn record_package(
        &mut self,
        pkg_name: &str,
        own_purl: Option<&str>,
        cpes: &[String],
        include_cpe: bool,
        provides_purls: &[String],
        external_purls: &[String],
    ) -> Vec<Reference> {
        let mut refs = Vec::new();

        if include_cpe {
            for cpe in cpes {
                refs.push(Reference { reference_type: ReferenceType::Cpe23, value: cpe.clone(), comment: None });
            }
        }

        if let Some(purl) = own_purl {
            refs.push(Reference { reference_type: ReferenceType::Purl, value: purl.to_string(), comment: None });
        }

        for purl in provides_purls {
            refs.push(Reference {
                reference_type: ReferenceType::Purl,
                value: purl.clone(),
                comment: Some("provides".to_string()),
            });
            self.provide_map.insert(purl.clone(), pkg_name.to_string());
        }

        for purl in external_purls {
            let reference_type =
                if purl.starts_with("pkg:maven/sha1") { ReferenceType::Checksum } else { ReferenceType::Purl };
            refs.push(Reference { reference_type, value: purl.clone(), comment: Some("external".to_string()) });
            self.external_map.insert(purl.clone(), pkg_name.to_string());
            self.external_pkg_map.entry(pkg_name.to_string()).or_default().push(purl.clone());
        }

        refs
    }

    /// Diagnostic print gated by `format.count-external`: first the
    /// image-wide external PURLs not also provided by any package, then, for
    /// every package that has external PURLs, a header followed by its
    /// PURLs — skipping only the individual PURLs that are themselves a key
    /// in `provide_map`, not the whole package's block.
    pub fn print_count_info(&self) {
        if !self.count_external {
            return;
        }

        eprintln!("external references not provided within this image:");
        for purl in self.external_map.keys().filter(|purl| !self.provide_map.contains_key(*purl)) {
            eprintln!("  {purl}");
        }

        for (pkg_name, purls) in &self.external_pkg_map {
            if purls.is_empty() {
                continue;
            }
            eprintln!("{pkg_name}:");
            for purl in purls {
                if self.provide_map.contains_key(purl) {
                    continue;
                }
                eprintln!("  {purl}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_purl_classified_as_checksum() {
        let mut counter = ExternalCounter::new(false);
        let refs = counter.record_package(
            "foo",
            None,
            &[],
            false,
            &[],
            &["pkg:maven/sha1/da39a3ee5e6b4b0d3255bfef95601890afd80709@1.0.0".to_string()],
        );
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].reference_type, ReferenceType::Checksum);
    }

    #[test]
    fn provided_purl_is_internal_for_display() {
        let mut counter = ExternalCounter::new(false);
        counter.record_package("foo", None, &[], false, &["pkg:maven/g/a@1".to_string()], &[]);
        counter.record_package("bar", None, &[], false, &[], &["pkg:maven/g/a@1".to_string()]);

        let image_wide: Vec<&String> =
            counter.external_map.keys().filter(|p| !counter.provide_map.contains_key(*p)).collect();
        assert!(image_wide.is_empty());
    }

    #[test]
    fn per_package_filter_skips_only_the_matching_purl_not_the_whole_package() {
        let mut counter = ExternalCounter::new(false);
        counter.record_package("provider", None, &[], false, &["pkg:maven/g/a@1".to_string()], &[]);
        counter.record_package(
            "consumer",
            None,
            &[],
            false,
            &[],
            &["pkg:maven/g/a@1".to_string(), "pkg:maven/g/b@1".to_string()],
        );

        let purls = &counter.external_pkg_map["consumer"];
        let printed: Vec<&String> = purls.iter().filter(|p| !counter.provide_map.contains_key(*p)).collect();
        assert_eq!(printed, vec![&"pkg:maven/g/b@1".to_string()]);
    }
}
