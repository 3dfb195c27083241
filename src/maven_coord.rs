//! Parses `mvn(group:artifact[:...[:version]])` provides strings into Maven
//! coordinates.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref MVN_COORD_RE: Regex =
        Regex::new(r"^mvn\(([A-Za-z0-9_.-]*):([A-Za-z0-9_.-]*)(:([A-Za-z0-9_.-]*))*\)").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MavenCoord {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl MavenCoord {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self { group_id: group_id.into(), artifact_id: artifact_id.into(), version: version.into() }
    }

    /// Canonical dedup key, `maven:group:artifact:version`.
    pub fn dedup_key(&self) -> String {
        format!("maven:{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// Parses a single `mvn(...)` provides string, returning `(group, artifact,
/// coord_version)` where `coord_version` is the last captured repetition of
/// the grammar's trailing `(:token)*` group, or empty if absent (regex
/// repeated-group semantics keep only the final repetition's capture).
pub fn parse_mvn_provides(text: &str) -> Option<(String, String, String)> {
    let caps = MVN_COORD_RE.captures(text)?;
    let group_id = caps.get(1)?.as_str().to_string();
    let artifact_id = caps.get(2)?.as_str().to_string();
    let coord_version = caps.get(4).map(|m| m.as_str().to_string()).unwrap_or_default();
    Some((group_id, artifact_id, coord_version))
}
