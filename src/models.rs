use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Outcome of licence detection for a single project.
///
/// Field names follow the go-license-detector JSON format so records can be
/// read straight from an external detector and written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectionRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<LicenceMatch>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub error: Option<String>,
}

fn is_blank(error: &Option<String>) -> bool {
    error.as_deref().map_or(true, str::is_empty)
}

impl DetectionRecord {
    pub fn identified(project: impl Into<String>, matches: Vec<LicenceMatch>) -> Self {
        Self {
            project: project.into(),
            matches,
            error: None,
        }
    }

    pub fn unidentified(project: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            matches: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// `true` when the detector reported an error for this project.
    pub fn has_error(&self) -> bool {
        !is_blank(&self.error)
    }

    /// Order matches by confidence (highest first), then by licence name.
    pub fn sort_matches(&mut self) {
        self.matches.sort_by(LicenceMatch::by_probability);
    }

    /// First match after [`sort_matches`](Self::sort_matches).
    pub fn most_probable(&self) -> Option<&LicenceMatch> {
        self.matches.first()
    }
}

/// A candidate licence and how confident the detector is about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenceMatch {
    #[serde(rename = "license")]
    pub licence: String,
    #[serde(default)]
    pub confidence: f32,
}

impl LicenceMatch {
    pub fn new(licence: impl Into<String>, confidence: f32) -> Self {
        Self {
            licence: licence.into(),
            confidence,
        }
    }

    /// Total order: descending confidence, ties broken by ascending licence name.
    pub fn by_probability(a: &LicenceMatch, b: &LicenceMatch) -> Ordering {
        unsigned_zero(b.confidence)
            .total_cmp(&unsigned_zero(a.confidence))
            .then_with(|| a.licence.cmp(&b.licence))
    }
}

/// `-0.0` compares equal to `0.0` under `==` but not under `total_cmp`.
fn unsigned_zero(confidence: f32) -> f32 {
    if confidence == 0.0 {
        0.0
    } else {
        confidence
    }
}

/// Detection records partitioned by compliance outcome.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComplianceResults {
    pub compliant: Vec<DetectionRecord>,
    pub restricted: Vec<DetectionRecord>,
    pub unidentifiable: Vec<DetectionRecord>,
    pub ignored: Vec<DetectionRecord>,
}

impl ComplianceResults {
    /// A run fails when anything is restricted or could not be identified.
    pub fn is_compliant(&self) -> bool {
        self.restricted.is_empty() && self.unidentifiable.is_empty()
    }

    /// Number of records across all buckets.
    pub fn total(&self) -> usize {
        self.compliant.len() + self.restricted.len() + self.unidentifiable.len() + self.ignored.len()
    }

    /// Buckets paired with their report names, in report order.
    pub fn buckets(&self) -> [(Bucket, &[DetectionRecord]); 4] {
        [
            (Bucket::Restricted, self.restricted.as_slice()),
            (Bucket::Unidentifiable, self.unidentifiable.as_slice()),
            (Bucket::Compliant, self.compliant.as_slice()),
            (Bucket::Ignored, self.ignored.as_slice()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Compliant,
    Restricted,
    Unidentifiable,
    Ignored,
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bucket::Compliant => write!(f, "compliant"),
            Bucket::Restricted => write!(f, "restricted"),
            Bucket::Unidentifiable => write!(f, "unidentifiable"),
            Bucket::Ignored => write!(f, "ignored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_matches_confidence_then_name() {
        let mut record = DetectionRecord::identified(
            "p",
            vec![
                LicenceMatch::new("MIT", 0.9),
                LicenceMatch::new("BSD3", 0.9),
                LicenceMatch::new("Z", 0.95),
                LicenceMatch::new("A", 0.1),
            ],
        );
        record.sort_matches();
        let names: Vec<_> = record.matches.iter().map(|m| m.licence.as_str()).collect();
        assert_eq!(names, vec!["Z", "BSD3", "MIT", "A"]);
        assert_eq!(record.most_probable().unwrap().licence, "Z");
    }

    #[test]
    fn test_signed_zero_confidences_tie_on_name() {
        let mut record = DetectionRecord::identified(
            "p",
            vec![LicenceMatch::new("MIT", 0.0), LicenceMatch::new("BSD3", -0.0)],
        );
        record.sort_matches();
        let names: Vec<_> = record.matches.iter().map(|m| m.licence.as_str()).collect();
        assert_eq!(names, vec!["BSD3", "MIT"]);

        record.matches.reverse();
        record.sort_matches();
        assert_eq!(record.most_probable().unwrap().licence, "BSD3");
    }

    #[test]
    fn test_has_error_ignores_empty_string() {
        let mut record = DetectionRecord::unidentified("p", "");
        assert!(!record.has_error());
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"project":"p"}"#);
        record.error = Some("no license file was found".into());
        assert!(record.has_error());
    }

    #[test]
    fn test_serialize_omits_empty_fields() {
        let record = DetectionRecord::unidentified("", "boom");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);

        let record = DetectionRecord::identified("p", vec![LicenceMatch::new("MIT", 0.5)]);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"project":"p","matches":[{"license":"MIT","confidence":0.5}]}"#
        );
    }

    #[test]
    fn test_results_serialize_all_buckets() {
        let results = ComplianceResults::default();
        let json = serde_json::to_string(&results).unwrap();
        assert_eq!(
            json,
            r#"{"compliant":[],"restricted":[],"unidentifiable":[],"ignored":[]}"#
        );
        assert!(results.is_compliant());
        assert_eq!(results.total(), 0);
    }
}
