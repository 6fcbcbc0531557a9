//! Compliance engine: partitions detection records into
//! compliant / restricted / unidentifiable / ignored.

use tracing::{debug, info};

use crate::config::ComplianceConfig;
use crate::detection::{DetectionError, LicenceDetector};
use crate::models::{Bucket, ComplianceResults, DetectionRecord, LicenceMatch};

pub struct Compliance {
    config: ComplianceConfig,
    detector: Box<dyn LicenceDetector>,
}

impl Compliance {
    pub fn new(config: ComplianceConfig, detector: Box<dyn LicenceDetector>) -> Self {
        Self { config, detector }
    }

    /// Detect licences for `project_paths` and classify every record.
    ///
    /// The detector is invoked exactly once. A detector failure aborts the run
    /// before anything is classified.
    pub fn validate(&self, project_paths: &[String]) -> Result<ComplianceResults, DetectionError> {
        let mut records = self.detector.detect(project_paths)?;
        debug!(count = records.len(), "licence detection finished");

        records.sort_by(|a, b| a.project.cmp(&b.project));

        let mut results = ComplianceResults::default();
        for record in records {
            let (bucket, record) = self.classify(record);
            match bucket {
                Bucket::Compliant => results.compliant.push(record),
                Bucket::Restricted => results.restricted.push(record),
                Bucket::Unidentifiable => results.unidentifiable.push(record),
                Bucket::Ignored => results.ignored.push(record),
            }
        }
        Ok(results)
    }

    /// Decide the bucket of a single record. First matching rule wins:
    /// ignored, override, detection error, restricted, compliant.
    fn classify(&self, mut record: DetectionRecord) -> (Bucket, DetectionRecord) {
        record.sort_matches();

        if self.config.is_ignored(&record.project) {
            return (Bucket::Ignored, record);
        }

        if let Some(licence) = self.config.overridden_licence(&record.project) {
            debug!(project = %record.project, licence, "licence overridden");
            record = DetectionRecord::identified(
                record.project,
                vec![LicenceMatch::new(licence, 0.0)],
            );
        }

        if record.has_error() {
            return (Bucket::Unidentifiable, record);
        }

        let restricted = match record.most_probable() {
            None => None,
            Some(m) if self.config.is_restricted(&m.licence) => {
                info!(
                    "Project '{}' most probable licence '{}' is restricted",
                    record.project, m.licence
                );
                Some(true)
            }
            Some(_) => Some(false),
        };

        match restricted {
            None => (Bucket::Unidentifiable, record),
            Some(true) => (Bucket::Restricted, record),
            Some(false) => (Bucket::Compliant, record),
        }
    }
}
