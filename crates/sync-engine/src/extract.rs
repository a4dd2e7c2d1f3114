//! Desired-state extraction.

use std::path::Path;

use config::FieldMapping;
use tracing::{debug, warn};

use crate::{Classifier, DesiredState, RawRecord, Result, record};

/// Map `record` through `mapping`, classifying each mapped value.
///
/// Mapped columns missing from the record are skipped with a warning. An
/// empty mapping yields an empty state.
pub fn extract(record: &RawRecord, mapping: &FieldMapping, classifier: &Classifier) -> DesiredState {
    let mut desired = DesiredState::new();
    for (source, column) in mapping {
        match record.get(column) {
            Some(raw) => {
                let value = classifier.classify(column, raw);
                debug!(source = %source, column = %column, "Extracted {value}");
                desired.insert(source.clone(), value);
            }
            None => warn!(source = %source, column = %column, "Mapped column not found in data file"),
        }
    }
    desired
}

/// Read the data file and extract its desired state in one step.
pub fn extract_file(path: &Path, mapping: &FieldMapping) -> Result<DesiredState> {
    let record = record::read_record(path)?;
    Ok(extract(&record, mapping, &Classifier::for_data_file(path)))
}
