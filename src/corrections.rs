//! Lookup from question id to its corrected `sub_category`.

use std::collections::HashMap;

use log::{debug, warn};
use serde_json::Value;

use crate::record::{is_present, RecordId, ID_FIELD, SUB_CATEGORY_FIELD};

/// Corrections keyed by id, built once per run.
///
/// When the same id appears more than once the later record wins.
#[derive(Debug, Default, Clone)]
pub struct CorrectionsIndex {
    labels: HashMap<RecordId, Value>,
    // ids in first-seen order, for stable reporting
    order: Vec<RecordId>,
    skipped: usize,
    duplicates: Vec<RecordId>,
}

impl CorrectionsIndex {
    /// Builds the index from raw correction records.
    ///
    /// Records without a usable `_id` or `sub_category` are skipped and counted.
    pub fn from_records(records: &[Value]) -> Self {
        let mut index = CorrectionsIndex::default();

        for (pos, rec) in records.iter().enumerate() {
            let Some(obj) = rec.as_object() else {
                debug!("correction #{pos}: not an object, skipped");
                index.skipped += 1;
                continue;
            };
            let id = obj
                .get(ID_FIELD)
                .filter(|v| is_present(Some(*v)))
                .and_then(RecordId::from_value);
            let label = obj.get(SUB_CATEGORY_FIELD).filter(|v| is_present(Some(*v)));

            let (Some(id), Some(label)) = (id, label) else {
                debug!("correction #{pos}: missing _id or sub_category, skipped");
                index.skipped += 1;
                continue;
            };
            let label = label.clone();

            if index.labels.insert(id.clone(), label).is_some() {
                warn!("Duplicate correction for id {id}, later entry wins");
                if !index.duplicates.contains(&id) {
                    index.duplicates.push(id);
                }
            } else {
                index.order.push(id);
            }
        }

        index
    }

    pub fn get(&self, id: &RecordId) -> Option<&Value> {
        self.labels.get(id)
    }

    /// Number of distinct ids with a correction.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Ids in the order they first appeared in the corrections source.
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.order.iter()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn duplicates(&self) -> &[RecordId] {
        &self.duplicates
    }
}
