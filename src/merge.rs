//! Applies a [`CorrectionsIndex`] to the question dataset in place.

use std::collections::HashSet;

use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::corrections::CorrectionsIndex;
use crate::record::{label_text, labels_equal, RecordId, SUB_CATEGORY_FIELD};

/// One `sub_category` rewrite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub id: RecordId,
    /// `None` when the question had no `sub_category` before.
    pub old: Option<Value>,
    pub new: Value,
}

/// Outcome of a merge pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    pub corrections_loaded: usize,
    pub corrections_skipped: usize,
    pub duplicate_ids: Vec<RecordId>,
    pub records_seen: usize,
    pub updated: usize,
    pub changes: Vec<Change>,
    /// Corrections whose id matched no question.
    pub unmatched_ids: Vec<RecordId>,
}

/// Overwrites `sub_category` on every question whose `_id` has a differing correction.
///
/// Record order and all other fields are left alone; equal labels are not counted.
pub fn apply_corrections(questions: &mut [Value], index: &CorrectionsIndex) -> MergeReport {
    let mut report = MergeReport {
        corrections_loaded: index.len(),
        corrections_skipped: index.skipped(),
        duplicate_ids: index.duplicates().to_vec(),
        records_seen: questions.len(),
        ..Default::default()
    };
    let mut matched: HashSet<RecordId> = HashSet::new();

    for question in questions.iter_mut() {
        let Some(obj) = question.as_object_mut() else {
            continue;
        };
        let Some(id) = RecordId::of(obj) else {
            continue;
        };
        let Some(new_label) = index.get(&id) else {
            continue;
        };
        matched.insert(id.clone());

        let old_label = obj.get(SUB_CATEGORY_FIELD);
        if labels_equal(old_label, new_label) {
            continue;
        }

        info!(
            "[{id}] Changing '{}' -> '{}'",
            label_text(old_label),
            label_text(Some(new_label))
        );
        let old = obj.insert(SUB_CATEGORY_FIELD.to_string(), new_label.clone());
        report.changes.push(Change {
            id,
            old,
            new: new_label.clone(),
        });
        report.updated += 1;
    }

    report.unmatched_ids = index
        .ids()
        .filter(|id| !matched.contains(*id))
        .cloned()
        .collect();
    for id in &report.unmatched_ids {
        warn!("Correction for id {id} matched no question");
    }

    report
}
