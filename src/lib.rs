//! Merge corrected `sub_category` labels into a question dataset by `_id`.

pub mod config;
pub mod corrections;
pub mod error;
pub mod json_io;
pub mod merge;
pub mod record;

pub use config::{run, MergeConfig};
pub use corrections::CorrectionsIndex;
pub use error::{MergeError, MergeResult};
pub use merge::{apply_corrections, Change, MergeReport};
pub use record::RecordId;
