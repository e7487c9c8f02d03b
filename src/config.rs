//! Run configuration and the load → index → apply → write pipeline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::corrections::CorrectionsIndex;
use crate::error::{MergeError, MergeResult};
use crate::json_io::{read_json_array, same_file, write_json_atomic};
use crate::merge::{apply_corrections, MergeReport};

pub const DEFAULT_QUESTIONS_FILE: &str = "../docs/assets/questions.json";
pub const DEFAULT_CORRECTIONS_FILE: &str = "corrections.json";
pub const DEFAULT_OUTPUT_FILE: &str = "../docs/assets/questions_updated.json";

#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub questions: PathBuf,
    pub corrections: PathBuf,
    /// Must differ from `questions`; the dataset is never overwritten.
    pub output: PathBuf,
    /// Optional JSON `MergeReport`, written before the output is moved into place.
    pub report: Option<PathBuf>,
    /// Report what would change without writing the output.
    pub dry_run: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            questions: PathBuf::from(DEFAULT_QUESTIONS_FILE),
            corrections: PathBuf::from(DEFAULT_CORRECTIONS_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            report: None,
            dry_run: false,
        }
    }
}

fn refuse_overwrite(target: &Path, questions: &Path, what: &str) -> MergeResult<()> {
    if target == questions || same_file(target, questions) {
        return Err(MergeError::write(
            target,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{what} path is the questions file, refusing to overwrite it"),
            ),
        ));
    }
    Ok(())
}

/// Runs one merge. Nothing is written unless every step before the write succeeds.
///
/// Both inputs are checked for existence before either is parsed.
pub fn run(cfg: &MergeConfig) -> MergeResult<MergeReport> {
    refuse_overwrite(&cfg.output, &cfg.questions, "output")?;
    if let Some(report_path) = &cfg.report {
        refuse_overwrite(report_path, &cfg.questions, "report")?;
    }

    for path in [&cfg.questions, &cfg.corrections] {
        if !path.exists() {
            return Err(MergeError::MissingInput { path: path.clone() });
        }
    }

    info!("Reading files...");
    let mut questions = read_json_array(&cfg.questions)?;
    let corrections = read_json_array(&cfg.corrections)?;
    info!(
        "Read {} questions from {}, {} correction records from {}",
        questions.len(),
        cfg.questions.display(),
        corrections.len(),
        cfg.corrections.display()
    );

    let index = CorrectionsIndex::from_records(&corrections);
    info!("Loaded {} corrections.", index.len());

    let report = apply_corrections(&mut questions, &index);

    if let Some(report_path) = &cfg.report {
        write_json_atomic(report_path, &report)?;
        info!("Report written → {}", report_path.display());
    }

    if cfg.dry_run {
        info!("Dry run: {} updates not written", report.updated);
        return Ok(report);
    }

    info!("Writing output to {}...", cfg.output.display());
    if let Err(e) = write_json_atomic(&cfg.output, &questions) {
        // the report describes an output that never landed
        if let Some(report_path) = &cfg.report {
            if let Err(rm) = fs::remove_file(report_path) {
                warn!("Cannot remove report {}: {rm}", report_path.display());
            }
        }
        return Err(e);
    }
    info!("Done! Successfully updated {} questions.", report.updated);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    fn write(path: &Path, v: &Value) {
        fs::write(path, serde_json::to_string_pretty(v).unwrap()).unwrap();
    }

    fn setup(questions: Value, corrections: Value) -> (TempDir, MergeConfig) {
        let dir = tempdir().unwrap();
        let cfg = MergeConfig {
            questions: dir.path().join("questions.json"),
            corrections: dir.path().join("corrections.json"),
            output: dir.path().join("questions_updated.json"),
            report: None,
            dry_run: false,
        };
        write(&cfg.questions, &questions);
        write(&cfg.corrections, &corrections);
        (dir, cfg)
    }

    fn read(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_default_paths() {
        let cfg = MergeConfig::default();
        assert_eq!(cfg.questions, PathBuf::from("../docs/assets/questions.json"));
        assert_eq!(cfg.corrections, PathBuf::from("corrections.json"));
        assert_eq!(cfg.output, PathBuf::from("../docs/assets/questions_updated.json"));
        assert!(cfg.report.is_none());
        assert!(!cfg.dry_run);
    }

    #[test]
    fn test_end_to_end() {
        let (_dir, cfg) = setup(
            json!([
                {"_id": "Q1", "sub_category": "A", "text": "one"},
                {"_id": "Q2", "sub_category": "B", "text": "two"}
            ]),
            json!([{"_id": "Q1", "sub_category": "B"}]),
        );

        let report = run(&cfg).unwrap();

        assert_eq!(report.corrections_loaded, 1);
        assert_eq!(report.updated, 1);
        assert_eq!(
            read(&cfg.output),
            json!([
                {"_id": "Q1", "sub_category": "B", "text": "one"},
                {"_id": "Q2", "sub_category": "B", "text": "two"}
            ])
        );
        // source dataset untouched
        assert_eq!(read(&cfg.questions)[0]["sub_category"], json!("A"));
    }

    #[test]
    fn test_rerun_on_output_is_idempotent() {
        let (dir, cfg) = setup(
            json!([
                {"_id": "Q1", "sub_category": "A"},
                {"_id": "Q2", "sub_category": "B"}
            ]),
            json!([
                {"_id": "Q1", "sub_category": "X"},
                {"_id": "Q2", "sub_category": "Y"}
            ]),
        );
        run(&cfg).unwrap();

        let second = MergeConfig {
            questions: cfg.output.clone(),
            output: dir.path().join("second.json"),
            ..cfg.clone()
        };
        let report = run(&second).unwrap();

        assert_eq!(report.updated, 0);
        assert_eq!(read(&second.output), read(&cfg.output));
    }

    #[test]
    fn test_missing_questions_writes_nothing() {
        let (_dir, cfg) = setup(json!([]), json!([]));
        fs::remove_file(&cfg.questions).unwrap();

        let err = run(&cfg).unwrap_err();

        assert!(matches!(err, MergeError::MissingInput { ref path } if *path == cfg.questions));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_missing_corrections_writes_nothing() {
        let (_dir, cfg) = setup(json!([{"_id": "Q1", "sub_category": "A"}]), json!([]));
        fs::remove_file(&cfg.corrections).unwrap();

        let err = run(&cfg).unwrap_err();

        assert!(matches!(err, MergeError::MissingInput { ref path } if *path == cfg.corrections));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_malformed_corrections_writes_nothing() {
        let (_dir, cfg) = setup(json!([{"_id": "Q1", "sub_category": "A"}]), json!([]));
        fs::write(&cfg.corrections, "{ not json").unwrap();

        let err = run(&cfg).unwrap_err();

        assert!(matches!(err, MergeError::MalformedInput { .. }));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_refuses_to_overwrite_questions() {
        let (_dir, mut cfg) = setup(
            json!([{"_id": "Q1", "sub_category": "A"}]),
            json!([{"_id": "Q1", "sub_category": "B"}]),
        );
        cfg.output = cfg.questions.clone();

        let err = run(&cfg).unwrap_err();

        assert!(matches!(err, MergeError::Write { .. }));
        assert_eq!(read(&cfg.questions)[0]["sub_category"], json!("A"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (_dir, mut cfg) = setup(
            json!([{"_id": "Q1", "sub_category": "A"}]),
            json!([{"_id": "Q1", "sub_category": "B"}]),
        );
        cfg.dry_run = true;

        let report = run(&cfg).unwrap();

        assert_eq!(report.updated, 1);
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_missing_corrections_reported_before_malformed_questions() {
        let (_dir, cfg) = setup(json!([]), json!([]));
        fs::write(&cfg.questions, "[{ broken").unwrap();
        fs::remove_file(&cfg.corrections).unwrap();

        let err = run(&cfg).unwrap_err();

        assert!(matches!(err, MergeError::MissingInput { ref path } if *path == cfg.corrections));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_report_written_alongside_output() {
        let (dir, mut cfg) = setup(
            json!([{"_id": "Q1", "sub_category": "A"}]),
            json!([{"_id": "Q1", "sub_category": "B"}, {"_id": "Q7", "sub_category": "C"}]),
        );
        cfg.report = Some(dir.path().join("report.json"));

        run(&cfg).unwrap();

        let report = read(dir.path().join("report.json").as_path());
        assert_eq!(report["updated"], json!(1));
        assert_eq!(report["unmatched_ids"], json!(["Q7"]));
        assert_eq!(report["changes"][0]["old"], json!("A"));
        assert!(cfg.output.exists());
    }

    #[test]
    fn test_unwritable_report_writes_nothing() {
        let (dir, mut cfg) = setup(
            json!([{"_id": "Q1", "sub_category": "A"}]),
            json!([{"_id": "Q1", "sub_category": "B"}]),
        );
        cfg.report = Some(dir.path().join("no_such_dir").join("report.json"));

        let err = run(&cfg).unwrap_err();

        assert!(matches!(err, MergeError::Write { .. }));
        assert!(!cfg.output.exists());
    }

    #[test]
    fn test_unwritable_output_removes_report() {
        let (dir, mut cfg) = setup(
            json!([{"_id": "Q1", "sub_category": "A"}]),
            json!([{"_id": "Q1", "sub_category": "B"}]),
        );
        let report_path = dir.path().join("report.json");
        cfg.report = Some(report_path.clone());
        cfg.output = dir.path().join("no_such_dir").join("out.json");

        let err = run(&cfg).unwrap_err();

        assert!(matches!(err, MergeError::Write { .. }));
        assert!(!report_path.exists());
    }
}
