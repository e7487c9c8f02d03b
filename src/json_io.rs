//! Reading JSON record arrays and writing the merged array back out.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::{MergeError, MergeResult};

/// Loads `path` as a top-level JSON array whose elements are all objects.
pub fn read_json_array(path: &Path) -> MergeResult<Vec<Value>> {
    if !path.exists() {
        return Err(MergeError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| MergeError::malformed(path, e))?;
    let data: Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| MergeError::malformed(path, e))?;

    let arr = match data {
        Value::Array(arr) => arr,
        other => {
            return Err(MergeError::malformed(
                path,
                format!("top-level JSON is {}, expected an array", kind(&other)),
            ))
        }
    };
    if let Some(pos) = arr.iter().position(|v| !v.is_object()) {
        return Err(MergeError::malformed(
            path,
            format!("element #{pos} is {}, expected an object", kind(&arr[pos])),
        ));
    }
    Ok(arr)
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pretty-prints `value` (2-space indent) and moves it into place at `path`.
///
/// The bytes go to a sibling temp file first, so `path` is either left as it
/// was or replaced by the complete document.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> MergeResult<()> {
    let pretty = serde_json::to_string_pretty(value)
        .map_err(|e| MergeError::write(path, io::Error::new(io::ErrorKind::InvalidData, e)))?;

    let tmp = tmp_path(path);
    let written = (|| -> io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(pretty.as_bytes())?;
        file.flush()?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(MergeError::write(path, e));
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output.json");
    path.with_file_name(format!(".{}.tmp.{}", name, std::process::id()))
}

/// True when both paths name the same existing file.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
