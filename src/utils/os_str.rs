//! Lossy views of OS strings for logs and JSON output.
//!
//! Arguments and paths are carried as `OsString`/`PathBuf` so they reach the
//! child process byte for byte. Only their rendered forms are lossy.

use serde::Serializer;
use std::ffi::{OsStr, OsString};
use std::path::Path;

pub fn lossy(value: &OsStr) -> String {
    value.to_string_lossy().into_owned()
}

pub fn lossy_all(values: &[OsString]) -> Vec<String> {
    values.iter().map(|v| lossy(v)).collect()
}

pub fn serialize_path<S>(path: &Path, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&path.to_string_lossy())
}

pub fn serialize_os_strings<S>(
    values: &[OsString],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(values.iter().map(|v| v.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::path::PathBuf;

    #[derive(Serialize)]
    struct Shown {
        #[serde(serialize_with = "serialize_path")]
        path: PathBuf,
        #[serde(serialize_with = "serialize_os_strings")]
        args: Vec<OsString>,
    }

    #[test]
    fn lossy_all_keeps_order() {
        let values = vec![OsString::from("--x"), OsString::from("1")];
        assert_eq!(lossy_all(&values), vec!["--x", "1"]);
    }

    #[test]
    fn serializes_paths_and_args_as_strings() {
        let shown = Shown {
            path: PathBuf::from("/repo/methods/x/script.py"),
            args: vec![OsString::from("--name"), OsString::from("d1")],
        };
        let json = serde_json::to_value(&shown).unwrap();
        assert_eq!(json["path"], "/repo/methods/x/script.py");
        assert_eq!(json["args"], serde_json::json!(["--name", "d1"]));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_values_serialize_with_replacement() {
        use std::os::unix::ffi::OsStringExt;

        let shown = Shown {
            path: PathBuf::from(OsString::from_vec(b"/repo\xff/script.py".to_vec())),
            args: vec![OsString::from_vec(b"out\xff".to_vec())],
        };
        let json = serde_json::to_value(&shown).unwrap();
        assert_eq!(json["path"], "/repo\u{FFFD}/script.py");
        assert_eq!(json["args"][0], "out\u{FFFD}");
    }
}
