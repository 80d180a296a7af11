//! Component references and entry-script resolution.
//!
//! A component is a directory under the repository root (`data_loader`,
//! `methods/<name>`, `metric_collectors/<name>`) holding exactly one
//! recognized entry script.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component as PathComponent, Path, PathBuf};

use crate::defaults::EntryScriptCandidate;
use crate::error::{Error, Result};
use crate::utils::os_str;

/// Runtime an entry script is executed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Python,
    R,
}

impl Runtime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Python => "python",
            Runtime::R => "R",
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, root-relative component identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ComponentRef(String);

impl ComponentRef {
    /// Parse a raw `--component` value.
    ///
    /// Rejects empty values, absolute paths and `..` segments so a reference
    /// can never escape the repository root.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::component_invalid_ref(raw, "Component must not be empty"));
        }

        if Path::new(trimmed).is_absolute() || trimmed.starts_with('/') {
            return Err(Error::component_invalid_ref(
                raw,
                format!("Component must be relative to the repository root, got '{}'", raw),
            ));
        }

        let trimmed = trimmed.trim_end_matches('/');
        if Path::new(trimmed)
            .components()
            .any(|c| matches!(c, PathComponent::ParentDir | PathComponent::Prefix(_)))
        {
            return Err(Error::component_invalid_ref(
                raw,
                format!("Component must not leave the repository root, got '{}'", raw),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The script a component resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryScript {
    #[serde(serialize_with = "os_str::serialize_path")]
    pub path: PathBuf,
    pub runtime: Runtime,
}

/// Locate the entry script for `component` under `root`.
///
/// Candidates are checked in order and the first existing file wins.
/// Candidates restricted with `only_for` are skipped for every other component.
pub fn resolve(
    root: &Path,
    component: &ComponentRef,
    candidates: &[EntryScriptCandidate],
) -> Result<EntryScript> {
    let component_dir = component.dir(root);

    if !component_dir.is_dir() {
        return Err(Error::component_not_found(
            component.as_str(),
            component_dir.display().to_string(),
        ));
    }

    let applicable: Vec<&EntryScriptCandidate> = candidates
        .iter()
        .filter(|c| c.applies_to(component))
        .collect();

    for candidate in &applicable {
        let path = component_dir.join(&candidate.file);
        if path.is_file() {
            return Ok(EntryScript {
                path,
                runtime: candidate.runtime,
            });
        }
    }

    let tried = applicable.iter().map(|c| c.file.clone()).collect();
    Err(Error::entry_script_not_found(
        component.as_str(),
        component_dir.display().to_string(),
        tried,
    ))
}
