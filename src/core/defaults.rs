use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::component::{ComponentRef, Runtime};
use crate::error::{Error, Result};
use crate::filter::{DropWhen, FilterRule};
use crate::paths;
use crate::utils::io;

/// Root configuration structure for ob-dispatch.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    #[serde(default)]
    pub interpreters: Interpreters,

    #[serde(default = "default_entry_scripts")]
    pub entry_scripts: Vec<EntryScriptCandidate>,

    #[serde(default = "default_filter_rules")]
    pub filter_rules: Vec<FilterRule>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            interpreters: Interpreters::default(),
            entry_scripts: default_entry_scripts(),
            filter_rules: default_filter_rules(),
        }
    }
}

/// Programs used to run each entry-script runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpreters {
    #[serde(default = "default_python")]
    pub python: String,

    #[serde(default = "default_r")]
    pub r: String,
}

impl Default for Interpreters {
    fn default() -> Self {
        Self {
            python: default_python(),
            r: default_r(),
        }
    }
}

impl Interpreters {
    pub fn for_runtime(&self, runtime: Runtime) -> &str {
        match runtime {
            Runtime::Python => &self.python,
            Runtime::R => &self.r,
        }
    }
}

/// A filename the resolver looks for inside a component directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryScriptCandidate {
    pub file: String,
    pub runtime: Runtime,
    /// Restrict this candidate to one exact component reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_for: Option<String>,
}

impl EntryScriptCandidate {
    fn new(file: &str, runtime: Runtime, only_for: Option<&str>) -> Self {
        Self {
            file: file.to_string(),
            runtime,
            only_for: only_for.map(str::to_string),
        }
    }

    pub fn applies_to(&self, component: &ComponentRef) -> bool {
        self.only_for
            .as_deref()
            .map_or(true, |only| only == component.as_str())
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_python() -> String {
    "python3".to_string()
}

fn default_r() -> String {
    "Rscript".to_string()
}

pub fn default_entry_scripts() -> Vec<EntryScriptCandidate> {
    vec![
        EntryScriptCandidate::new("script.py", Runtime::Python, None),
        EntryScriptCandidate::new("script.R", Runtime::R, None),
        EntryScriptCandidate::new("load_spatial_data.py", Runtime::Python, Some("data_loader")),
    ]
}

pub fn default_filter_rules() -> Vec<FilterRule> {
    vec![
        FilterRule {
            flag: "--data.solution".to_string(),
            when: DropWhen::ContainsNone,
            markers: vec!["true_ranking".to_string(), "metrics".to_string()],
            reason: Some("not needed by this component".to_string()),
        },
        FilterRule {
            flag: "--name".to_string(),
            when: DropWhen::ContainsAny,
            markers: vec!["metric_collector".to_string()],
            reason: Some("not needed by metric collector".to_string()),
        },
    ]
}

// =============================================================================
// Validation
// =============================================================================

impl DispatcherConfig {
    pub fn validate(&self) -> Result<()> {
        if self.interpreters.python.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "interpreters.python",
                None,
                "interpreter must not be empty",
            ));
        }
        if self.interpreters.r.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "interpreters.r",
                None,
                "interpreter must not be empty",
            ));
        }

        if self.entry_scripts.is_empty() {
            return Err(Error::config_invalid_value(
                "entry_scripts",
                None,
                "at least one entry script is required",
            ));
        }
        for candidate in &self.entry_scripts {
            let file = candidate.file.trim();
            if file.is_empty() || file.contains('/') || file.contains('\\') {
                return Err(Error::config_invalid_value(
                    "entry_scripts.file",
                    Some(candidate.file.clone()),
                    "must be a plain file name",
                ));
            }
        }

        for rule in &self.filter_rules {
            if !rule.flag.starts_with("--") || rule.flag.len() <= 2 {
                return Err(Error::config_invalid_value(
                    "filter_rules.flag",
                    Some(rule.flag.clone()),
                    "flag must start with '--'",
                ));
            }
            if rule.markers.is_empty() || rule.markers.iter().any(|m| m.is_empty()) {
                return Err(Error::config_invalid_value(
                    "filter_rules.markers",
                    Some(rule.flag.clone()),
                    "markers must be non-empty strings",
                ));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load dispatcher configuration.
///
/// With an explicit path the file must exist. Without one, `<root>/ob-dispatch.json`
/// is used when present and built-in defaults otherwise.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<DispatcherConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = paths::config_file(root);
            if !path.exists() {
                return Ok(DispatcherConfig::default());
            }
            path
        }
    };

    let content = io::read_file(&path, &format!("read {}", path.display()))?;
    parse_config(&content, &path.display().to_string())
}

/// Parse and validate configuration JSON. `source` names the file in errors.
pub fn parse_config(content: &str, source: &str) -> Result<DispatcherConfig> {
    let config: DispatcherConfig =
        serde_json::from_str(content).map_err(|e| Error::config_invalid_json(source, e))?;
    config.validate()?;
    Ok(config)
}
