//! Per-component argument filtering.
//!
//! Some forwarded flags only make sense for certain components: methods never
//! see the ground-truth solution, metric collectors take no dataset name.
//! Rules are keyed on plain substrings of the component reference.

use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};

use crate::utils::os_str;

/// When a rule drops its flag, relative to the rule's markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropWhen {
    /// Drop when the component reference contains at least one marker.
    ContainsAny,
    /// Drop when the component reference contains none of the markers.
    ContainsNone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub flag: String,
    pub when: DropWhen,
    pub markers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FilterRule {
    pub fn drops_for(&self, component: &str) -> bool {
        let matched = self.markers.iter().any(|m| component.contains(m.as_str()));
        match self.when {
            DropWhen::ContainsAny => matched,
            DropWhen::ContainsNone => !matched,
        }
    }

    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or("not needed by this component")
    }

    fn matches(&self, token: &OsStr) -> bool {
        token == OsStr::new(&self.flag)
    }

    /// Value of a `--flag=value` token, rendered for display.
    fn inline_value(&self, token: &OsStr) -> Option<String> {
        let value = token
            .as_encoded_bytes()
            .strip_prefix(self.flag.as_bytes())?
            .strip_prefix(b"=")?;
        Some(String::from_utf8_lossy(value).into_owned())
    }
}

/// A flag removed by the filter, with the value it consumed (lossy if not UTF-8).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedFlag {
    pub flag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredArgs {
    pub args: Vec<OsString>,
    pub removed: Vec<RemovedFlag>,
}

/// Drop the flags (and their values) that `rules` exclude for `component`.
///
/// Order of the surviving tokens is preserved. A dropped flag consumes the
/// token right after it as its value, whatever that token looks like; a
/// dropped flag at the end of the list is removed alone. The `--flag=value`
/// spelling is removed as a single token. Tokens are compared as OS strings,
/// so arguments that are not valid UTF-8 pass through byte for byte.
pub fn filter_args(component: &str, raw_args: &[OsString], rules: &[FilterRule]) -> FilteredArgs {
    let active: Vec<&FilterRule> = rules.iter().filter(|r| r.drops_for(component)).collect();

    let mut filtered = FilteredArgs::default();
    let mut iter = raw_args.iter();

    while let Some(arg) = iter.next() {
        if let Some(rule) = active.iter().find(|r| r.matches(arg)) {
            filtered.removed.push(RemovedFlag {
                flag: rule.flag.clone(),
                value: iter.next().map(|v| os_str::lossy(v)),
                reason: rule.reason().to_string(),
            });
            continue;
        }

        if let Some((rule, value)) = active
            .iter()
            .find_map(|r| r.inline_value(arg).map(|v| (r, v)))
        {
            filtered.removed.push(RemovedFlag {
                flag: rule.flag.clone(),
                value: Some(value),
                reason: rule.reason().to_string(),
            });
            continue;
        }

        filtered.args.push(arg.clone());
    }

    filtered
}
