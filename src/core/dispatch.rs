//! Resolve, filter, execute, propagate.
//!
//! One dispatch is a single linear transaction: the component reference is
//! resolved to an entry script, the forwarded arguments are filtered for that
//! component, the script runs as a blocking child process, and its exit code
//! becomes the dispatcher's.

use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::component::{self, ComponentRef, EntryScript};
use crate::defaults::DispatcherConfig;
use crate::error::Result;
use crate::filter::{filter_args, RemovedFlag};
use crate::utils::{command, os_str};

/// Everything decided before the child process starts.
///
/// Arguments and the command line stay OS strings; they are only rendered
/// lossily when the plan is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchPlan {
    pub component: ComponentRef,
    pub script: EntryScript,
    pub interpreter: String,
    #[serde(serialize_with = "os_str::serialize_os_strings")]
    pub forwarded_args: Vec<OsString>,
    #[serde(serialize_with = "os_str::serialize_os_strings")]
    pub filtered_args: Vec<OsString>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<RemovedFlag>,
    #[serde(serialize_with = "os_str::serialize_os_strings")]
    pub command: Vec<OsString>,
}

impl DispatchPlan {
    pub fn program(&self) -> &OsStr {
        &self.command[0]
    }

    pub fn program_args(&self) -> &[OsString] {
        &self.command[1..]
    }
}

/// Result of a dispatch that got as far as running the child.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub plan: DispatchPlan,
    pub exit_code: i32,
}

impl DispatchOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub struct Dispatcher {
    root: PathBuf,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(root: impl Into<PathBuf>, config: DispatcherConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Locate the entry script for a component.
    pub fn resolve(&self, component: &ComponentRef) -> Result<EntryScript> {
        component::resolve(&self.root, component, &self.config.entry_scripts)
    }

    /// Resolve and filter without running anything.
    pub fn plan(&self, component: &str, raw_args: &[OsString]) -> Result<DispatchPlan> {
        let component = ComponentRef::parse(component)?;

        log_status!("Dispatcher", "Routing to component: {}", component);
        log_status!(
            "Dispatcher",
            "Forwarding arguments: {}",
            command::display_command(raw_args)
        );

        let script = self.resolve(&component)?;
        log_status!(
            "Dispatcher",
            "Found {} script: {}",
            script.runtime,
            script.path.display()
        );

        let filtered = filter_args(component.as_str(), raw_args, &self.config.filter_rules);
        for removed in &filtered.removed {
            log_status!("Dispatcher", "Removing {} ({})", removed.flag, removed.reason);
        }

        let interpreter = self
            .config
            .interpreters
            .for_runtime(script.runtime)
            .to_string();

        let mut command = Vec::with_capacity(filtered.args.len() + 2);
        command.push(OsString::from(&interpreter));
        command.push(script.path.clone().into_os_string());
        command.extend(filtered.args.iter().cloned());

        Ok(DispatchPlan {
            component,
            script,
            interpreter,
            forwarded_args: raw_args.to_vec(),
            filtered_args: filtered.args,
            removed: filtered.removed,
            command,
        })
    }

    /// Run a planned command and wait for it.
    pub fn execute(&self, plan: &DispatchPlan) -> Result<i32> {
        log_status!(
            "Dispatcher",
            "Executing: {}",
            command::display_command(&plan.command)
        );
        command::run_passthrough(plan.program(), plan.program_args())
    }

    /// Plan and execute in one step.
    pub fn dispatch(&self, component: &str, raw_args: &[OsString]) -> Result<DispatchOutcome> {
        let plan = self.plan(component, raw_args)?;
        let exit_code = self.execute(&plan)?;
        Ok(DispatchOutcome { plan, exit_code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Runtime;
    use crate::error::ErrorCode;
    use crate::status;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn args(tokens: &[&str]) -> Vec<OsString> {
        tokens.iter().map(OsString::from).collect()
    }

    fn repo_with(component: &str, file: &str, body: &str) -> TempDir {
        let root = TempDir::new().unwrap();
        let dir = root.path().join(component);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), body).unwrap();
        root
    }

    #[test]
    fn plan_builds_interpreter_command_line() {
        status::set_quiet(true);
        let root = repo_with("methods/spagcn", "script.py", "");
        let dispatcher = Dispatcher::new(root.path(), DispatcherConfig::default());

        let plan = dispatcher
            .plan(
                "methods/spagcn",
                &args(&["--name", "d1", "--data.solution", "sol.h5ad", "--output_dir", "out"]),
            )
            .unwrap();

        assert_eq!(plan.script.runtime, Runtime::Python);
        assert_eq!(plan.interpreter, "python3");
        assert_eq!(plan.filtered_args, args(&["--name", "d1", "--output_dir", "out"]));
        assert_eq!(plan.removed.len(), 1);
        assert_eq!(plan.command[0], "python3");
        assert!(Path::new(&plan.command[1]).ends_with("methods/spagcn/script.py"));
        assert_eq!(&plan.command[2..], plan.filtered_args.as_slice());
    }

    #[test]
    fn r_scripts_use_rscript() {
        status::set_quiet(true);
        let root = repo_with("methods/sparkx", "script.R", "");
        let dispatcher = Dispatcher::new(root.path(), DispatcherConfig::default());

        let plan = dispatcher.plan("methods/sparkx", &[]).unwrap();
        assert_eq!(plan.program(), "Rscript");
        assert_eq!(plan.program_args().len(), 1);
    }

    #[test]
    fn plan_fails_for_missing_component() {
        status::set_quiet(true);
        let root = TempDir::new().unwrap();
        let dispatcher = Dispatcher::new(root.path(), DispatcherConfig::default());

        let err = dispatcher.plan("methods/ghost", &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ComponentNotFound);
    }

    #[cfg(unix)]
    #[test]
    fn dispatch_propagates_child_exit_code() {
        status::set_quiet(true);
        let root = repo_with("methods/failing", "script.py", "exit 3\n");
        let mut config = DispatcherConfig::default();
        config.interpreters.python = "sh".to_string();
        let dispatcher = Dispatcher::new(root.path(), config);

        let outcome = dispatcher.dispatch("methods/failing", &[]).unwrap();
        assert_eq!(outcome.exit_code, 3);
        assert!(!outcome.success());
    }

    #[cfg(unix)]
    #[test]
    fn dispatch_passes_filtered_args_to_child() {
        status::set_quiet(true);
        let root = repo_with(
            "methods/echo",
            "script.py",
            "printf '%s\\n' \"$@\" > \"$(dirname \"$0\")/args.txt\"\n",
        );
        let mut config = DispatcherConfig::default();
        config.interpreters.python = "sh".to_string();
        let dispatcher = Dispatcher::new(root.path(), config);

        let outcome = dispatcher
            .dispatch(
                "methods/echo",
                &args(&["--data.solution", "sol.h5ad", "--name", "d1"]),
            )
            .unwrap();
        assert_eq!(outcome.exit_code, 0);

        let written = fs::read_to_string(root.path().join("methods/echo/args.txt")).unwrap();
        assert_eq!(written, "--name\nd1\n");
    }

    #[test]
    fn dispatch_reports_spawn_failure() {
        status::set_quiet(true);
        let root = repo_with("methods/noint", "script.py", "");
        let mut config = DispatcherConfig::default();
        config.interpreters.python = "definitely-not-an-interpreter-xyz".to_string();
        let dispatcher = Dispatcher::new(root.path(), config);

        let err = dispatcher.dispatch("methods/noint", &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ProcessSpawnFailed);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_root_reaches_child_intact() {
        use std::os::unix::ffi::OsStringExt;

        status::set_quiet(true);
        let tmp = TempDir::new().unwrap();
        let mut raw = tmp.path().as_os_str().to_os_string().into_vec();
        raw.extend_from_slice(b"/repo\xff");
        let root = PathBuf::from(OsString::from_vec(raw));
        let dir = root.join("methods/x");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("script.py"), "exit 0\n").unwrap();

        let mut config = DispatcherConfig::default();
        config.interpreters.python = "sh".to_string();
        let dispatcher = Dispatcher::new(&root, config);

        let outcome = dispatcher.dispatch("methods/x", &[]).unwrap();
        assert_eq!(outcome.plan.command[1], dir.join("script.py").into_os_string());
        assert_eq!(outcome.exit_code, 0);
    }
}
