use clap::Args;
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;

use obdispatch::defaults;
use obdispatch::{log_error, paths, status, DispatchPlan, Dispatcher};

use crate::commands::CmdResult;

#[derive(Args, Debug)]
pub struct DispatchArgs {
    /// Component to run (e.g., data_loader, methods/spagcn, metric_collectors/summary)
    #[arg(long, value_name = "PATH")]
    pub component: String,

    /// Repository root holding the component directories [default: current directory]
    #[arg(long = "ob-root", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Dispatcher config file [default: <root>/ob-dispatch.json when present]
    #[arg(long = "ob-config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the resolved command as JSON instead of running it
    #[arg(long = "ob-dry-run")]
    pub dry_run: bool,

    /// Suppress dispatcher status lines (errors are still reported)
    #[arg(long = "ob-quiet")]
    pub quiet: bool,

    /// Arguments forwarded to the component
    #[arg(last = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub forwarded: Vec<OsString>,
}

#[derive(Serialize)]
#[serde(tag = "command")]
pub enum DispatchOutput {
    #[serde(rename = "dispatch.plan")]
    Plan { plan: DispatchPlan },
    #[serde(rename = "dispatch.run")]
    Run { plan: DispatchPlan, exit_code: i32 },
}

pub fn run(args: DispatchArgs) -> CmdResult<DispatchOutput> {
    status::set_quiet(args.quiet);

    let root = paths::resolve_root(args.root.as_deref())?;
    let config_path = args.config.as_deref().map(paths::expand);
    let config = defaults::load_config(&root, config_path.as_deref())?;
    let dispatcher = Dispatcher::new(root, config);

    if args.dry_run {
        let plan = dispatcher.plan(&args.component, &args.forwarded)?;
        return Ok((DispatchOutput::Plan { plan }, 0));
    }

    let outcome = dispatcher.dispatch(&args.component, &args.forwarded)?;
    if !outcome.success() {
        log_error!(
            "Dispatcher",
            "Component script failed with exit code {}",
            outcome.exit_code
        );
    }

    Ok((
        DispatchOutput::Run {
            exit_code: outcome.exit_code,
            plan: outcome.plan,
        },
        outcome.exit_code,
    ))
}
