//! Run omnibenchmark on the host.
//!
//! Equivalent to `ob run benchmark -b benchmark.yaml`, with the benchmark file
//! and the `ob` executable overridable. The exit code of `ob` is propagated.

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use obdispatch::utils::command;
use obdispatch::{log_error, log_status};

#[derive(Parser)]
#[command(name = "run-omnibenchmark")]
#[command(version)]
#[command(about = "Run the omnibenchmark CLI against a benchmark definition")]
struct Cli {
    /// Benchmark definition file
    #[arg(default_value = "benchmark.yaml")]
    benchmark: PathBuf,

    /// omnibenchmark executable
    #[arg(long, default_value = "ob", value_name = "PROGRAM")]
    ob: OsString,

    /// Extra arguments appended to `ob run benchmark`
    #[arg(last = true, allow_hyphen_values = true)]
    extra: Vec<OsString>,
}

fn ob_args(cli: &Cli) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["run".into(), "benchmark".into(), "-b".into()];
    args.push(cli.benchmark.clone().into_os_string());
    args.extend(cli.extra.iter().cloned());
    args
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let args = ob_args(&cli);

    let mut command_line = vec![cli.ob.clone()];
    command_line.extend(args.iter().cloned());
    log_status!(
        "omnibenchmark",
        "Executing: {}",
        command::display_command(&command_line)
    );

    let code = match command::run_passthrough(&cli.ob, &args) {
        Ok(code) => code,
        Err(err) => {
            log_error!("omnibenchmark", "{}", err.message);
            1
        }
    };

    std::process::ExitCode::from(command::exit_code_to_u8(code))
}
