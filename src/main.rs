use clap::Parser;

mod commands;
mod output;

use commands::dispatch::{self, DispatchArgs};
use obdispatch::utils::{args, command};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "ob-run-component")]
#[command(version = VERSION)]
#[command(about = "Route an omnibenchmark invocation to a component script")]
#[command(
    after_help = "Every flag except --component and the --ob-* options is forwarded to the\n\
                  component in its original order. --help and --version are forwarded too\n\
                  once --component is given."
)]
struct Cli {
    #[command(flatten)]
    dispatch: DispatchArgs,
}

fn main() -> std::process::ExitCode {
    let argv = args::split_dispatcher_args(std::env::args_os().collect());

    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) => {
            e.exit();
        }
    };

    let dry_run = cli.dispatch.dry_run;
    let result = dispatch::run(cli.dispatch);

    let exit_code = if dry_run {
        let (json_result, exit_code) = output::map_cmd_result_to_json(result);
        if let Err(err) = output::print_json_result(json_result) {
            output::report_error(&err);
            return std::process::ExitCode::from(1);
        }
        exit_code
    } else {
        output::map_cmd_result_to_exit_code(result)
    };

    std::process::ExitCode::from(command::exit_code_to_u8(exit_code))
}
