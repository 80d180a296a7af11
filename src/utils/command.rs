//! Command execution primitives with consistent error handling.

use std::ffi::{OsStr, OsString};
use std::process::{Command, ExitStatus, Stdio};

use crate::error::{Error, Result};
use crate::utils::os_str;

/// Run `program args...` with stdin/stdout/stderr passed through and wait for it.
///
/// Returns the child's exit code. Failing to start the child at all is an
/// error; a non-zero exit is not.
pub fn run_passthrough(program: &OsStr, args: &[OsString]) -> Result<i32> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| {
            let mut command = vec![os_str::lossy(program)];
            command.extend(os_str::lossy_all(args));
            Error::spawn_failed(os_str::lossy(program), command, e.to_string())
        })?;

    Ok(exit_code(status))
}

/// Map an exit status to a process exit code.
///
/// Signal-terminated children on Unix map to `128 + signal`, like a shell.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Narrow an exit code to what a process can report.
///
/// Codes above 255 saturate and negative codes (Windows NTSTATUS values such
/// as `0xC0000005`) become 1, so a failure never reads as success.
pub fn exit_code_to_u8(code: i32) -> u8 {
    match code {
        0..=255 => code as u8,
        c if c > 255 => 255,
        _ => 1,
    }
}

/// Render a command line for display.
pub fn display_command(parts: &[OsString]) -> String {
    os_str::lossy_all(parts).join(" ")
}
