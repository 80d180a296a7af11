//! CLI response formatting and output.
//!
//! Provides the JSON envelope used by `--ob-dry-run`, plain error reporting for
//! normal runs, and exit code mapping.

use obdispatch::error::Hint;
use obdispatch::{log_error, Error, ErrorCode, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

/// Print a result as a JSON envelope on stdout.
pub fn print_json_result(result: Result<serde_json::Value>) -> Result<()> {
    match result {
        Ok(data) => print_response(&CliResponse::success(data)),
        Err(err) => print_response(&CliResponse::<()>::from_error(&err)),
    }
}

/// Report an error on stderr in the dispatcher's plain log format.
pub fn report_error(err: &Error) {
    log_error!("Dispatcher", "{}", err.message);
    for hint in &err.hints {
        eprintln!("[Dispatcher] hint: {}", hint.message);
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

/// Exit code of a command run without JSON output.
///
/// Successful results are not serialized; errors are reported on stderr.
pub fn map_cmd_result_to_exit_code<T>(result: Result<(T, i32)>) -> i32 {
    match result {
        Ok((_, exit_code)) => exit_code,
        Err(err) => {
            report_error(&err);
            exit_code_for_error(err.code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson | ErrorCode::ConfigInvalidValue => 2,

        ErrorCode::ComponentInvalidRef
        | ErrorCode::ComponentNotFound
        | ErrorCode::ComponentEntryScriptNotFound
        | ErrorCode::ProcessSpawnFailed
        | ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_errors_map_to_exit_code_1() {
        let err = Error::component_not_found("methods/x", "/repo/methods/x");
        let (value, exit_code) = map_cmd_result_to_json::<serde_json::Value>(Err(err));
        assert!(value.is_err());
        assert_eq!(exit_code, 1);
    }

    #[test]
    fn spawn_failure_maps_to_exit_code_1() {
        assert_eq!(exit_code_for_error(ErrorCode::ProcessSpawnFailed), 1);
    }

    #[test]
    fn config_errors_map_to_exit_code_2() {
        assert_eq!(exit_code_for_error(ErrorCode::ConfigInvalidJson), 2);
        assert_eq!(exit_code_for_error(ErrorCode::ConfigInvalidValue), 2);
    }

    #[test]
    fn rejected_component_ref_maps_to_exit_code_1() {
        let err = Error::component_invalid_ref("../x", "Component must not leave the repository root");
        assert_eq!(exit_code_for_error(err.code), 1);
    }

    #[test]
    fn plain_run_returns_child_code_without_serializing() {
        struct NotSerializable;
        assert_eq!(map_cmd_result_to_exit_code(Ok((NotSerializable, 7))), 7);
    }

    #[test]
    fn plain_run_error_maps_code() {
        let err = Error::config_invalid_value("interpreters.python", None, "interpreter must not be empty");
        assert_eq!(map_cmd_result_to_exit_code::<()>(Err(err)), 2);
    }

    #[test]
    fn child_exit_code_passes_through() {
        let (value, exit_code) = map_cmd_result_to_json(Ok(("ran", 42)));
        assert_eq!(value.unwrap(), serde_json::json!("ran"));
        assert_eq!(exit_code, 42);
    }

    #[test]
    fn error_envelope_serializes_code_and_hints() {
        let err = Error::component_not_found("methods/x", "/repo/methods/x");
        let json = CliResponse::<()>::from_error(&err).to_json().unwrap();
        assert!(json.contains("\"code\": \"component.not_found\""));
        assert!(json.contains("\"hints\""));
        assert!(json.contains("\"success\": false"));
    }
}
