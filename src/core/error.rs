use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,
    ConfigInvalidValue,

    ComponentInvalidRef,
    ComponentNotFound,
    ComponentEntryScriptNotFound,

    ProcessSpawnFailed,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",

            ErrorCode::ComponentInvalidRef => "component.invalid_ref",
            ErrorCode::ComponentNotFound => "component.not_found",
            ErrorCode::ComponentEntryScriptNotFound => "component.entry_script_not_found",

            ErrorCode::ProcessSpawnFailed => "process.spawn_failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInvalidRefDetails {
    pub component: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNotFoundDetails {
    pub component: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryScriptNotFoundDetails {
    pub component: String,
    pub path: String,
    pub tried: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnFailedDetails {
    pub program: String,
    pub command: Vec<String>,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn component_invalid_ref(component: impl Into<String>, problem: impl Into<String>) -> Self {
        let problem = problem.into();
        let details = to_details(ComponentInvalidRefDetails {
            component: component.into(),
            problem: problem.clone(),
        });

        Self::new(
            ErrorCode::ComponentInvalidRef,
            format!("Invalid component: {}", problem),
            details,
        )
    }

    pub fn component_not_found(component: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        let details = to_details(ComponentNotFoundDetails {
            component: component.into(),
            path: path.clone(),
        });

        Self::new(
            ErrorCode::ComponentNotFound,
            format!("Component directory not found: {}", path),
            details,
        )
        .with_hint("Check --component against the directories under --ob-root")
    }

    pub fn entry_script_not_found(
        component: impl Into<String>,
        path: impl Into<String>,
        tried: Vec<String>,
    ) -> Self {
        let path = path.into();
        let message = format!("No {} found in {}", tried.join(" or "), path);
        let details = to_details(EntryScriptNotFoundDetails {
            component: component.into(),
            path,
            tried,
        });

        Self::new(ErrorCode::ComponentEntryScriptNotFound, message, details)
    }

    pub fn spawn_failed(program: impl Into<String>, command: Vec<String>, error: impl Into<String>) -> Self {
        let program = program.into();
        let error = error.into();
        let message = format!("Failed to start {}: {}", program, error);
        let details = to_details(SpawnFailedDetails {
            program,
            command,
            error,
        });

        Self::new(ErrorCode::ProcessSpawnFailed, message, details)
            .with_hint("Make sure the interpreter is installed and on PATH, or set it in ob-dispatch.json")
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let path = path.into();
        let message = format!("Invalid JSON in configuration {}: {}", path, err);
        let details = to_details(ConfigInvalidJsonDetails {
            path,
            error: err.to_string(),
        });

        Self::new(ErrorCode::ConfigInvalidJson, message, details)
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let problem = problem.into();
        let message = format!("Invalid configuration value for {}: {}", key, problem);
        let details = to_details(ConfigInvalidValueDetails {
            key,
            value,
            problem,
        });

        Self::new(ErrorCode::ConfigInvalidValue, message, details)
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let error = error.into();
        let message = match &context {
            Some(ctx) => format!("IO error ({}): {}", ctx, error),
            None => format!("IO error: {}", error),
        };
        let details = to_details(InternalIoErrorDetails { error, context });

        Self::new(ErrorCode::InternalIoError, message, details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = to_details(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}
