/// Macro for prefixed status logging to stderr (silenced by `status::set_quiet`).
///
/// Usage:
/// ```ignore
/// log_status!("Dispatcher", "Routing to component: {}", component);
/// log_status!("Dispatcher", "Executing: {}", command.join(" "));
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, $($arg:tt)*) => {
        if !$crate::status::is_quiet() {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

/// Macro for prefixed error reporting to stderr. Never silenced.
#[macro_export]
macro_rules! log_error {
    ($prefix:expr, $($arg:tt)*) => {
        eprintln!(concat!("[", $prefix, "] ERROR: {}"), format_args!($($arg)*));
    };
}

pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `obdispatch::dispatch` instead of `obdispatch::core::dispatch`
pub use self::core::*;
pub use self::utils::*;
