//! Generic utility primitives with zero domain knowledge.
//!
//! - `args` - Splitting dispatcher options from forwarded arguments
//! - `command` - Child process execution with inherited stdio
//! - `io` - File I/O with consistent error handling
//! - `os_str` - Lossy rendering of OS strings for logs and JSON

pub mod args;
pub mod command;
pub mod io;
pub mod os_str;
