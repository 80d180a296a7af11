// Public modules
pub mod component;
pub mod defaults;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod paths;
pub mod status;

// Re-export common types for convenience
pub use component::{ComponentRef, EntryScript, Runtime};
pub use dispatch::{DispatchOutcome, DispatchPlan, Dispatcher};
pub use error::{Error, ErrorCode, Result};
pub use filter::{filter_args, DropWhen, FilterRule, FilteredArgs, RemovedFlag};
