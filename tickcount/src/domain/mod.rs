//! Domain model for tickcount
//!
//! CPU ranges and masks, plus the error taxonomy shared by every stage.

pub mod errors;
pub mod types;

pub use types::{CpuMask, CpuRange, RangeList, MAX_CPUS};

pub use errors::{CpuArgError, CpusetError, ModeError, RangeError, SelectionFailure, TraceError};
