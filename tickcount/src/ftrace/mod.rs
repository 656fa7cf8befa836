//! Kernel function tracer (ftrace) control
//!
//! - `tracefs`: handle on the trace-control directory
//! - `session`: configure, start, stop, persist and analyze a measurement

pub mod session;
pub mod tracefs;

pub use session::{Configured, Running, SessionState, Stopped, TickReport, TraceSession};
pub use tracefs::TraceFs;

use crate::domain::CpuMask;

/// Kernel function called once per timer tick on each CPU
pub const TICK_FUNCTION: &str = "scheduler_tick";

/// Tracer that records plain function calls
pub const FUNCTION_TRACER: &str = "function";

/// What gets written to the trace-control files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    pub cpumask: CpuMask,
    pub function: &'static str,
    pub tracer: &'static str,
}

impl TraceConfig {
    #[must_use]
    pub fn new(cpumask: CpuMask) -> Self {
        Self { cpumask, function: TICK_FUNCTION, tracer: FUNCTION_TRACER }
    }
}
