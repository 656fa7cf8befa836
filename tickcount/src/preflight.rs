//! Pre-flight checks for tickcount
//!
//! Validates the trace interface before the first control-file write, so a
//! missing tracefs or an unsupported kernel produces an actionable message
//! instead of a bare I/O error.

#![allow(unsafe_code)] // geteuid() requires unsafe

use anyhow::{bail, Context, Result};
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::ftrace::tracefs::{AVAILABLE_FILTER_FUNCTIONS, TRACING_ON};
use crate::ftrace::{TraceConfig, TraceFs};

/// Run all pre-flight checks before configuring a session
pub fn run_preflight_checks(tracefs: &TraceFs, config: &TraceConfig) -> Result<()> {
    check_privileges();
    check_trace_interface(tracefs)?;
    check_filter_function(tracefs, config.function)?;
    Ok(())
}

/// Writing to tracefs needs root; warn early, the writes themselves will fail
fn check_privileges() {
    if unsafe { libc::geteuid() } != 0 {
        warn!("not running as root, writes to the trace interface will probably be denied");
    }
}

/// Check that the trace-control directory looks like tracefs
pub fn check_trace_interface(tracefs: &TraceFs) -> Result<()> {
    if !tracefs.path(TRACING_ON).exists() {
        bail!(
            "Trace interface not found: {} does not exist.\n\n\
             Mount it with one of:\n  \
             mount -t tracefs nodev /sys/kernel/tracing\n  \
             mount -t debugfs nodev /sys/kernel/debug\n\
             or point --tracing-dir at the right directory.",
            tracefs.path(TRACING_ON).display()
        );
    }
    Ok(())
}

/// Check that the kernel can trace `function`, when it says which functions it can trace
fn check_filter_function(tracefs: &TraceFs, function: &str) -> Result<()> {
    let path = tracefs.path(AVAILABLE_FILTER_FUNCTIONS);
    let Ok(file) = File::open(&path) else {
        // Not readable here, let set_ftrace_filter report the problem
        return Ok(());
    };

    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        // Entries look like "scheduler_tick" or "some_fn [module]"
        if line.split_whitespace().next() == Some(function) {
            return Ok(());
        }
    }

    bail!(
        "The kernel cannot trace {function}: it is not listed in {}.\n\n\
         Check that the kernel is built with CONFIG_FUNCTION_TRACER.",
        path.display()
    );
}
