//! # tickcount - Scheduler Tick Counter
//!
//! Counts how many scheduler ticks happen on a CPU or set of CPUs over an
//! interval by driving the kernel function tracer (ftrace) and counting
//! `scheduler_tick` entries in its log.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  --cpu 3 / 0-3 / <cpuset>                                    │
//! └──────────────────────┬───────────────────────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  cpus: CpuSelection ─▶ range_parser ─▶ mask ─▶ CpuMask       │
//! │              │                                               │
//! │              └──▶ cpuset (/proc/filesystems, <mount>/cpus)   │
//! └──────────────────────┬───────────────────────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ftrace: TraceSession                                        │
//! │    configure ─▶ start ─▶ [command] ─▶ stop ─▶ persist/analyze│
//! └──────────────────────┬───────────────────────────────────────┘
//!                        ▼  tracing_on, trace, set_ftrace_filter,
//!                           tracing_cpumask, current_tracer
//!                    kernel trace-control directory
//! ```
//!
//! ## Module Structure
//!
//! - [`cpus`]: `--cpu` argument to [`domain::CpuMask`]
//! - [`ftrace`]: trace-control handle and session state machine
//! - [`preflight`]: interface checks before the first write
//! - [`cli`]: command-line arguments and mode selection
//! - [`domain`]: CPU ranges, masks and error types
//!
//! ## Operational Modes
//!
//! 1. **Wrap** (`tickcount --cpu 0 sleep 1`): trace while a command runs
//! 2. **Start** (`--start`): configure and start tracing, then exit
//! 3. **End** (`--end`): stop tracing started earlier and report
//!
//! Start and end rely on the kernel keeping tracing state between the two
//! invocations. That state is global, so only one measurement may be active
//! on a system at a time.

pub mod cli;
pub mod cpus;
pub mod domain;
pub mod ftrace;
pub mod preflight;
