//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use super::mode::Mode;
use crate::cpus::cpuset::{DEFAULT_FILESYSTEMS_FILE, DEFAULT_MOUNT_DIR};
use crate::cpus::CpusetResolver;
use crate::domain::ModeError;
use crate::ftrace::TraceFs;

#[derive(Parser, Debug)]
#[command(
    name = "tickcount",
    version,
    about = "Count scheduler ticks on a CPU or cpuset using ftrace",
    arg_required_else_help = true,
    override_usage = "tickcount [OPTIONS] --cpu <CPU> [COMMAND]...",
    after_help = "\
EXAMPLES:
    sudo tickcount --cpu 3 sleep 10          Ticks on CPU 3 while `sleep 10` runs
    sudo tickcount --cpu 0-1 --start         Begin measuring CPUs 0 and 1
    sudo tickcount --cpu 0-1 --end --batch   Stop and print the bare count
    sudo tickcount --cpu rt -f ticks.log ./app   Ticks on cpuset `rt`, keep the log

Only one measurement can be active on a system at a time."
)]
pub struct Args {
    /// CPU index, CPU range (e.g. 0-3) or cpuset name
    #[arg(short, long, value_name = "CPU")]
    pub cpu: String,

    /// Begin a measurement and leave tracing running
    #[arg(short, long)]
    pub start: bool,

    /// End a measurement begun with --start and print the result
    #[arg(short, long)]
    pub end: bool,

    /// Also save the trace log to FILE
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Print only the tick count
    #[arg(short, long)]
    pub batch: bool,

    /// Trace-control directory (default: /sys/kernel/tracing or /sys/kernel/debug/tracing)
    #[arg(long, value_name = "DIR", env = "TICKCOUNT_TRACING_DIR")]
    pub tracing_dir: Option<PathBuf>,

    /// Cpuset mount directory
    #[arg(long, value_name = "DIR", env = "TICKCOUNT_CPUSET_DIR", default_value = DEFAULT_MOUNT_DIR)]
    pub cpuset_dir: PathBuf,

    /// Table of filesystems registered with the kernel
    #[arg(
        long,
        value_name = "FILE",
        env = "TICKCOUNT_FILESYSTEMS",
        default_value = DEFAULT_FILESYSTEMS_FILE,
        hide = true
    )]
    pub filesystems_file: PathBuf,

    /// Command to run while tracing
    #[arg(value_name = "COMMAND", trailing_var_arg = true)]
    pub command: Vec<String>,
}

impl Args {
    /// Which of the three modes the flags select.
    ///
    /// # Errors
    /// See [`Mode::from_flags`].
    pub fn mode(&self) -> Result<Mode, ModeError> {
        Mode::from_flags(self.start, self.end, &self.command)
    }

    #[must_use]
    pub fn tracefs(&self) -> TraceFs {
        self.tracing_dir.as_ref().map_or_else(TraceFs::discover, TraceFs::new)
    }

    #[must_use]
    pub fn cpuset_resolver(&self) -> CpusetResolver {
        CpusetResolver::new(&self.filesystems_file, &self.cpuset_dir)
    }
}
