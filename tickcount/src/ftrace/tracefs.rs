//! Handle on the kernel trace-control directory
//!
//! Every control file is opened write-only with truncation and never
//! created, so a missing interface surfaces as a write error.

use log::debug;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::TraceError;

pub const TRACING_ON: &str = "tracing_on";
pub const TRACE: &str = "trace";
pub const SET_FTRACE_FILTER: &str = "set_ftrace_filter";
pub const TRACING_CPUMASK: &str = "tracing_cpumask";
pub const CURRENT_TRACER: &str = "current_tracer";
pub const AVAILABLE_FILTER_FUNCTIONS: &str = "available_filter_functions";

/// Where tracefs usually lives, in probing order
pub const CANDIDATE_DIRS: [&str; 2] = ["/sys/kernel/tracing", "/sys/kernel/debug/tracing"];

/// Trace-control root shared by every process on the system.
///
/// The files behind it are kernel-global: two sessions at once overwrite
/// each other's filter, cpumask and log. Only one measurement may be active
/// system-wide at a time.
#[derive(Debug, Clone)]
pub struct TraceFs {
    root: PathBuf,
}

impl TraceFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// First candidate directory with a `tracing_on` file, else the debugfs path.
    #[must_use]
    pub fn discover() -> Self {
        let root = CANDIDATE_DIRS
            .into_iter()
            .map(Path::new)
            .find(|dir| dir.join(TRACING_ON).exists())
            .unwrap_or(Path::new(CANDIDATE_DIRS[1]));
        debug!("using trace-control root {}", root.display());
        Self::new(root)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Replace the content of control file `file` with `value`.
    ///
    /// # Errors
    /// `InterfaceWrite` if the file is missing or the kernel rejects the write.
    pub fn write(&self, file: &str, value: &str) -> Result<(), TraceError> {
        let path = self.path(file);
        debug!("{} <- {value:?}", path.display());
        let write_err =
            |source| TraceError::InterfaceWrite { path: path.clone(), value: value.to_string(), source };
        let mut control = OpenOptions::new().write(true).truncate(true).open(&path).map_err(write_err)?;
        control.write_all(value.as_bytes()).map_err(write_err)
    }

    /// Open control file `file` for reading.
    ///
    /// # Errors
    /// `InterfaceRead` if it cannot be opened.
    pub fn open(&self, file: &str) -> Result<File, TraceError> {
        let path = self.path(file);
        debug!("reading {}", path.display());
        File::open(&path).map_err(|source| TraceError::InterfaceRead { path, source })
    }
}
