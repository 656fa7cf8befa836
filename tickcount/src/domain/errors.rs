//! Structured error types for tickcount
//!
//! Using thiserror for automatic Display implementation and error chaining.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RangeError {
    #[error("invalid CPU range '{token}': {problem}")]
    InvalidRange { token: String, problem: &'static str },

    #[error("CPU range '{range}' exceeds the highest supported CPU index {max}")]
    RangeOverflow { range: String, max: u32 },
}

#[derive(Error, Debug)]
pub enum CpusetError {
    #[error("cpuset filesystem is not supported by this kernel (not listed in {})", .0.display())]
    Unsupported(PathBuf),

    #[error("cpuset filesystem is not mounted at {}", .0.display())]
    NotMounted(PathBuf),

    #[error("cannot tell how cpuset files are named under {} (neither cpus nor cpuset.cpus exists)", .0.display())]
    PrefixUnknown(PathBuf),

    #[error("cpuset '{name}' not found ({} does not exist)", .path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a `--cpu` argument could not be turned into a mask.
#[derive(Error, Debug)]
pub enum SelectionFailure {
    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Cpuset(#[from] CpusetError),
}

#[derive(Error, Debug)]
#[error("invalid CPU argument '{arg}'")]
pub struct CpuArgError {
    pub arg: String,
    #[source]
    pub source: SelectionFailure,
}

/// Invalid combination of mode flags and trailing command.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeError {
    #[error("--start and --end cannot be combined")]
    StartAndEnd,

    #[error("a command cannot be given together with --start")]
    CommandWithStart,

    #[error("a command cannot be given together with --end")]
    CommandWithEnd,

    #[error("no command given: pass --start, --end or a command to run while tracing")]
    MissingCommand,
}

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("failed to write '{value}' to {}", .path.display())]
    InterfaceWrite {
        path: PathBuf,
        value: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}", .path.display())]
    InterfaceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to save trace log {} to {}", .from.display(), .to.display())]
    Persist {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_range_error_display() {
        let err = RangeError::InvalidRange { token: "1-x".to_string(), problem: "bad" };
        assert_eq!(err.to_string(), "invalid CPU range '1-x': bad");
    }

    #[test]
    fn test_cpuset_not_found_display() {
        let err = CpusetError::NotFound {
            name: "rt".to_string(),
            path: PathBuf::from("/sys/fs/cgroup/cpuset/rt/cpus"),
        };
        assert!(err.to_string().contains("cpuset 'rt' not found"));
        assert!(err.to_string().contains("/sys/fs/cgroup/cpuset/rt/cpus"));
    }

    #[test]
    fn test_cpu_arg_error_keeps_cause() {
        let err = CpuArgError {
            arg: "rt".to_string(),
            source: CpusetError::NotMounted(PathBuf::from("/dev/cpuset")).into(),
        };
        assert_eq!(err.to_string(), "invalid CPU argument 'rt'");
        let cause = err.source().unwrap().to_string();
        assert!(cause.contains("not mounted at /dev/cpuset"));
    }

    #[test]
    fn test_mode_error_display() {
        assert!(ModeError::StartAndEnd.to_string().contains("cannot be combined"));
    }
}
