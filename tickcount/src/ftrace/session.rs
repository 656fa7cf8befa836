//! Tracing session state machine
//!
//! `Configured -> Running -> Stopped`, enforced by the type of the session
//! handle. A bracketed measurement spans two processes: `--start` leaves the
//! kernel tracing, and `--end` picks the running session back up with
//! [`TraceSession::resume`].

use log::{debug, info, warn};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process::{Command, ExitStatus};

use super::tracefs::{
    TraceFs, CURRENT_TRACER, SET_FTRACE_FILTER, TRACE, TRACING_CPUMASK, TRACING_ON,
};
use super::TraceConfig;
use crate::domain::TraceError;

/// Marker trait for session states.
pub trait SessionState: fmt::Debug {
    const NAME: &'static str;
}

#[derive(Debug)]
pub struct Configured;

#[derive(Debug)]
pub struct Running;

#[derive(Debug)]
pub struct Stopped;

impl SessionState for Configured {
    const NAME: &'static str = "configured";
}

impl SessionState for Running {
    const NAME: &'static str = "running";
}

impl SessionState for Stopped {
    const NAME: &'static str = "stopped";
}

#[derive(Debug)]
pub struct TraceSession<S: SessionState> {
    tracefs: TraceFs,
    function: String,
    _state: S,
}

impl<S: SessionState> TraceSession<S> {
    #[cfg(test)]
    fn state(&self) -> &'static str {
        S::NAME
    }

    fn into_state<T: SessionState>(self, state: T) -> TraceSession<T> {
        info!("trace session {} -> {}", S::NAME, T::NAME);
        TraceSession { tracefs: self.tracefs, function: self.function, _state: state }
    }
}

impl TraceSession<Configured> {
    /// Reset the tracer and point it at `config`.
    ///
    /// Destructive: any earlier trace log and function filter are discarded.
    /// A failure part way leaves the kernel in whatever state the last
    /// successful write produced.
    ///
    /// # Errors
    /// `InterfaceWrite` on the first control file that cannot be written.
    pub fn configure(tracefs: TraceFs, config: &TraceConfig) -> Result<Self, TraceError> {
        tracefs.write(TRACING_ON, "0")?;
        tracefs.write(TRACE, "")?;
        tracefs.write(SET_FTRACE_FILTER, "")?;
        tracefs.write(SET_FTRACE_FILTER, config.function)?;
        tracefs.write(TRACING_CPUMASK, &config.cpumask.to_string())?;
        tracefs.write(CURRENT_TRACER, config.tracer)?;
        info!(
            "tracing {} with the {} tracer on cpumask {}",
            config.function, config.tracer, config.cpumask
        );
        Ok(Self { tracefs, function: config.function.to_string(), _state: Configured })
    }

    /// Turn tracing on.
    ///
    /// # Errors
    /// `InterfaceWrite` if `tracing_on` cannot be written.
    pub fn start(self) -> Result<TraceSession<Running>, TraceError> {
        self.tracefs.write(TRACING_ON, "1")?;
        Ok(self.into_state(Running))
    }
}

impl TraceSession<Running> {
    /// Take over a session left running by an earlier invocation.
    #[must_use]
    pub fn resume(tracefs: TraceFs, config: &TraceConfig) -> Self {
        info!("resuming trace session in {}", tracefs.root().display());
        Self { tracefs, function: config.function.to_string(), _state: Running }
    }

    /// Run `command` to completion while tracing.
    ///
    /// The outcome is only logged: a command that fails to spawn or exits
    /// non-zero does not stop the measurement.
    pub fn run_command(&self, command: &[String]) -> Option<ExitStatus> {
        let Some((program, args)) = command.split_first() else {
            warn!("no command to run");
            return None;
        };
        info!("running {command:?}");
        match Command::new(program).args(args).status() {
            Ok(status) => {
                if status.success() {
                    debug!("{program} exited with {status}");
                } else {
                    warn!("{program} exited with {status}");
                }
                Some(status)
            }
            Err(e) => {
                warn!("failed to run {program}: {e}");
                None
            }
        }
    }

    /// Turn tracing off. Harmless if it already is.
    ///
    /// # Errors
    /// `InterfaceWrite` if `tracing_on` cannot be written.
    pub fn stop(self) -> Result<TraceSession<Stopped>, TraceError> {
        self.tracefs.write(TRACING_ON, "0")?;
        Ok(self.into_state(Stopped))
    }
}

impl TraceSession<Stopped> {
    /// Copy the trace log verbatim to `target`, if given.
    ///
    /// # Errors
    /// `Persist` if the log cannot be read or the copy cannot be written.
    pub fn persist(&self, target: Option<&Path>) -> Result<(), TraceError> {
        let Some(target) = target else {
            return Ok(());
        };
        let from = self.tracefs.path(TRACE);
        let persist_err =
            |source| TraceError::Persist { from: from.clone(), to: target.to_path_buf(), source };

        // Streamed copy: tracefs reports a size of zero for the log
        let mut log = File::open(&from).map_err(persist_err)?;
        let mut saved = File::create(target).map_err(persist_err)?;
        let bytes = io::copy(&mut log, &mut saved).map_err(persist_err)?;
        info!("saved {bytes} bytes of trace log to {}", target.display());
        Ok(())
    }

    /// Count the ticks recorded in the trace log.
    ///
    /// # Errors
    /// `InterfaceRead` if the log cannot be read.
    pub fn analyze(&self, batch: bool) -> Result<TickReport, TraceError> {
        let ticks = self.count_ticks()?;
        Ok(TickReport { ticks, batch })
    }

    fn count_ticks(&self) -> Result<u64, TraceError> {
        let read_err = |source| TraceError::InterfaceRead { path: self.tracefs.path(TRACE), source };
        let mut reader = BufReader::new(self.tracefs.open(TRACE)?);
        let needle = self.function.as_bytes();
        let mut line = Vec::new();
        let mut ticks = 0;
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).map_err(read_err)? == 0 {
                break;
            }
            if !line.starts_with(b"#") && line.windows(needle.len()).any(|w| w == needle) {
                ticks += 1;
            }
        }
        debug!("{ticks} lines matching {}", self.function);
        Ok(ticks)
    }
}

/// Result of a measurement, rendered as the bare count in batch mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub ticks: u64,
    pub batch: bool,
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.batch {
            write!(f, "{}", self.ticks)
        } else {
            write!(f, "{} ticks occurred", self.ticks)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpus::{compute, parse};
    use std::fs;
    use tempfile::TempDir;

    const CONTROL_FILES: [&str; 5] =
        [TRACING_ON, TRACE, SET_FTRACE_FILTER, TRACING_CPUMASK, CURRENT_TRACER];

    const TICK_LINE: &str =
        "          <idle>-0       [000] d.h1.  1042.123456: scheduler_tick <-update_process_times\n";

    fn fake_tracefs() -> (TempDir, TraceFs) {
        let dir = TempDir::new().unwrap();
        for file in CONTROL_FILES {
            fs::write(dir.path().join(file), "stale\n").unwrap();
        }
        let tracefs = TraceFs::new(dir.path());
        (dir, tracefs)
    }

    fn config(cpus: &str) -> TraceConfig {
        TraceConfig::new(compute(&parse(cpus).unwrap()).unwrap())
    }

    fn read(dir: &TempDir, file: &str) -> String {
        fs::read_to_string(dir.path().join(file)).unwrap()
    }

    fn append(dir: &TempDir, text: &str) {
        let mut log = fs::read_to_string(dir.path().join(TRACE)).unwrap();
        log.push_str(text);
        fs::write(dir.path().join(TRACE), log).unwrap();
    }

    #[test]
    fn test_configure_resets_interface() {
        let (dir, tracefs) = fake_tracefs();
        let session = TraceSession::configure(tracefs, &config("0-1")).unwrap();

        assert_eq!(session.state(), "configured");
        assert_eq!(read(&dir, TRACING_ON), "0");
        assert_eq!(read(&dir, TRACE), "");
        assert_eq!(read(&dir, SET_FTRACE_FILTER), "scheduler_tick");
        assert_eq!(read(&dir, TRACING_CPUMASK), "3");
        assert_eq!(read(&dir, CURRENT_TRACER), "function");
    }

    #[test]
    fn test_configure_fails_without_interface() {
        let dir = TempDir::new().unwrap();
        let err = TraceSession::configure(TraceFs::new(dir.path()), &config("0")).unwrap_err();
        assert!(matches!(err, TraceError::InterfaceWrite { .. }));
    }

    #[test]
    fn test_full_cycle_counts_ticks() {
        let (dir, tracefs) = fake_tracefs();
        let running = TraceSession::configure(tracefs, &config("0")).unwrap().start().unwrap();
        assert_eq!(running.state(), "running");
        assert_eq!(read(&dir, TRACING_ON), "1");

        append(&dir, "# tracer: function\n#\n");
        append(&dir, TICK_LINE);
        append(&dir, TICK_LINE);

        let stopped = running.stop().unwrap();
        assert_eq!(stopped.state(), "stopped");
        assert_eq!(read(&dir, TRACING_ON), "0");

        let report = stopped.analyze(false).unwrap();
        assert_eq!(report.ticks, 2);
        assert_eq!(report.to_string(), "2 ticks occurred");
        assert_eq!(stopped.analyze(true).unwrap().to_string(), "2");
    }

    #[test]
    fn test_resume_and_stop() {
        let (dir, tracefs) = fake_tracefs();
        fs::write(dir.path().join(TRACE), TICK_LINE).unwrap();
        fs::write(dir.path().join(TRACING_ON), "1").unwrap();

        let stopped = TraceSession::resume(tracefs, &config("0")).stop().unwrap();
        assert_eq!(read(&dir, TRACING_ON), "0");
        assert_eq!(stopped.analyze(true).unwrap().ticks, 1);
    }

    #[test]
    fn test_run_command_sees_tracing_on() {
        let (dir, tracefs) = fake_tracefs();
        let running = TraceSession::configure(tracefs, &config("0")).unwrap().start().unwrap();
        let seen = dir.path().join("seen");
        let script = format!("cat {} > {}", dir.path().join(TRACING_ON).display(), seen.display());

        let status = running.run_command(&["sh".to_string(), "-c".to_string(), script]);
        assert!(status.unwrap().success());
        assert_eq!(fs::read_to_string(seen).unwrap(), "1");
    }

    #[test]
    fn test_run_command_failure_is_not_fatal() {
        let (_dir, tracefs) = fake_tracefs();
        let running = TraceSession::configure(tracefs, &config("0")).unwrap().start().unwrap();

        let status = running.run_command(&["false".to_string()]);
        assert!(!status.unwrap().success());
        assert!(running.run_command(&["/nonexistent/command".to_string()]).is_none());
        assert!(running.run_command(&[]).is_none());
        running.stop().unwrap();
    }

    #[test]
    fn test_persist_copies_log() {
        let (dir, tracefs) = fake_tracefs();
        fs::write(dir.path().join(TRACE), TICK_LINE).unwrap();
        let stopped = TraceSession::resume(tracefs, &config("0")).stop().unwrap();

        let target = dir.path().join("saved.log");
        stopped.persist(Some(&target)).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), TICK_LINE);

        stopped.persist(None).unwrap();
    }

    #[test]
    fn test_persist_to_bad_path() {
        let (dir, tracefs) = fake_tracefs();
        let stopped = TraceSession::resume(tracefs, &config("0")).stop().unwrap();

        let err = stopped.persist(Some(&dir.path().join("missing/dir/saved.log"))).unwrap_err();
        assert!(matches!(err, TraceError::Persist { .. }));
    }
}
