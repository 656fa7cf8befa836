//! # tickcount - Main Entry Point
//!
//! Parses the command line, computes the CPU mask and drives one of the
//! three modes: start, end, or wrap a command.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::info;

use tickcount::cli::{Args, Mode};
use tickcount::cpus::select;
use tickcount::ftrace::{Stopped, TraceConfig, TraceSession};
use tickcount::preflight::{check_trace_interface, run_preflight_checks};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;

const PROGRAM: &str = "tickcount";

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("{PROGRAM}: {e:#}");
            EXIT_ERROR
        }
    });
}

/// Parse the command line. `None` means help or version was printed.
fn parse_args() -> Result<Option<Args>> {
    // clap counts TICKCOUNT_* env values as given arguments, so an empty
    // command line has to be caught before parsing
    if std::env::args_os().len() <= 1 {
        Args::command().print_help().context("Failed to print help")?;
        return Ok(None);
    }

    match Args::try_parse() {
        Ok(args) => Ok(Some(args)),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                e.print().context("Failed to print help")?;
                Ok(None)
            }
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                Args::command().print_help().context("Failed to print help")?;
                Ok(None)
            }
            _ => {
                let msg = e.to_string();
                anyhow::bail!("{}", msg.trim_start_matches("error: ").trim_end())
            }
        },
    }
}

fn run() -> Result<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    // Everything up to here is read-only: nothing touches the tracer until
    // the arguments are known to be valid
    let cpumask = select(&args.cpu, &args.cpuset_resolver())?;
    let mode = args.mode()?;
    info!("cpu '{}' -> cpumask {cpumask}, mode {mode:?}", args.cpu);

    let tracefs = args.tracefs();
    let config = TraceConfig::new(cpumask);

    match mode {
        Mode::Start => {
            run_preflight_checks(&tracefs, &config)?;
            TraceSession::configure(tracefs, &config)?.start()?;
        }
        Mode::End => {
            check_trace_interface(&tracefs)?;
            let stopped = TraceSession::resume(tracefs, &config).stop()?;
            report(&stopped, &args)?;
        }
        Mode::Wrap(command) => {
            run_preflight_checks(&tracefs, &config)?;
            let running = TraceSession::configure(tracefs, &config)?.start()?;
            running.run_command(&command);
            let stopped = running.stop()?;
            report(&stopped, &args)?;
        }
    }

    Ok(())
}

fn report(session: &TraceSession<Stopped>, args: &Args) -> Result<()> {
    session.persist(args.file.as_deref())?;
    let report = session.analyze(args.batch)?;
    println!("{report}");
    Ok(())
}
