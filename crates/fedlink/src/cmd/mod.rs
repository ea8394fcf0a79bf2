use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod envinfo;
pub mod probe;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a stub federate that acknowledges every request.
    Serve(ServeArgs),
    /// Play the ambassador against a federate and report the link.
    Probe(ProbeArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args, format),
        Command::Probe(args) => probe::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host or address to bind.
    #[arg(long, env = "FEDLINK_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// Port the ambassador connects to. 0 picks an ephemeral port.
    #[arg(long, env = "FEDLINK_PORT", default_value = "0")]
    pub port: u16,
    /// Consecutive UNDEF commands tolerated before giving up.
    #[arg(long, default_value = "3")]
    pub undef_limit: u32,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Federate host.
    #[arg(long, env = "FEDLINK_HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// Federate event port.
    #[arg(long, env = "FEDLINK_PORT")]
    pub port: u16,
    /// Simulation start time sent with INIT.
    #[arg(long, default_value = "0")]
    pub start: i64,
    /// Simulation end time sent with INIT.
    #[arg(long, default_value = "1000000000")]
    pub end: i64,
    /// Advance the federate to this time and wait for its END report.
    #[arg(long, value_name = "TIME")]
    pub advance: Option<i64>,
    /// Connection attempts before giving up.
    #[arg(long, default_value = "10")]
    pub connect_tries: u32,
    /// Pause between connection attempts (e.g. 1s, 250ms).
    #[arg(long, default_value = "1s")]
    pub retry_delay: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if millis {
        Ok(Duration::from_millis(value))
    } else {
        Ok(Duration::from_secs(value))
    }
}
