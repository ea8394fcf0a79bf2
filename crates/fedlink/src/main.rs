mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "fedlink", version, about = "Ambassador/federate protocol tools")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_subcommand() {
        let cli = Cli::try_parse_from(["fedlink", "serve", "--port", "45000"])
            .expect("serve args should parse");
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, 45000);
                assert_eq!(args.undef_limit, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_probe_with_advance() {
        let cli = Cli::try_parse_from([
            "fedlink",
            "--format",
            "json",
            "probe",
            "--port",
            "45001",
            "--advance",
            "5000",
        ])
        .expect("probe args should parse");
        match cli.command {
            Command::Probe(args) => {
                assert_eq!(args.advance, Some(5000));
                assert_eq!(args.end, 1_000_000_000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_log_level() {
        let err = Cli::try_parse_from(["fedlink", "--log-level", "loud", "version"])
            .expect_err("invalid level should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
