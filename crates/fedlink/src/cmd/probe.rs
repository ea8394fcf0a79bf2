use fedlink_channel::{expect_success, AmbassadorLink, ConnectConfig};
use fedlink_schema::CommandKind;
use serde::Serialize;

use crate::cmd::{parse_duration, ProbeArgs};
use crate::exit::{channel_error, CliError, CliResult, PROTOCOL_ERROR, SUCCESS, USAGE};
use crate::output::{print_status, OutputFormat};

#[derive(Serialize)]
struct ProbeOutput {
    event: &'static str,
    host: String,
    event_port: u16,
    command_port: u16,
    init_ack: CommandKind,
    reported_time: Option<i64>,
}

pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    if args.end < args.start {
        return Err(CliError::new(USAGE, "--end must not be before --start"));
    }
    let config = ConnectConfig {
        max_tries: args.connect_tries,
        retry_delay: parse_duration(&args.retry_delay)?,
        ..ConnectConfig::default()
    };

    let mut link = AmbassadorLink::connect(&args.host, args.port, &config)
        .map_err(|err| channel_error("link bootstrap failed", err))?;

    let init_ack = link
        .commands
        .write_init(args.start, args.end)
        .map_err(|err| channel_error("init failed", err))?;
    expect_success(init_ack).map_err(|err| channel_error("init rejected", err))?;

    let reported_time = match args.advance {
        Some(time) => Some(advance(&mut link, time)?),
        None => None,
    };

    link.commands
        .write_command(CommandKind::ShutDown)
        .map_err(|err| channel_error("shutdown failed", err))?;

    let output = ProbeOutput {
        event: "probe",
        host: args.host,
        event_port: args.port,
        command_port: link.command_port(),
        init_ack,
        reported_time,
    };
    let mut rows = vec![
        ("event_port", output.event_port.to_string()),
        ("command_port", output.command_port.to_string()),
        ("init_ack", output.init_ack.to_string()),
    ];
    if let Some(time) = output.reported_time {
        rows.push(("reported_time", time.to_string()));
    }
    print_status(&output, &rows, format);

    link.close();
    Ok(SUCCESS)
}

/// Grant time and drain the event channel until the federate reports END.
fn advance(link: &mut AmbassadorLink, time: i64) -> CliResult<i64> {
    link.commands
        .write_advance_time(time)
        .map_err(|err| channel_error("advance failed", err))?;

    loop {
        let kind = link
            .events
            .read_command()
            .map_err(|err| channel_error("event read failed", err))?;
        match kind {
            CommandKind::End => {
                return link
                    .events
                    .read_time()
                    .map_err(|err| channel_error("event read failed", err));
            }
            CommandKind::NextEvent => {
                link.events
                    .read_time()
                    .map_err(|err| channel_error("event read failed", err))?;
            }
            CommandKind::MsgRecv => {
                link.events
                    .read_receive_message()
                    .map_err(|err| channel_error("event read failed", err))?;
            }
            other => {
                return Err(CliError::new(
                    PROTOCOL_ERROR,
                    format!("unexpected {other} on event channel"),
                ))
            }
        }
    }
}
