use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fedlink_channel::{ChannelConfig, FederateLink, ProtocolChannel, Request};
use fedlink_schema::CommandKind;
use serde::Serialize;
use tracing::{info, warn};

use crate::cmd::ServeArgs;
use crate::exit::{channel_error, CliError, CliResult, INTERNAL, PROTOCOL_ERROR, SUCCESS};
use crate::output::{print_request, print_status, OutputFormat};

#[derive(Serialize)]
struct ListeningOutput<'a> {
    event: &'static str,
    host: &'a str,
    port: u16,
}

pub fn run(args: ServeArgs, format: OutputFormat) -> CliResult<i32> {
    let mut events = ProtocolChannel::with_config(ChannelConfig::default());
    let port = events
        .prepare(&args.host, args.port)
        .map_err(|err| channel_error("bind failed", err))?;

    print_status(
        &ListeningOutput {
            event: "listening",
            host: &args.host,
            port,
        },
        &[("host", args.host.clone()), ("port", port.to_string())],
        format,
    );

    let mut link =
        FederateLink::establish(events).map_err(|err| channel_error("link bootstrap failed", err))?;
    info!(command_port = ?link.command_port(), "federate link established");

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(&link, running.clone())?;

    let mut undef_streak = 0u32;
    loop {
        let request = link
            .commands
            .read_request()
            .map_err(|err| channel_error("request failed", err))?;

        if request != Request::Other(CommandKind::Undef) {
            undef_streak = 0;
            print_request(&request, format);
        }

        match request {
            Request::Init(_) | Request::UpdateNode(_) => link
                .commands
                .write_command(CommandKind::Success)
                .map_err(|err| channel_error("acknowledge failed", err))?,
            Request::AdvanceTime(time) => {
                link.events
                    .write_command(CommandKind::End)
                    .and_then(|()| link.events.write_time(time))
                    .map_err(|err| channel_error("time report failed", err))?;
            }
            Request::SendMessage(_) | Request::ConfigureRadio(_) => {}
            Request::ShutDown => break,
            Request::Other(CommandKind::Undef) => {
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                undef_streak += 1;
                if undef_streak >= args.undef_limit.max(1) {
                    return Err(CliError::new(
                        PROTOCOL_ERROR,
                        format!("protocol broken: {undef_streak} consecutive UNDEF commands"),
                    ));
                }
            }
            Request::Other(kind) => warn!(%kind, "ignoring command without body"),
        }
    }

    link.close();
    Ok(SUCCESS)
}

/// On Ctrl-C, shut the command socket down so the blocked read returns.
fn install_ctrlc_handler(link: &FederateLink, running: Arc<AtomicBool>) -> CliResult<()> {
    let handle = link
        .commands
        .shutdown_handle()
        .map_err(|err| channel_error("shutdown handle failed", err))?;

    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
        let _ = handle.shutdown();
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
