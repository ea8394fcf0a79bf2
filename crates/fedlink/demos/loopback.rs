//! Couples an in-process ambassador with an in-process federate over loopback.
//!
//! Run with:
//!   cargo run -p fedlink --example loopback
//!
//! Or run the federate and ambassador as separate processes:
//!   cargo run -p fedlink --features cli -- serve --port 46000
//!   cargo run -p fedlink --features cli -- probe --port 46000 --advance 1000

use std::thread;

use fedlink::channel::{
    expect_success, AmbassadorLink, ConnectConfig, FederateLink, ProtocolChannel, Request,
};
use fedlink::schema::{CommandKind, NodeProperty, RadioChannel};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut events = ProtocolChannel::new();
    let port = events.prepare("127.0.0.1", 0)?;
    eprintln!("federate listening on 127.0.0.1:{port}");

    let federate = thread::spawn(move || -> fedlink::channel::Result<()> {
        let mut link = FederateLink::establish(events)?;
        loop {
            match link.commands.read_request()? {
                Request::Init(bounds) => {
                    eprintln!("federate: init {}..{}", bounds.start_time, bounds.end_time);
                    link.commands.write_command(CommandKind::Success)?;
                }
                Request::UpdateNode(update) => {
                    eprintln!("federate: {:?} x{}", update.kind, update.properties.len());
                    link.commands.write_command(CommandKind::Success)?;
                }
                Request::AdvanceTime(time) => {
                    // Pretend node 1 heard something just before the granted time.
                    link.events.write_command(CommandKind::MsgRecv)?;
                    link.events
                        .write_receive_message(time - 1, 1, 7, RadioChannel::Cch, -72.0)?;
                    link.events.write_command(CommandKind::End)?;
                    link.events.write_time(time)?;
                }
                Request::ShutDown => return Ok(()),
                other => eprintln!("federate: ignoring {:?}", other.command()),
            }
        }
    });

    let mut link = AmbassadorLink::connect("127.0.0.1", port, &ConnectConfig::default())?;
    expect_success(link.commands.write_init(0, 10_000)?)?;
    expect_success(link.commands.write_add_vehicles(
        0,
        &[
            NodeProperty { id: 1, x: 10.0, y: 20.0 },
            NodeProperty { id: 2, x: 30.0, y: 40.0 },
        ],
    )?)?;

    link.commands.write_advance_time(1_000)?;
    loop {
        match link.events.read_command()? {
            CommandKind::MsgRecv => {
                let msg = link.events.read_receive_message()?;
                eprintln!("ambassador: node {} received message {}", msg.node_id, msg.message_id);
            }
            CommandKind::End => {
                eprintln!("ambassador: federate reached {}", link.events.read_time()?);
                break;
            }
            other => return Err(format!("unexpected {other}").into()),
        }
    }

    link.commands.write_command(CommandKind::ShutDown)?;
    federate.join().map_err(|_| "federate thread panicked")??;
    Ok(())
}
