use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use fedlink_channel::Request;
use fedlink_schema::{ipv4_from_wire, RadioConfig};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct RequestOutput<'a> {
    event: &'static str,
    #[serde(flatten)]
    request: &'a Request,
    timestamp: String,
}

pub fn print_request(request: &Request, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = RequestOutput {
                event: "request",
                request,
                timestamp: now_unix_seconds(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "DETAIL"])
                .add_row(vec![request.command().to_string(), describe(request)]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{} {}", request.command(), describe(request));
        }
    }
    let _ = std::io::stdout().flush();
}

/// Print a one-off status record (listening port, link summary).
pub fn print_status<T: Serialize>(value: &T, rows: &[(&str, String)], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (field, value) in rows {
                table.add_row(vec![field.to_string(), value.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let line: Vec<String> = rows
                .iter()
                .map(|(field, value)| format!("{field}={value}"))
                .collect();
            println!("{}", line.join(" "));
        }
    }
    let _ = std::io::stdout().flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn describe(request: &Request) -> String {
    match request {
        Request::Init(bounds) => format!("start={} end={}", bounds.start_time, bounds.end_time),
        Request::UpdateNode(update) => format!(
            "kind={:?} time={} nodes={}",
            update.kind,
            update.time,
            update.properties.len()
        ),
        Request::AdvanceTime(time) => format!("time={time}"),
        Request::SendMessage(msg) => format!(
            "time={} node={} message={} channel={:?} length={} dest={} ttl={}",
            msg.time,
            msg.node_id,
            msg.message_id,
            msg.channel,
            msg.length,
            ipv4_from_wire(msg.address.ip_address),
            msg.address.ttl
        ),
        Request::ConfigureRadio(conf) => {
            let mut parts = vec![format!(
                "time={} node={} message={} radios={:?}",
                conf.time, conf.node_id, conf.message_id, conf.radio_count
            )];
            parts.extend(conf.primary.as_ref().map(|radio| describe_radio("primary", radio)));
            parts.extend(
                conf.secondary
                    .as_ref()
                    .map(|radio| describe_radio("secondary", radio)),
            );
            parts.join(" ")
        }
        Request::ShutDown => String::new(),
        Request::Other(kind) => format!("unhandled {kind}"),
    }
}

fn describe_radio(label: &str, radio: &RadioConfig) -> String {
    let channels = match radio.secondary_channel {
        Some(secondary) => format!("{:?}/{:?}", radio.primary_channel, secondary),
        None => format!("{:?}", radio.primary_channel),
    };
    format!(
        "{label}=[ip={} subnet={} power={} enabled={} channels={channels}]",
        ipv4_from_wire(radio.ip_address),
        ipv4_from_wire(radio.subnet),
        radio.tx_power,
        radio.enabled
    )
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
