use std::collections::BTreeMap;

use serde::Serialize;

use crate::cmd::EnvinfoArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_status, OutputFormat};

#[derive(Serialize)]
struct FramingInfo {
    varint_max_bytes: usize,
    max_frame_len: u32,
    default_max_payload: usize,
    poll_attempts: u32,
    poll_timeout_ms: u128,
    retry_delay_ms: u128,
}

#[derive(Serialize)]
struct EnvInfoOutput {
    event: &'static str,
    version: String,
    target: String,
    os: String,
    arch: String,
    framing: FramingInfo,
    environment: BTreeMap<String, Option<String>>,
}

pub fn run(_args: EnvinfoArgs, format: OutputFormat) -> CliResult<i32> {
    let recovery = fedlink_frame::RecoveryPolicy::default();

    let mut env = BTreeMap::new();
    for key in ["FEDLINK_HOST", "FEDLINK_PORT", "RUST_LOG"] {
        env.insert(key.to_string(), std::env::var(key).ok());
    }

    let output = EnvInfoOutput {
        event: "envinfo",
        version: env!("CARGO_PKG_VERSION").to_string(),
        target: target_triple(),
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        framing: FramingInfo {
            varint_max_bytes: fedlink_frame::VARINT_MAX_BYTES,
            max_frame_len: fedlink_frame::MAX_FRAME_LEN,
            default_max_payload: fedlink_frame::DEFAULT_MAX_PAYLOAD,
            poll_attempts: recovery.poll_attempts,
            poll_timeout_ms: recovery.poll_timeout.as_millis(),
            retry_delay_ms: recovery.retry_delay.as_millis(),
        },
        environment: env,
    };

    let mut rows = vec![
        ("version", output.version.clone()),
        ("target", output.target.clone()),
        ("platform", format!("{} ({})", output.os, output.arch)),
        (
            "recovery",
            format!(
                "{} polls x {} ms, {} ms apart",
                output.framing.poll_attempts,
                output.framing.poll_timeout_ms,
                output.framing.retry_delay_ms
            ),
        ),
    ];
    for (key, value) in &output.environment {
        rows.push((key.as_str(), value.as_deref().unwrap_or("(not set)").to_string()));
    }

    print_status(&output, &rows, format);
    Ok(SUCCESS)
}

fn target_triple() -> String {
    if let Some(target) = option_env!("FEDLINK_BUILD_TARGET") {
        return target.to_string();
    }

    match (std::env::consts::ARCH, std::env::consts::OS) {
        ("aarch64", "macos") => "aarch64-apple-darwin".to_string(),
        ("x86_64", "macos") => "x86_64-apple-darwin".to_string(),
        ("aarch64", "linux") => "aarch64-unknown-linux-gnu".to_string(),
        ("x86_64", "linux") => "x86_64-unknown-linux-gnu".to_string(),
        (arch, os) => format!("{arch}-unknown-{os}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_looks_like_triple() {
        let target = target_triple();
        assert!(target.split('-').count() >= 3);
    }
}
