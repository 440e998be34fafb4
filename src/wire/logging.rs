use crate::util::parse_bool_flag;
use std::fs::OpenOptions;
use std::io::{IsTerminal, Write};

const DEFAULT_FRAME_LOG_PATH: &str = "/tmp/turnloom-frames.log";
const TRACE_FRAMES_ENV: &str = "TURNLOOM_TRACE_FRAMES";
const FRAME_LOG_PATH_ENV: &str = "TURNLOOM_LOG_PATH";

pub fn frame_trace_enabled() -> bool {
    std::env::var(TRACE_FRAMES_ENV)
        .ok()
        .and_then(parse_bool_flag)
        .unwrap_or(false)
}

pub fn emit_frame_trace(payload: &str) {
    if !frame_trace_enabled() {
        return;
    }
    let message = format!("TURNLOOM_WIRE TRACE frame\n{payload}\n");
    emit_log_message(&message);
}

pub fn emit_frame_parse_error(payload: &str, parse_error: &serde_json::Error) {
    let message =
        format!("TURNLOOM_WIRE ERROR frame_parse_failed error={parse_error}\npayload:\n{payload}\n");
    emit_log_message(&message);
}

pub fn emit_dropped_carry(remainder: &str) {
    let message = format!("TURNLOOM_WIRE WARN dropped_unterminated_carry\nremainder:\n{remainder}\n");
    emit_log_message(&message);
}

fn emit_log_message(message: &str) {
    if let Some(path) = resolve_log_path() {
        if append_log_file(&path, message).is_ok() {
            return;
        }
    }

    eprintln!("{message}");
}

fn resolve_log_path() -> Option<String> {
    std::env::var(FRAME_LOG_PATH_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            if std::io::stderr().is_terminal() {
                Some(DEFAULT_FRAME_LOG_PATH.to_string())
            } else {
                None
            }
        })
}

fn append_log_file(path: &str, message: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(message.as_bytes())
}
