//! Human-readable error descriptions, exit codes, and the JSON failure envelope.

use crate::read::{MSG_NO_READING, failure_json};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use scale_core::error::{BuildError, WeightError};

    // Typed matches first
    if let Some(we) = err.downcast_ref::<WeightError>() {
        return match we {
            WeightError::Connection(msg) => format!(
                "What happened: Could not talk to the scale ({msg}).\nLikely causes: Wrong port name, cable unplugged, device busy in another program, missing permission (e.g. dialout group), or unsupported baud rate.\nHow to fix: Run `scale list-ports`, check --port/--baudrate or [serial] in the config, and retry."
            ),
            WeightError::NoStableReading { iterations } => format!(
                "What happened: No stable reading after {iterations} reads.\nLikely causes: The load is still moving, the scale only reports placeholders, or the iteration/time cap is too tight.\nHow to fix: Let the reading settle, then retry or raise parser.max_iterations / parser.overall_timeout_ms."
            ),
            WeightError::MalformedToken { token } => format!(
                "What happened: The scale confirmed a value that is not a number ({token:?}).\nLikely causes: Wrong baud rate garbling the stream, or a device that does not speak the reversed-digit '=' protocol.\nHow to fix: Check the baud rate and the scale model."
            ),
            WeightError::Interrupted => {
                "What happened: Read interrupted.\nLikely causes: Ctrl-C or a shutdown signal.\nHow to fix: Re-run the command.".to_string()
            }
        };
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingLink => {
                "What happened: No serial link was provided to the parser.\nLikely causes: Internal wiring error.\nHow to fix: Report a bug with --log-level=debug output.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML or flags.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Check the path. Original: {msg}"
        );
    }
    if lower.contains("parse config") || lower.contains("must be") {
        return format!(
            "What happened: Configuration is invalid.\nLikely causes: Typo or out-of-range value in the TOML.\nHow to fix: Edit the config and try again. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per failure kind.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use scale_core::error::WeightError;
    match err.downcast_ref::<WeightError>() {
        Some(WeightError::Connection(_)) => 3,
        Some(WeightError::NoStableReading { .. }) => 4,
        Some(WeightError::MalformedToken { .. }) => 5,
        Some(WeightError::Interrupted) => 130,
        None => 1,
    }
}

/// Envelope message: the raw error text, or the generic "no reading" message
/// when the session simply never settled.
pub fn envelope_message(err: &eyre::Report) -> String {
    use scale_core::error::WeightError;
    match err.downcast_ref::<WeightError>() {
        Some(WeightError::NoStableReading { .. }) => MSG_NO_READING.to_string(),
        Some(we) => we.to_string(),
        None => err.to_string(),
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    let mut v = failure_json(&envelope_message(err));
    v["reason"] = serde_json::Value::from(reason_name(err));
    v.to_string()
}

fn reason_name(err: &eyre::Report) -> &'static str {
    use scale_core::error::WeightError;
    match err.downcast_ref::<WeightError>() {
        Some(WeightError::Connection(_)) => "Connection",
        Some(WeightError::NoStableReading { .. }) => "NoStableReading",
        Some(WeightError::MalformedToken { .. }) => "MalformedToken",
        Some(WeightError::Interrupted) => "Interrupted",
        None => "Error",
    }
}
