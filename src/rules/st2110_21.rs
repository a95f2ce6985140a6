use super::st2110_20::{raw_parameters, video_streams};
use super::Context;
use crate::config::Config;
use crate::diagnostic::Diagnostic;

const SENDER_TYPES: [&str; 3] = ["2110TPN", "2110TPNL", "2110TPW"];

pub fn check_sender_type(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];

    if config.shaping {
        for s in video_streams(ctx, config) {
            let params = ctx.parameters(s.index);
            if params.map_or(false, |p| p.contains("TP")) {
                continue;
            }
            let line = params.map_or(s.line(), |p| p.line);
            errors.push(Diagnostic::at(
                line,
                format!(
                    "For stream {}, format parameter 'TP' shall be present when traffic shaping is required by configuration, as per SMPTE ST 2110-21 Section 8.1.",
                    s.index
                ),
            ));
        }
    }

    for s in ctx.streams() {
        let Some(params) = ctx.parameters(s.index) else {
            continue;
        };
        match params.get("TP") {
            Some(Some(tp)) if SENDER_TYPES.contains(&tp) => {}
            Some(tp) => errors.push(Diagnostic::at(
                params.line,
                format!(
                    "For stream {}, sender type 'TP' is '{}' when it shall be one of {}, as per SMPTE ST 2110-21 Section 8.1.",
                    s.index,
                    tp.unwrap_or_default(),
                    SENDER_TYPES.join(", ")
                ),
            )),
            None => {}
        }
    }
    errors
}

pub fn check_shaping_numbers(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for params in raw_parameters(ctx) {
        for (key, min) in [("TROFF", 0u64), ("CMAX", 1)] {
            let Some(value) = params.get(key) else {
                continue;
            };
            let valid = value
                .filter(|v| v.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|v| v.parse::<u64>().ok())
                .map_or(false, |n| n >= min);
            if !valid {
                errors.push(Diagnostic::at(
                    params.line,
                    format!(
                        "For stream {}, format parameter '{}' must be an integer of at least {}, found '{}', as per SMPTE ST 2110-21 Section 8.2.",
                        params.stream,
                        key,
                        min,
                        value.unwrap_or_default()
                    ),
                ));
            }
        }
    }
    errors
}
