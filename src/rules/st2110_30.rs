use lazy_static::lazy_static;
use regex::Regex;

use super::Context;
use crate::config::Config;
use crate::description::attributes::{media_line, stream_rtpmap, RtpMap, ATTR_KEY_PTIME};
use crate::description::Stream;
use crate::diagnostic::Diagnostic;
use crate::lexer::Field;

const PCM_ENCODINGS: [&str; 2] = ["L16", "L24"];
const AUDIO_CLOCK_RATES: [u32; 3] = [44100, 48000, 96000];

lazy_static! {
    static ref CHANNEL_ORDER_PATTERN: Regex =
        Regex::new(r"^SMPTE2110\.\(((?:M|DM|ST|LtRt|51|71|222|SGRP|U\d\d)(?:,(?:M|DM|ST|LtRt|51|71|222|SGRP|U\d\d))*)\)$").unwrap();
}

/// Number of channels carried by a channel grouping symbol.
fn channels_of(symbol: &str) -> u32 {
    match symbol {
        "M" => 1,
        "DM" | "ST" | "LtRt" => 2,
        "SGRP" => 4,
        "51" => 6,
        "71" => 8,
        "222" => 24,
        undefined => undefined
            .strip_prefix('U')
            .and_then(|n| n.parse().ok())
            .unwrap_or(0),
    }
}

/// Total channel count of a `channel-order` value, or `None` when the value
/// is not of the form `SMPTE2110.(<symbol>,...)`.
pub fn channel_order_count(value: &str) -> Option<u32> {
    let caps = CHANNEL_ORDER_PATTERN.captures(value)?;
    Some(caps.get(1)?.as_str().split(',').map(channels_of).sum())
}

fn pcm_streams<'c, 'a>(ctx: &'c Context<'a>) -> Vec<(&'c Stream<'a>, &'a Field, RtpMap<'a>)> {
    ctx.streams()
        .iter()
        .filter_map(|s| stream_rtpmap(s).map(|(f, r)| (s, f, r)))
        .filter(|(_, _, r)| PCM_ENCODINGS.contains(&r.encoding))
        .collect()
}

pub fn check_audio_rtpmap(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for (s, f, map) in pcm_streams(ctx) {
        if !AUDIO_CLOCK_RATES.contains(&map.clock_rate) {
            errors.push(Diagnostic::at(
                f.line,
                format!(
                    "For stream {}, audio clock rate is '{}' when it shall be one of 44100, 48000 or 96000, as per SMPTE ST 2110-30 Section 6.1.",
                    s.index, map.clock_rate
                ),
            ));
        }
        let media_pt = media_line(&s.media_field().value).and_then(|m| m.payload_type());
        if let Some(media_pt) = media_pt {
            if media_pt != map.payload_type {
                errors.push(Diagnostic::at(
                    f.line,
                    format!(
                        "For stream {}, RTP map payload type '{}' does not match the media description payload type '{}', as per SMPTE ST 2110-30 Section 6.1.",
                        s.index, map.payload_type, media_pt
                    ),
                ));
            }
        }
    }

    // audio streams mapped to something other than PCM
    for s in ctx.streams() {
        let is_audio = media_line(&s.media_field().value).map_or(false, |m| m.media == "audio");
        let Some((f, map)) = stream_rtpmap(s) else {
            continue;
        };
        if is_audio && map.encoding.starts_with('L') && !PCM_ENCODINGS.contains(&map.encoding) {
            errors.push(Diagnostic::at(
                f.line,
                format!(
                    "For stream {}, PCM audio encoding is '{}' when it shall be 'L16' or 'L24', as per SMPTE ST 2110-30 Section 6.1.",
                    s.index, map.encoding
                ),
            ));
        }
    }
    errors
}

pub fn check_packet_time(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for (s, _, _) in pcm_streams(ctx) {
        let ptime = s.attribute_values(ATTR_KEY_PTIME).next();
        match ptime {
            None if config.should => errors.push(Diagnostic::at(
                s.line(),
                format!(
                    "For stream {}, a packet time ('a=ptime') attribute should be present, as per SMPTE ST 2110-30 Section 6.2.",
                    s.index
                ),
            )),
            None => {}
            Some((f, v)) => {
                if !v.trim().parse::<f64>().map_or(false, |t| t > 0.0) {
                    errors.push(Diagnostic::at(
                        f.line,
                        format!(
                            "For stream {}, packet time '{}' must be a positive number of milliseconds, as per SMPTE ST 2110-30 Section 6.2.",
                            s.index, v
                        ),
                    ));
                }
            }
        }
    }
    errors
}

pub fn check_channel_order(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for (s, _, map) in pcm_streams(ctx) {
        let params = ctx.parameters(s.index);
        let order = params.and_then(|p| p.get("channel-order"));

        let Some(order) = order else {
            if config.channel_order {
                errors.push(Diagnostic::at(
                    params.map_or(s.line(), |p| p.line),
                    format!(
                        "For stream {}, format parameter 'channel-order' shall be present when required by configuration, as per SMPTE ST 2110-30 Section 6.2.2.",
                        s.index
                    ),
                ));
            }
            continue;
        };
        let line = params.map_or(s.line(), |p| p.line);

        let value = order.unwrap_or_default();
        let Some(count) = channel_order_count(value) else {
            errors.push(Diagnostic::at(
                line,
                format!(
                    "For stream {}, channel order '{}' must be of the form 'SMPTE2110.(<symbol>,...)' using the defined channel grouping symbols, as per SMPTE ST 2110-30 Section 6.2.2.",
                    s.index, value
                ),
            ));
            continue;
        };

        let channels = map.channels.unwrap_or(1);
        if count != channels {
            errors.push(Diagnostic::at(
                line,
                format!(
                    "For stream {}, channel order '{}' describes {} channels when the RTP map signals {}, as per SMPTE ST 2110-30 Section 6.2.2.",
                    s.index, value, count, channels
                ),
            ));
        }
    }
    errors
}
