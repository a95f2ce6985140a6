use super::Context;
use crate::config::{Config, MediaKind};
use crate::description::attributes::{
    media_line, stream_rtpmap, FormatParameters, ATTR_KEY_FMTP, ATTR_KEY_RTPMAP,
};
use crate::description::Stream;
use crate::diagnostic::Diagnostic;
use crate::lexer::split_lines;
use crate::util::{check_aspect_ratio, check_frame_rate};

pub const ENCODING_RAW: &str = "raw";
pub const VIDEO_CLOCK_RATE: u32 = 90000;

const REQUIRED_PARAMETERS: [&str; 8] = [
    "sampling",
    "depth",
    "width",
    "height",
    "exactframerate",
    "colorimetry",
    "PM",
    "SSN",
];

const SAMPLINGS: [&str; 12] = [
    "YCbCr-4:4:4",
    "YCbCr-4:2:2",
    "YCbCr-4:2:0",
    "CLYCbCr-4:4:4",
    "CLYCbCr-4:2:2",
    "CLYCbCr-4:2:0",
    "ICtCp-4:4:4",
    "ICtCp-4:2:2",
    "ICtCp-4:2:0",
    "RGB",
    "XYZ",
    "KEY",
];
const DEPTHS: [&str; 5] = ["8", "10", "12", "16", "16f"];
const COLORIMETRIES: [&str; 8] = [
    "BT601",
    "BT709",
    "BT2020",
    "BT2100",
    "ST2065-1",
    "ST2065-3",
    "UNSPECIFIED",
    "XYZ",
];
const PACKING_MODES: [&str; 2] = ["2110GPM", "2110BPM"];
const STANDARDS: [&str; 1] = ["ST2110-20:2017"];
const TRANSFER_CHARACTERISTICS: [&str; 10] = [
    "SDR",
    "PQ",
    "HLG",
    "LINEAR",
    "BT2100LINPQ",
    "BT2100LINHLG",
    "ST2065-1",
    "ST428-1",
    "DENSITY",
    "UNSPECIFIED",
];
const RANGES: [&str; 3] = ["NARROW", "FULLPROTECT", "FULL"];
const MAX_UDP_SIZES: [&str; 2] = ["1460", "8960"];
const MAX_DIMENSION: u32 = 32767;

/// Streams checked as ST 2110-20 video: any stream mapped to `raw`, and every
/// `m=video` stream when the run is restricted to video.
pub(crate) fn video_streams<'c, 'a>(
    ctx: &'c Context<'a>,
    config: &Config,
) -> Vec<&'c Stream<'a>> {
    let restricted = config.media_kind == MediaKind::Video;
    ctx.streams()
        .iter()
        .filter(|s| {
            is_raw(s)
                || (restricted
                    && media_line(&s.media_field().value).map_or(false, |m| m.media == "video"))
        })
        .collect()
}

fn is_raw(stream: &Stream<'_>) -> bool {
    stream_rtpmap(stream).map_or(false, |(_, r)| r.encoding == ENCODING_RAW)
}

/// Extracted format parameters of every `raw` stream that has them.
pub(crate) fn raw_parameters<'c>(ctx: &'c Context<'_>) -> Vec<&'c FormatParameters> {
    ctx.streams()
        .iter()
        .filter(|s| is_raw(s))
        .filter_map(|s| ctx.parameters(s.index))
        .collect()
}

fn parameter_error(params: &FormatParameters, message: String) -> Diagnostic {
    Diagnostic::at(
        params.line,
        format!("For stream {}, {}", params.stream, message),
    )
}

/// Checks that an enumerated parameter, when present, has one of the allowed
/// values.
fn check_enumeration(
    params: &FormatParameters,
    key: &str,
    allowed: &[&str],
    clause: &str,
) -> Option<Diagnostic> {
    match params.get(key)? {
        Some(v) if allowed.contains(&v) => None,
        Some(v) => Some(parameter_error(
            params,
            format!(
                "format parameter '{key}' has value '{v}' when it must be one of {}, as per {clause}.",
                allowed.join(", ")
            ),
        )),
        None => Some(parameter_error(
            params,
            format!("format parameter '{key}' must have a value, as per {clause}."),
        )),
    }
}

pub fn check_video_rtpmap(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for s in video_streams(ctx, config) {
        if !s.has_attribute(ATTR_KEY_RTPMAP) {
            errors.push(Diagnostic::at(
                s.line(),
                format!(
                    "For stream {}, video streams shall have an 'a=rtpmap' attribute, as per SMPTE ST 2110-20 Section 7.1.",
                    s.index
                ),
            ));
            continue;
        }
        // malformed rtpmap attributes are reported with RFC 4566 Section 6
        let Some((f, map)) = stream_rtpmap(s) else {
            continue;
        };

        if map.encoding != ENCODING_RAW {
            errors.push(Diagnostic::at(
                f.line,
                format!(
                    "For stream {}, encoding name is '{}' when video streams shall use '{}', as per SMPTE ST 2110-20 Section 7.1.",
                    s.index, map.encoding, ENCODING_RAW
                ),
            ));
        }
        if map.clock_rate != VIDEO_CLOCK_RATE {
            errors.push(Diagnostic::at(
                f.line,
                format!(
                    "For stream {}, clock rate is '{}' when video streams shall use {}, as per SMPTE ST 2110-20 Section 7.1.",
                    s.index, map.clock_rate, VIDEO_CLOCK_RATE
                ),
            ));
        }
        let media_pt = media_line(&s.media_field().value).and_then(|m| m.payload_type());
        if let Some(media_pt) = media_pt {
            if media_pt != map.payload_type {
                errors.push(Diagnostic::at(
                    f.line,
                    format!(
                        "For stream {}, RTP map payload type '{}' does not match the media description payload type '{}', as per SMPTE ST 2110-20 Section 7.1.",
                        s.index, map.payload_type, media_pt
                    ),
                ));
            }
        }
    }
    errors
}

pub fn check_video_fmtp(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    ctx.streams()
        .iter()
        .filter(|s| is_raw(s) && !s.has_attribute(ATTR_KEY_FMTP))
        .map(|s| {
            Diagnostic::at(
                s.line(),
                format!(
                    "For stream {}, raw video streams shall have a format parameters ('a=fmtp') attribute, as per SMPTE ST 2110-20 Section 7.1.",
                    s.index
                ),
            )
        })
        .collect()
}

/// Names of the required parameters absent from `params`, in declaration
/// order.
pub fn missing_parameters(params: &FormatParameters) -> Vec<&'static str> {
    REQUIRED_PARAMETERS
        .iter()
        .copied()
        .filter(|k| !params.contains(k))
        .collect()
}

pub fn check_required_parameters(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    raw_parameters(ctx)
        .into_iter()
        .flat_map(|params| {
            missing_parameters(params).into_iter().map(move |k| {
                parameter_error(
                    params,
                    format!(
                        "required format parameter '{k}' is missing, as per SMPTE ST 2110-20 Section 7.2."
                    ),
                )
            })
        })
        .collect()
}

fn check_dimension(params: &FormatParameters, key: &str) -> Option<Diagnostic> {
    let value = params.get(key)?;
    let valid = value
        .and_then(|v| v.parse::<u32>().ok())
        .map_or(false, |d| (1..=MAX_DIMENSION).contains(&d));
    if valid {
        return None;
    }
    Some(parameter_error(
        params,
        format!(
            "format parameter '{key}' must be an integer in the range 1 to {MAX_DIMENSION}, found '{}', as per SMPTE ST 2110-20 Section 7.2.",
            value.unwrap_or_default()
        ),
    ))
}

pub fn check_parameter_values(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    const CLAUSE: &str = "SMPTE ST 2110-20 Section 7.2";

    let mut errors = vec![];
    for params in raw_parameters(ctx) {
        errors.extend(check_dimension(params, "width"));
        errors.extend(check_dimension(params, "height"));
        errors.extend(check_enumeration(params, "sampling", &SAMPLINGS, CLAUSE));
        errors.extend(check_enumeration(params, "depth", &DEPTHS, CLAUSE));
        errors.extend(check_enumeration(params, "colorimetry", &COLORIMETRIES, CLAUSE));
        errors.extend(check_enumeration(params, "PM", &PACKING_MODES, CLAUSE));
        errors.extend(check_enumeration(params, "SSN", &STANDARDS, CLAUSE));

        match params.get("exactframerate") {
            Some(Some(rate)) => {
                if let Err(err) = check_frame_rate(rate) {
                    errors.push(parameter_error(
                        params,
                        format!("exact frame rate '{rate}' {err}, as per {CLAUSE}."),
                    ));
                }
            }
            Some(None) => errors.push(parameter_error(
                params,
                format!("format parameter 'exactframerate' must have a value, as per {CLAUSE}."),
            )),
            None => {}
        }
    }
    errors
}

pub fn check_optional_parameters(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    const CLAUSE: &str = "SMPTE ST 2110-20 Section 7.3";

    let mut errors = vec![];
    for params in raw_parameters(ctx) {
        for flag in ["interlace", "segmented"] {
            if let Some(Some(v)) = params.get(flag) {
                errors.push(parameter_error(
                    params,
                    format!("format parameter '{flag}' is a flag and must not have a value, found '{v}', as per {CLAUSE}."),
                ));
            }
        }
        if params.contains("segmented") && !params.contains("interlace") {
            errors.push(parameter_error(
                params,
                format!("format parameter 'segmented' is only permitted together with 'interlace', as per {CLAUSE}."),
            ));
        }

        errors.extend(check_enumeration(params, "TCS", &TRANSFER_CHARACTERISTICS, CLAUSE));
        errors.extend(check_enumeration(params, "RANGE", &RANGES, CLAUSE));
        errors.extend(check_enumeration(params, "MAXUDP", &MAX_UDP_SIZES, CLAUSE));

        match params.get("PAR") {
            Some(Some(par)) => {
                if let Err(err) = check_aspect_ratio(par) {
                    errors.push(parameter_error(
                        params,
                        format!("pixel aspect ratio '{par}' {err}, as per {CLAUSE}."),
                    ));
                }
            }
            Some(None) => errors.push(parameter_error(
                params,
                format!("format parameter 'PAR' must have a value, as per {CLAUSE}."),
            )),
            None => {}
        }
    }
    errors
}

/// Example document of SMPTE ST 2110-20, widely pasted as a starting point.
pub const ST_2110_20_EXAMPLE: &str = "v=0\r\n\
o=- 123456 11 IN IP4 192.168.100.2\r\n\
s=Example of a SMPTE ST2110-20 signal\r\n\
i=this example is for 720p video at 59.94\r\n\
t=0 0\r\n\
a=recvonly\r\n\
a=group:DUP primary secondary\r\n\
m=video 50000 RTP/AVP 112\r\n\
c=IN IP4 239.100.9.10/32\r\n\
a=source-filter: incl IN IP4 239.100.9.10 192.168.100.2\r\n\
a=rtpmap:112 raw/90000\r\n\
a=fmtp:112 sampling=YCbCr-4:2:2; width=1280; height=720; exactframerate=60000/1001; depth=10; TCS=SDR; colorimetry=BT709; PM=2110GPM; SSN=ST2110-20:2017; \r\n\
a=ts-refclk:ptp=IEEE1588-2008:39-A7-94-FF-FE-07-CB-D0:37\r\n\
a=mediaclk:direct=0\r\n\
a=mid:primary\r\n\
m=video 50020 RTP/AVP 112\r\n\
c=IN IP4 239.101.9.10/32\r\n\
a=source-filter: incl IN IP4 239.101.9.10 192.168.101.2\r\n\
a=rtpmap:112 raw/90000\r\n\
a=fmtp:112 sampling=YCbCr-4:2:2; width=1280; height=720; exactframerate=60000/1001; depth=10; TCS=SDR; colorimetry=BT709; PM=2110GPM; SSN=ST2110-20:2017; \r\n\
a=ts-refclk:ptp=IEEE1588-2008:39-A7-94-FF-FE-07-CB-D0:37\r\n\
a=mediaclk:direct=0\r\n\
a=mid:secondary\r\n";

/// Number of leading lines that must equal the example for a document to
/// count as a copy.
const COPY_PREFIX_LINES: usize = 3;

pub fn check_example_copy(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    if !config.no_copy {
        return vec![];
    }
    let example = split_lines(ST_2110_20_EXAMPLE);
    let lines = split_lines(ctx.document.text());
    if lines.len() < COPY_PREFIX_LINES {
        return vec![];
    }
    let copied = lines
        .iter()
        .zip(&example)
        .take(COPY_PREFIX_LINES)
        .all(|(a, b)| a.trim_end() == b.trim_end());
    if !copied {
        return vec![];
    }
    vec![Diagnostic::document(
        "SDP file appears to be a copy of the example in SMPTE ST 2110-20 and should be generated for the actual sender, not copied.",
    )]
}
