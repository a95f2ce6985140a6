use super::Context;
use crate::config::Config;
use crate::description::attributes::{
    clock_reference, media_clock, ClockReference, MediaClock, ATTR_KEY_MEDIACLK,
    ATTR_KEY_TS_REFCLK,
};
use crate::diagnostic::Diagnostic;

const MAX_PTP_DOMAIN: u8 = 127;

pub fn check_media_clock_present(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    ctx.streams()
        .iter()
        .filter(|s| !s.has_attribute(ATTR_KEY_MEDIACLK))
        .map(|s| {
            Diagnostic::at(
                s.line(),
                format!(
                    "For stream {}, a media-level 'mediaclk' attribute shall be present, as per SMPTE ST 2110-10 Section 8.1.",
                    s.index
                ),
            )
        })
        .collect()
}

pub fn check_media_clock_direct(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    if !config.should {
        return vec![];
    }
    ctx.fields()
        .iter()
        .filter_map(|f| f.attribute_value(ATTR_KEY_MEDIACLK).map(|v| (f, v)))
        .filter_map(|(f, v)| {
            let message = match media_clock(v) {
                MediaClock::Direct { offset: 0, .. } => return None,
                MediaClock::Direct { offset, .. } => format!(
                    "Media clock 'direct' reference should have an offset of zero, found '{offset}', as per SMPTE ST 2110-10 Section 8.1."
                ),
                MediaClock::Other => format!(
                    "Media clock should use the 'direct' reference, found '{v}', as per SMPTE ST 2110-10 Section 8.1."
                ),
            };
            Some(Diagnostic::at(f.line, message))
        })
        .collect()
}

/// A session-level `ts-refclk` covers every stream.
pub fn check_reference_clock_present(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    if ctx
        .segments
        .session_attribute_values(ATTR_KEY_TS_REFCLK)
        .next()
        .is_some()
    {
        return vec![];
    }
    ctx.streams()
        .iter()
        .filter(|s| s.attribute_values(ATTR_KEY_TS_REFCLK).next().is_none())
        .map(|s| {
            Diagnostic::at(
                s.line(),
                format!(
                    "For stream {}, a reference clock ('ts-refclk') attribute shall be present at session or media level, as per SMPTE ST 2110-10 Section 8.2.",
                    s.index
                ),
            )
        })
        .collect()
}

pub fn check_reference_clock_format(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for f in ctx.fields().iter().filter(|f| f.has_attribute(ATTR_KEY_TS_REFCLK)) {
        let reference = f.attribute_value(ATTR_KEY_TS_REFCLK).and_then(clock_reference);
        match reference {
            None => errors.push(Diagnostic::at(
                f.line,
                "Reference clock attribute must follow the pattern 'a=ts-refclk:ptp=<version>:<grandmaster id>[:<domain>]', 'a=ts-refclk:ptp=<version>:traceable' or 'a=ts-refclk:localmac=<mac address>', as per SMPTE ST 2110-10 Section 8.2.",
            )),
            Some(ClockReference::Ptp {
                domain: Some(domain),
                ..
            }) if !matches!(domain.parse::<u8>(), Ok(d) if d <= MAX_PTP_DOMAIN) => {
                errors.push(Diagnostic::at(
                    f.line,
                    format!(
                        "PTP domain '{domain}' of the reference clock must be in the range 0 to {MAX_PTP_DOMAIN}, as per SMPTE ST 2110-10 Section 8.2."
                    ),
                ))
            }
            Some(_) => {}
        }
    }
    errors
}
