use super::Context;
use crate::config::{AddressFamily, CastMode, Config, MediaKind};
use crate::description::attributes::{
    connection, media_line, origin, rtpmap, ATTR_KEY_FMTP, ATTR_KEY_RTPMAP,
};
use crate::diagnostic::Diagnostic;
use crate::grammar;
use crate::lexer::FieldType;
use crate::util::{check_ttl, is_ip4, is_multicast, matches_family};

const MEDIA_TYPES: [&str; 6] = ["audio", "video", "text", "application", "message", "image"];

pub fn check_line_endings(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    if !config.check_endings || ctx.document.endings().is_strict() {
        return vec![];
    }
    vec![Diagnostic::document(
        "SDP file contains record ending characters 0x0a and 0x0d separately from the expected CRLF pattern, as per RFC 4566 Section 5.",
    )]
}

pub fn check_line_shape(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    ctx.fields()
        .iter()
        .filter(|f| !f.is_well_formed())
        .map(|f| {
            if f.is_blank() {
                Diagnostic::at(
                    f.line,
                    "Blank lines are not permitted, every line of an SDP file must be of the form '<type>=<value>', as per RFC 4566 Section 5.",
                )
            } else {
                Diagnostic::at(
                    f.line,
                    "Every line of an SDP file must be of the form '<type>=<value>' with <type> being one character and no whitespace either side of the equals, as per RFC 4566 Section 5.",
                )
            }
        })
        .collect()
}

pub fn check_type_letters(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    ctx.fields()
        .iter()
        .filter(|f| !f.is_blank() && f.field_type.is_none())
        .map(|f| {
            Diagnostic::at(
                f.line,
                format!(
                    "Type '{}' is not one of the permitted type letters, every line of an SDP file must start with a permitted type letter, as per RFC 4566 Section 5.",
                    f.letter.unwrap_or_default()
                ),
            )
        })
        .collect()
}

pub fn check_mandatory(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    grammar::check_mandatory(ctx.fields())
}

pub fn check_order(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    grammar::check_order(ctx.fields())
}

pub fn check_nul(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    ctx.fields()
        .iter()
        .filter(|f| f.text.contains('\0'))
        .map(|f| {
            Diagnostic::at(
                f.line,
                "Value contains illegal Nul (0x00) character not permitted by RFC 4566 Section 5.",
            )
        })
        .collect()
}

pub fn check_version(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    grammar::check_first_field(ctx.fields())
}

pub fn check_origin(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for f in ctx.fields().iter().filter(|f| f.is(FieldType::Origin)) {
        let Some(o) = origin(&f.value) else {
            errors.push(Diagnostic::at(
                f.line,
                "Origin field must follow the pattern 'o=<username> <sess-id> <sess-version> IN <IP4|IP6> <unicast-address>', as per RFC 4566 Section 5.2.",
            ));
            continue;
        };

        if config.address_family != AddressFamily::Unspecified && o.family != config.address_family {
            errors.push(Diagnostic::at(
                f.line,
                format!(
                    "Origin field address type is '{}' when '{}' is required by configuration, as per RFC 4566 Section 5.2.",
                    o.family, config.address_family
                ),
            ));
        }
        if is_multicast(o.address) {
            errors.push(Diagnostic::at(
                f.line,
                format!(
                    "Origin field address '{}' is multicast when it must be the unicast address of the originating machine, as per RFC 4566 Section 5.2.",
                    o.address
                ),
            ));
        }
    }
    errors
}

pub fn check_origin_address(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    if config.address_family == AddressFamily::Unspecified {
        return vec![];
    }
    ctx.fields()
        .iter()
        .filter(|f| f.is(FieldType::Origin))
        .filter_map(|f| origin(&f.value).map(|o| (f, o)))
        .filter(|(_, o)| !matches_family(o.address, config.address_family))
        .map(|(f, o)| {
            Diagnostic::at(
                f.line,
                format!(
                    "Origin field address '{}' must be an {} address as required by configuration, as per RFC 4566 Section 5.2.",
                    o.address, config.address_family
                ),
            )
        })
        .collect()
}

pub fn check_connection_presence(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    if ctx.segments.session_connections().next().is_some() {
        return vec![];
    }
    if ctx.streams().is_empty() {
        return vec![Diagnostic::at(
            ctx.document.last_line(),
            "For all streams, no connection data ('c=') field was found at session level or in any media description, as per RFC 4566 Section 5.7.",
        )];
    }
    ctx.streams()
        .iter()
        .filter(|s| s.connections().next().is_none())
        .map(|s| {
            Diagnostic::at(
                s.line(),
                format!(
                    "For stream {}, no connection data ('c=') field was found at session level or in the media description, as per RFC 4566 Section 5.7.",
                    s.index
                ),
            )
        })
        .collect()
}

pub fn check_connection_shape(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for f in ctx.fields().iter().filter(|f| f.is(FieldType::Connection)) {
        let Some(c) = connection(&f.value) else {
            errors.push(Diagnostic::at(
                f.line,
                "Connection data must follow the pattern 'c=IN <IP4|IP6> <connection-address>', as per RFC 4566 Section 5.7.",
            ));
            continue;
        };

        if config.address_family != AddressFamily::Unspecified && c.family != config.address_family {
            errors.push(Diagnostic::at(
                f.line,
                format!(
                    "Connection data address type is '{}' when '{}' is required by configuration, as per RFC 4566 Section 5.7.",
                    c.family, config.address_family
                ),
            ));
        }

        if c.family == AddressFamily::Ip4 && is_ip4(c.address) && is_multicast(c.address) {
            match c.ttl {
                None => errors.push(Diagnostic::at(
                    f.line,
                    format!(
                        "IPv4 multicast connection address '{}' must have a TTL value appended, as per RFC 4566 Section 5.7.",
                        c.address
                    ),
                )),
                Some(ttl) => {
                    if let Err(reason) = check_ttl(ttl) {
                        errors.push(Diagnostic::at(
                            f.line,
                            format!(
                                "TTL {} for IPv4 multicast connection address '{}', as per RFC 4566 Section 5.7.",
                                reason, c.address
                            ),
                        ));
                    }
                }
            }
        }
    }
    errors
}

pub fn check_connection_cast(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for f in ctx.fields().iter().filter(|f| f.is(FieldType::Connection)) {
        let Some(c) = connection(&f.value) else {
            continue;
        };

        if !matches_family(c.address, config.address_family) {
            errors.push(Diagnostic::at(
                f.line,
                format!(
                    "Connection data address '{}' must be an {} address as required by configuration, as per RFC 4566 Section 5.7.",
                    c.address, config.address_family
                ),
            ));
        }

        match config.cast {
            CastMode::Multicast if !is_multicast(c.address) => errors.push(Diagnostic::at(
                f.line,
                format!(
                    "Connection data address '{}' is unicast when multicast addresses are required by configuration, as per RFC 4566 Section 5.7.",
                    c.address
                ),
            )),
            CastMode::Unicast if is_multicast(c.address) => errors.push(Diagnostic::at(
                f.line,
                format!(
                    "Connection data address '{}' is multicast when unicast addresses are required by configuration, as per RFC 4566 Section 5.7.",
                    c.address
                ),
            )),
            _ => {}
        }
    }
    errors
}

pub fn check_media_line(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for s in ctx.streams() {
        let f = s.media_field();
        let Some(m) = media_line(&f.value) else {
            errors.push(Diagnostic::at(
                f.line,
                "Media description must follow the pattern 'm=<media> <port>[/<number of ports>] <proto> <fmt> ...', as per RFC 4566 Section 5.14.",
            ));
            continue;
        };

        if !MEDIA_TYPES.contains(&m.media) {
            errors.push(Diagnostic::at(
                f.line,
                format!(
                    "For stream {}, media type '{}' is not one of {}, as per RFC 4566 Section 5.14.",
                    s.index,
                    m.media,
                    MEDIA_TYPES.join(", ")
                ),
            ));
        }
        if m.port.parse::<u16>().is_err() {
            errors.push(Diagnostic::at(
                f.line,
                format!(
                    "For stream {}, port '{}' must be in the range 0 to 65535, as per RFC 4566 Section 5.14.",
                    s.index, m.port
                ),
            ));
        }
    }
    errors
}

pub fn check_no_media(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    if !config.no_media || !ctx.streams().is_empty() {
        return vec![];
    }
    vec![Diagnostic::document(
        "SDP file does not contain any media descriptions ('m='), when at least one stream is required by configuration, as per RFC 4566 Section 5.14.",
    )]
}

pub fn check_media_kind(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    if config.media_kind == MediaKind::Unspecified {
        return vec![];
    }
    let kind = config.media_kind.to_string();
    ctx.streams()
        .iter()
        .filter_map(|s| media_line(&s.media_field().value).map(|m| (s, m)))
        .filter(|(_, m)| m.media != kind)
        .map(|(s, m)| {
            Diagnostic::at(
                s.line(),
                format!(
                    "For stream {}, media type is '{}' when only '{}' streams are permitted by configuration, as per RFC 4566 Section 5.14.",
                    s.index, m.media, kind
                ),
            )
        })
        .collect()
}

pub fn check_rtpmap_shape(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for s in ctx.streams() {
        for (f, value) in s.attribute_values(ATTR_KEY_RTPMAP) {
            if rtpmap(value).is_none() {
                errors.push(Diagnostic::at(
                    f.line,
                    format!(
                        "For stream {}, RTP map attribute must follow the pattern 'a=rtpmap:<payload type> <encoding name>/<clock rate>[/<encoding parameters>]', as per RFC 4566 Section 6.",
                        s.index
                    ),
                ));
            }
        }
    }
    errors
}

/// Surfaces what the format parameter extraction found, and reports streams
/// that carry more than one `a=fmtp` for their payload type.
pub fn check_format_parameters(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    for (s, (_, found)) in ctx.streams().iter().zip(&ctx.parameters) {
        errors.extend(found.iter().cloned());
        let mut seen: Vec<&str> = vec![];
        for (f, value) in s.attribute_values(ATTR_KEY_FMTP) {
            let pt = value.split_whitespace().next().unwrap_or_default();
            if seen.contains(&pt) {
                errors.push(Diagnostic::at(
                    f.line,
                    format!(
                        "For stream {}, payload type '{}' has more than one format parameters attribute when one is expected, as per RFC 4566 Section 6.",
                        s.index, pt
                    ),
                ));
            } else {
                seen.push(pt);
            }
        }
    }
    errors
}
