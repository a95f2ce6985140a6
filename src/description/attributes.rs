use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::Stream;
use crate::config::{AddressFamily, Config};
use crate::diagnostic::Diagnostic;
use crate::lexer::Field;

/// Constants for attribute keys inspected by the rule catalog
pub const ATTR_KEY_RTPMAP: &str = "rtpmap";
pub const ATTR_KEY_FMTP: &str = "fmtp";
pub const ATTR_KEY_MEDIACLK: &str = "mediaclk";
pub const ATTR_KEY_TS_REFCLK: &str = "ts-refclk";
pub const ATTR_KEY_MID: &str = "mid";
pub const ATTR_KEY_GROUP: &str = "group";
pub const ATTR_KEY_SSRC_GROUP: &str = "ssrc-group";
pub const ATTR_KEY_SOURCE_FILTER: &str = "source-filter";
pub const ATTR_KEY_PTIME: &str = "ptime";

/// Semantic token of RFC 7104 duplication grouping
pub const SEMANTIC_TOKEN_DUPLICATION: &str = "DUP";

lazy_static! {
    static ref MEDIA_PATTERN: Regex =
        Regex::new(r"^(\S+) (\d+)(?:/(\d+))? (\S+)((?: \S+)+)$").unwrap();
    static ref RTPMAP_PATTERN: Regex =
        Regex::new(r"^(\d+) ([^/\s]+)/(\d+)(?:/(\d+))?$").unwrap();
    static ref FMTP_PATTERN: Regex = Regex::new(r"^(\d+)\s+(\S.*)$").unwrap();
    static ref STRICT_PARAMS_PATTERN: Regex = Regex::new(r"^(?:[^;\s]+; )+$").unwrap();
    static ref ORIGIN_PATTERN: Regex =
        Regex::new(r"^(\S+)\s+(\d+)\s+(\d+)\s+IN\s+(IP[46])\s+(\S+)$").unwrap();
    static ref CONNECTION_PATTERN: Regex =
        Regex::new(r"^IN\s+(IP[46])\s+([^\s/]+)(?:/(\d+))?(?:/([1-9]\d*))?$").unwrap();
    static ref PTP_PATTERN: Regex = Regex::new(
        r"^ptp=(IEEE1588-2002|IEEE1588-2008|IEEE1588-2019|IEEE802\.1AS-2011):(?:(traceable)|([0-9A-Fa-f]{2}(?:-[0-9A-Fa-f]{2}){7})(?::(\d+))?)$"
    )
    .unwrap();
    static ref LOCALMAC_PATTERN: Regex =
        Regex::new(r"^localmac=([0-9A-Fa-f]{2}(?:-[0-9A-Fa-f]{2}){5})$").unwrap();
    static ref MEDIACLK_DIRECT_PATTERN: Regex =
        Regex::new(r"^direct=(\d+)(?: rate=(\d+)/(\d+))?$").unwrap();
    static ref SOURCE_FILTER_PATTERN: Regex =
        Regex::new(r"^ (incl|excl) (\S+) (\S+) (\S+)((?: \S+)+)$").unwrap();
}

fn family_of(token: &str) -> AddressFamily {
    match token {
        "IP4" => AddressFamily::Ip4,
        "IP6" => AddressFamily::Ip6,
        _ => AddressFamily::Unspecified,
    }
}

/// MediaLine is the structured value of an `m=` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaLine<'a> {
    pub media: &'a str,
    pub port: &'a str,
    pub port_count: Option<&'a str>,
    pub proto: &'a str,
    pub formats: Vec<&'a str>,
}

impl<'a> MediaLine<'a> {
    /// The payload type of the first format, when it is numeric.
    pub fn payload_type(&self) -> Option<u16> {
        self.formats.first().and_then(|f| f.parse().ok())
    }
}

/// media_line parses `<media> <port>[/<number of ports>] <proto> <fmt> ...`.
pub fn media_line(value: &str) -> Option<MediaLine<'_>> {
    let caps = MEDIA_PATTERN.captures(value)?;
    Some(MediaLine {
        media: caps.get(1)?.as_str(),
        port: caps.get(2)?.as_str(),
        port_count: caps.get(3).map(|m| m.as_str()),
        proto: caps.get(4)?.as_str(),
        formats: caps.get(5)?.as_str().split_whitespace().collect(),
    })
}

/// RtpMap is the value of `a=rtpmap:<pt> <encoding>/<clock>[/<channels>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpMap<'a> {
    pub payload_type: u16,
    pub encoding: &'a str,
    pub clock_rate: u32,
    pub channels: Option<u32>,
}

pub fn rtpmap(value: &str) -> Option<RtpMap<'_>> {
    let caps = RTPMAP_PATTERN.captures(value)?;
    Some(RtpMap {
        payload_type: caps[1].parse().ok()?,
        encoding: caps.get(2)?.as_str(),
        clock_rate: caps[3].parse().ok()?,
        channels: match caps.get(4) {
            Some(c) => Some(c.as_str().parse().ok()?),
            None => None,
        },
    })
}

/// The first well-formed `a=rtpmap` of a stream.
pub fn stream_rtpmap<'a>(stream: &Stream<'a>) -> Option<(&'a Field, RtpMap<'a>)> {
    stream
        .attribute_values(ATTR_KEY_RTPMAP)
        .find_map(|(f, v)| rtpmap(v).map(|r| (f, r)))
}

/// Origin is the address part of an `o=` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin<'a> {
    pub username: &'a str,
    pub family: AddressFamily,
    pub address: &'a str,
}

pub fn origin(value: &str) -> Option<Origin<'_>> {
    let caps = ORIGIN_PATTERN.captures(value)?;
    Some(Origin {
        username: caps.get(1)?.as_str(),
        family: family_of(&caps[4]),
        address: caps.get(5)?.as_str(),
    })
}

/// Connection is the value of a `c=` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection<'a> {
    pub family: AddressFamily,
    pub address: &'a str,
    /// For IPv4 the first suffix is the multicast TTL; for IPv6 it is the
    /// number of addresses.
    pub ttl: Option<&'a str>,
    pub count: Option<&'a str>,
}

pub fn connection(value: &str) -> Option<Connection<'_>> {
    let caps = CONNECTION_PATTERN.captures(value)?;
    Some(Connection {
        family: family_of(&caps[1]),
        address: caps.get(2)?.as_str(),
        ttl: caps.get(3).map(|m| m.as_str()),
        count: caps.get(4).map(|m| m.as_str()),
    })
}

/// ClockReference is the sub-scheme of a `ts-refclk` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockReference<'a> {
    /// `ptp=<version>:traceable`
    PtpTraceable { version: &'a str },
    /// `ptp=<version>:<grandmaster id>[:<domain>]`
    Ptp {
        version: &'a str,
        grandmaster: &'a str,
        domain: Option<&'a str>,
    },
    /// `localmac=<mac address>`
    LocalMac(&'a str),
}

/// clock_reference parses a `ts-refclk` value; `None` when it matches
/// neither the PTP nor the local MAC form.
pub fn clock_reference(value: &str) -> Option<ClockReference<'_>> {
    if let Some(caps) = PTP_PATTERN.captures(value) {
        let version = caps.get(1)?.as_str();
        if caps.get(2).is_some() {
            return Some(ClockReference::PtpTraceable { version });
        }
        return Some(ClockReference::Ptp {
            version,
            grandmaster: caps.get(3)?.as_str(),
            domain: caps.get(4).map(|m| m.as_str()),
        });
    }
    LOCALMAC_PATTERN
        .captures(value)
        .and_then(|caps| caps.get(1))
        .map(|m| ClockReference::LocalMac(m.as_str()))
}

/// MediaClock is the value of a `mediaclk` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaClock {
    /// `direct=<offset>[ rate=<n>/<d>]`
    Direct {
        offset: u64,
        rate: Option<(u64, u64)>,
    },
    Other,
}

pub fn media_clock(value: &str) -> MediaClock {
    let Some(caps) = MEDIACLK_DIRECT_PATTERN.captures(value) else {
        return MediaClock::Other;
    };
    let Ok(offset) = caps[1].parse::<u64>() else {
        return MediaClock::Other;
    };
    let rate = match (caps.get(2), caps.get(3)) {
        (Some(n), Some(d)) => n.as_str().parse().ok().zip(d.as_str().parse().ok()),
        _ => None,
    };
    MediaClock::Direct { offset, rate }
}

/// SourceFilter is the value of an RFC 4570 `source-filter` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFilter<'a> {
    pub mode: &'a str,
    pub net_type: &'a str,
    pub addr_type: &'a str,
    pub destination: &'a str,
    pub sources: Vec<&'a str>,
}

pub fn source_filter(value: &str) -> Option<SourceFilter<'_>> {
    let caps = SOURCE_FILTER_PATTERN.captures(value)?;
    Some(SourceFilter {
        mode: caps.get(1)?.as_str(),
        net_type: caps.get(2)?.as_str(),
        addr_type: caps.get(3)?.as_str(),
        destination: caps.get(4)?.as_str(),
        sources: caps.get(5)?.as_str().split_whitespace().collect(),
    })
}

/// Group is an RFC 5888 `group` or `ssrc-group` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<'a> {
    pub line: usize,
    pub semantics: &'a str,
    pub ids: Vec<&'a str>,
}

/// groups collects every `a=<key>:<semantics> <id> ...` attribute found
/// anywhere in the document, session level or media level.
pub fn groups<'a>(fields: &'a [Field], key: &str) -> Vec<Group<'a>> {
    fields
        .iter()
        .filter_map(|f| {
            let value = f.attribute_value(key)?;
            let mut tokens = value.split_whitespace();
            let semantics = tokens.next()?;
            Some(Group {
                line: f.line,
                semantics,
                ids: tokens.collect(),
            })
        })
        .collect()
}

/// Mid is the `a=mid` identification tag of one stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mid<'a> {
    pub stream: usize,
    pub line: usize,
    pub id: &'a str,
}

pub fn mids<'a>(streams: &[Stream<'a>]) -> Vec<Mid<'a>> {
    streams
        .iter()
        .flat_map(|s| {
            s.attribute_values(ATTR_KEY_MID).map(move |(f, id)| Mid {
                stream: s.index,
                line: f.line,
                id: id.trim(),
            })
        })
        .collect()
}

/// FormatParameters is the extracted `a=fmtp` attribute of one stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatParameters {
    pub payload_type: u16,
    /// Line of the `a=fmtp` attribute.
    pub line: usize,
    /// Index of the owning stream.
    pub stream: usize,
    /// Parameter values by name; `None` marks a flag such as `interlace`.
    pub params: BTreeMap<String, Option<String>>,
}

impl FormatParameters {
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Returns the value of a parameter that has one.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_deref())
    }

    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.params.get(key).map(|v| v.as_deref())
    }
}

/// extract_parameters reads the first `a=fmtp` attribute of a stream into a
/// [`FormatParameters`]. Problems with the attribute itself are returned as
/// diagnostics; a stream without format parameters yields `None` and no
/// diagnostics.
pub fn extract_parameters(
    stream: &Stream<'_>,
    config: &Config,
) -> (Option<FormatParameters>, Vec<Diagnostic>) {
    let mut errors = vec![];

    let Some((field, value)) = stream.attribute_values(ATTR_KEY_FMTP).next() else {
        return (None, errors);
    };

    let Some(caps) = FMTP_PATTERN.captures(value) else {
        errors.push(Diagnostic::at(
            field.line,
            "Format parameters attribute must follow the pattern 'a=fmtp:<payload type> <parameters>', as per RFC 4566 Section 6.",
        ));
        return (None, errors);
    };

    let Ok(payload_type) = caps[1].parse::<u16>() else {
        errors.push(Diagnostic::at(
            field.line,
            format!(
                "Format parameters payload type '{}' is not a valid payload type, as per RFC 4566 Section 6.",
                &caps[1]
            ),
        ));
        return (None, errors);
    };

    let media_pt = media_line(&stream.media_field().value).and_then(|m| m.payload_type());
    if let Some(media_pt) = media_pt {
        if media_pt != payload_type {
            errors.push(Diagnostic::at(
                field.line,
                format!(
                    "For stream {}, format parameters payload type '{}' does not match the media description payload type '{}', as per RFC 4566 Section 6.",
                    stream.index, payload_type, media_pt
                ),
            ));
        }
    }

    let raw = caps.get(2).map_or("", |m| m.as_str());
    if config.whitespace && !STRICT_PARAMS_PATTERN.is_match(raw) {
        errors.push(Diagnostic::at(
            field.line,
            format!(
                "For stream {}, format parameters must each be terminated by a semicolon and a single space ('; '), as per the strict whitespace form of SMPTE ST 2110-20 Section 7.",
                stream.index
            ),
        ));
    }

    let mut params = BTreeMap::new();
    let mut repeated: Vec<String> = vec![];
    for token in raw.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        let (key, value) = match token.split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim().to_owned())),
            None => (token, None),
        };

        if key.is_empty() || key.contains(char::is_whitespace) {
            errors.push(Diagnostic::at(
                field.line,
                format!(
                    "For stream {}, format parameter '{}' is not a valid '<name>=<value>' pair separated from others by semicolons, as per RFC 4566 Section 6.",
                    stream.index, token
                ),
            ));
            continue;
        }
        if let Some(v) = &value {
            if v.contains(char::is_whitespace) {
                errors.push(Diagnostic::at(
                    field.line,
                    format!(
                        "For stream {}, value of format parameter '{}' contains whitespace, possibly a missing semicolon, as per RFC 4566 Section 6.",
                        stream.index, key
                    ),
                ));
            }
        }

        if params.insert(key.to_owned(), value).is_some() && !repeated.iter().any(|r| r == key) {
            errors.push(Diagnostic::at(
                field.line,
                format!(
                    "For stream {}, format parameter '{}' is repeated, when each parameter name must be unique, as per RFC 4566 Section 6.",
                    stream.index, key
                ),
            ));
            repeated.push(key.to_owned());
        }
    }

    let parameters = FormatParameters {
        payload_type,
        line: field.line,
        stream: stream.index,
        params,
    };
    (Some(parameters), errors)
}
