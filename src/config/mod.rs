
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// AddressFamily is the IP version a test run expects every origin and
/// connection address to use.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    #[default]
    Unspecified,
    Ip4,
    Ip6,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AddressFamily::Ip4 => "IP4",
            AddressFamily::Ip6 => "IP6",
            AddressFamily::Unspecified => "Unspecified",
        };
        write!(f, "{s}")
    }
}

/// CastMode selects whether connection addresses are expected to be
/// multicast groups or unicast hosts.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastMode {
    #[default]
    Unspecified,
    Multicast,
    Unicast,
}

/// MediaKind restricts every stream of a document to a single `m=` media type.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Unspecified,
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Unspecified => "Unspecified",
        };
        write!(f, "{s}")
    }
}

/// Config collects the options of one validation run. It is resolved once,
/// before the document is checked, and is only ever read by the rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Check "should" clauses as well as "shall" clauses.
    pub should: bool,

    /// Report any LF or CR that is not part of a CRLF pair.
    pub check_endings: bool,

    /// Require format parameters to be written as `key=value; ` with exactly
    /// one space after every semicolon, the last parameter included.
    pub whitespace: bool,

    pub address_family: AddressFamily,

    pub cast: CastMode,

    /// Duplicated streams (RFC 7104 `DUP` grouping) must be signalled.
    pub duplicate: bool,

    pub media_kind: MediaKind,

    /// Audio streams must carry a `channel-order` format parameter.
    pub channel_order: bool,

    /// Video streams must carry the ST 2110-21 traffic shaping parameters.
    pub shaping: bool,

    /// Reject obvious copies of the ST 2110-20 example document.
    pub no_copy: bool,

    /// Reject documents without any media descriptions.
    pub no_media: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            should: false,
            check_endings: false,
            whitespace: false,
            address_family: AddressFamily::Unspecified,
            cast: CastMode::Unspecified,
            duplicate: false,
            media_kind: MediaKind::Unspecified,
            channel_order: false,
            shaping: false,
            no_copy: true,
            no_media: true,
        }
    }
}

impl Config {
    /// from_json reads a configuration from a JSON object. Missing keys take
    /// their default value.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
