
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::AddressFamily;

lazy_static! {
    static ref IP4_PATTERN: Regex =
        Regex::new(r"^([1-9]\d?\d?)\.(\d\d?\d?)\.(\d\d?\d?)\.(\d\d?\d?)$").unwrap();
    // A deliberately permissive shape check, not a full RFC 4291 parser.
    static ref IP6_PATTERN: Regex =
        Regex::new(r"(?i)^[0-9a-f]*:[0-9a-f]*(:[0-9a-f]+)*:[0-9a-f]+$").unwrap();
    static ref MULTICAST_PATTERN: Regex =
        Regex::new(r"(?i)^(((22[4-9]|23[0-9])(\.\d\d?\d?){3})|(ff[0-7][123458e]::\S+))$").unwrap();
}

/// Returns true for a dotted-quad IPv4 literal with every octet in range.
pub fn is_ip4(address: &str) -> bool {
    match IP4_PATTERN.captures(address) {
        Some(caps) => (1..=4).all(|i| caps[i].parse::<u16>().map_or(false, |o| o <= 255)),
        None => false,
    }
}

pub fn is_ip6(address: &str) -> bool {
    IP6_PATTERN.is_match(address)
}

/// Returns true for an IPv4 address in 224.0.0.0/4 or an IPv6 `ff0x::`
/// multicast address.
pub fn is_multicast(address: &str) -> bool {
    MULTICAST_PATTERN.is_match(address)
}

/// Returns true when the literal belongs to the given family. Every address
/// matches an unspecified family.
pub fn matches_family(address: &str, family: AddressFamily) -> bool {
    match family {
        AddressFamily::Ip4 => is_ip4(address),
        AddressFamily::Ip6 => is_ip6(address),
        AddressFamily::Unspecified => true,
    }
}

/// Returns Ok for a multicast TTL in the range 0 to 255.
pub fn check_ttl(ttl: &str) -> std::result::Result<u8, String> {
    if ttl.is_empty() || !ttl.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{ttl}' is not a number"));
    }
    ttl.parse::<u8>()
        .map_err(|_| format!("'{ttl}' is outside the range 0 to 255"))
}

pub fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Rational is a parsed `N` or `N<sep>D` value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rational {
    pub numerator: u64,
    pub denominator: Option<u64>,
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.denominator {
            Some(d) => write!(f, "{}/{}", self.numerator, d),
            None => write!(f, "{}", self.numerator),
        }
    }
}

/// RationalError describes why a frame rate or aspect ratio is rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RationalError {
    /// Numerator or denominator is not a decimal integer.
    NotInteger,
    /// Numerator or denominator is zero.
    Zero,
    /// The denominator is larger than the numerator, a rate below one per
    /// second.
    TooSlow,
    /// Numerator and denominator share a common factor.
    NotReduced,
    /// An integer value written with a denominator of one.
    SuperfluousDenominator,
    /// A denominator is required but absent.
    MissingDenominator,
}

impl fmt::Display for RationalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RationalError::NotInteger => "is not an integer or a ratio of two integers",
            RationalError::Zero => "has a zero numerator or denominator",
            RationalError::TooSlow => "is too slow, with a denominator greater than its numerator",
            RationalError::NotReduced => "is not reduced to its lowest terms",
            RationalError::SuperfluousDenominator => {
                "is an integer and must not be written with a denominator"
            }
            RationalError::MissingDenominator => "must be written as a ratio of two integers",
        };
        write!(f, "{s}")
    }
}

fn parse_part(s: &str) -> std::result::Result<u64, RationalError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RationalError::NotInteger);
    }
    s.parse::<u64>().map_err(|_| RationalError::NotInteger)
}

pub fn parse_rational(value: &str, separator: char) -> std::result::Result<Rational, RationalError> {
    let (n, d) = match value.split_once(separator) {
        Some((n, d)) => (n, Some(d)),
        None => (value, None),
    };
    let numerator = parse_part(n)?;
    let denominator = d.map(parse_part).transpose()?;
    Ok(Rational {
        numerator,
        denominator,
    })
}

/// Checks an ST 2110-20 `exactframerate`: an integer, or a ratio in lowest
/// terms that is not itself an integer and is at least one frame per second.
/// The first failing check is returned.
pub fn check_frame_rate(value: &str) -> std::result::Result<Rational, RationalError> {
    let rate = parse_rational(value, '/')?;
    if rate.numerator == 0 || rate.denominator == Some(0) {
        return Err(RationalError::Zero);
    }
    if let Some(d) = rate.denominator {
        if d > rate.numerator {
            return Err(RationalError::TooSlow);
        }
        if gcd(rate.numerator, d) != 1 {
            return Err(RationalError::NotReduced);
        }
        if d == 1 {
            return Err(RationalError::SuperfluousDenominator);
        }
    }
    Ok(rate)
}

/// Checks an ST 2110-20 `PAR`, written `<width>:<height>` in lowest terms.
pub fn check_aspect_ratio(value: &str) -> std::result::Result<Rational, RationalError> {
    let par = parse_rational(value, ':')?;
    let Some(d) = par.denominator else {
        return Err(RationalError::MissingDenominator);
    };
    if par.numerator == 0 || d == 0 {
        return Err(RationalError::Zero);
    }
    if gcd(par.numerator, d) != 1 {
        return Err(RationalError::NotReduced);
    }
    Ok(par)
}
