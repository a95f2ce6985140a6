#[cfg(test)]
mod lexer_test;

use std::{fmt, io};

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    // `<type>=<value>` with no whitespace either side of the equals sign.
    // An empty session name is conventionally written as a single space.
    static ref LINE_PATTERN: Regex = Regex::new(r"^(?s:[a-z]=\S.*|s= )$").unwrap();
}

/// FieldType is the closed alphabet of type letters defined by RFC 4566.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// `v=` protocol version
    Version,
    /// `o=` originator and session identifier
    Origin,
    /// `s=` session name
    SessionName,
    /// `i=` session or media title
    Information,
    /// `u=` URI of description
    Uri,
    /// `e=` email address
    Email,
    /// `p=` phone number
    Phone,
    /// `c=` connection information
    Connection,
    /// `b=` bandwidth information
    Bandwidth,
    /// `z=` time zone adjustments
    TimeZone,
    /// `k=` encryption key
    EncryptionKey,
    /// `a=` attribute
    Attribute,
    /// `t=` time the session is active
    Timing,
    /// `r=` repeat times
    RepeatTimes,
    /// `m=` media name and transport address
    Media,
}

impl FieldType {
    pub fn from_letter(c: char) -> Option<Self> {
        let t = match c {
            'v' => FieldType::Version,
            'o' => FieldType::Origin,
            's' => FieldType::SessionName,
            'i' => FieldType::Information,
            'u' => FieldType::Uri,
            'e' => FieldType::Email,
            'p' => FieldType::Phone,
            'c' => FieldType::Connection,
            'b' => FieldType::Bandwidth,
            'z' => FieldType::TimeZone,
            'k' => FieldType::EncryptionKey,
            'a' => FieldType::Attribute,
            't' => FieldType::Timing,
            'r' => FieldType::RepeatTimes,
            'm' => FieldType::Media,
            _ => return None,
        };
        Some(t)
    }

    pub fn letter(&self) -> char {
        match self {
            FieldType::Version => 'v',
            FieldType::Origin => 'o',
            FieldType::SessionName => 's',
            FieldType::Information => 'i',
            FieldType::Uri => 'u',
            FieldType::Email => 'e',
            FieldType::Phone => 'p',
            FieldType::Connection => 'c',
            FieldType::Bandwidth => 'b',
            FieldType::TimeZone => 'z',
            FieldType::EncryptionKey => 'k',
            FieldType::Attribute => 'a',
            FieldType::Timing => 't',
            FieldType::RepeatTimes => 'r',
            FieldType::Media => 'm',
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Field is one physical line of a document, malformed or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// 1-based physical line number.
    pub line: usize,
    /// First character of the line, `None` for a blank line.
    pub letter: Option<char>,
    /// Recognised type of the line, `None` when the letter is outside the
    /// RFC 4566 alphabet.
    pub field_type: Option<FieldType>,
    /// Everything after `<type>=`, or empty when the line has no `=` in the
    /// second position.
    pub value: String,
    /// The complete line without its line ending.
    pub text: String,
}

impl Field {
    fn new(line: usize, text: &str) -> Self {
        let mut chars = text.chars();
        let letter = chars.next();
        let value = match chars.next() {
            Some('=') => chars.as_str().to_owned(),
            _ => String::new(),
        };
        Field {
            line,
            letter,
            field_type: letter.and_then(FieldType::from_letter),
            value,
            text: text.to_owned(),
        }
    }

    /// Returns true when the line has the `<type>=<value>` shape.
    pub fn is_well_formed(&self) -> bool {
        LINE_PATTERN.is_match(&self.text)
    }

    pub fn is_blank(&self) -> bool {
        self.letter.is_none()
    }

    pub fn is(&self, t: FieldType) -> bool {
        self.field_type == Some(t)
    }

    /// For an `a=` line, splits the value into attribute name and the optional
    /// value following the first colon.
    pub fn attribute(&self) -> Option<(&str, Option<&str>)> {
        if !self.is(FieldType::Attribute) {
            return None;
        }
        match self.value.split_once(':') {
            Some((key, value)) => Some((key, Some(value))),
            None => Some((self.value.as_str(), None)),
        }
    }

    /// Returns the value of an `a=<key>:<value>` line when the key matches.
    pub fn attribute_value(&self, key: &str) -> Option<&str> {
        match self.attribute() {
            Some((k, v)) if k == key => v,
            _ => None,
        }
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        matches!(self.attribute(), Some((k, _)) if k == key)
    }
}

/// LineEndings summarises which record terminators appear in a document.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LineEndings {
    pub crlf: bool,
    pub bare_lf: bool,
    pub bare_cr: bool,
}

impl LineEndings {
    pub fn scan(text: &str) -> Self {
        let mut endings = LineEndings::default();
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    endings.crlf = true;
                    i += 1;
                }
                b'\r' => endings.bare_cr = true,
                b'\n' => endings.bare_lf = true,
                _ => {}
            }
            i += 1;
        }
        endings
    }

    /// Returns true when every terminator is a CRLF pair.
    pub fn is_strict(&self) -> bool {
        !self.bare_lf && !self.bare_cr
    }
}

/// Splits text into physical lines. CRLF, a bare LF and a bare CR each end a
/// line; a terminator at the very end does not start another line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = vec![];
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// classify turns every physical line into a [`Field`].
pub fn classify(text: &str) -> Vec<Field> {
    split_lines(text)
        .into_iter()
        .enumerate()
        .map(|(i, line)| Field::new(i + 1, line))
        .collect()
}

/// Document is the immutable input of one validation run.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    fields: Vec<Field>,
    endings: LineEndings,
}

impl Document {
    pub fn new<S: Into<String>>(text: S) -> Result<Self> {
        let text = text.into();
        if text.chars().all(|c| c == '\r' || c == '\n') {
            return Err(Error::EmptyDocument);
        }

        let fields = classify(&text);
        let endings = LineEndings::scan(&text);
        log::trace!(
            "classified {} lines (crlf: {}, bare lf: {}, bare cr: {})",
            fields.len(),
            endings.crlf,
            endings.bare_lf,
            endings.bare_cr
        );

        Ok(Document {
            text,
            fields,
            endings,
        })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Document::new(String::from_utf8(bytes)?)
    }

    /// Reads a document to the end of `reader`.
    pub fn from_reader<R: io::Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes)?;
        Document::from_bytes(bytes)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn endings(&self) -> LineEndings {
        self.endings
    }

    /// Line number of the last physical line.
    pub fn last_line(&self) -> usize {
        self.fields.len()
    }
}
