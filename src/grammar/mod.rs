
use std::fmt;

use crate::diagnostic::Diagnostic;
use crate::lexer::{Field, FieldType};

use FieldType::*;

/// GrammarState is the phase of a description the ordering machine is in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GrammarState {
    Session,
    Time,
    Media,
}

impl fmt::Display for GrammarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GrammarState::Session => "session",
            GrammarState::Time => "time",
            GrammarState::Media => "media",
        };
        write!(f, "{s}")
    }
}

type Successors = &'static [(FieldType, GrammarState)];

const S: GrammarState = GrammarState::Session;
const T: GrammarState = GrammarState::Time;
const M: GrammarState = GrammarState::Media;

/// successors returns the field types that may legally follow `prev` while
/// in `state`, each with the state the machine moves to. `None` means the
/// table has no entry for the pair and the previous successor set stays in
/// force.
///
/// The fixed order of RFC 4566 Section 5 is cumulative: a later type in a
/// block can never be followed by an earlier one.
pub fn successors(state: GrammarState, prev: FieldType) -> Option<Successors> {
    let next: Successors = match (state, prev) {
        (GrammarState::Session, Version) => &[(Origin, S)],
        (GrammarState::Session, Origin) => &[(SessionName, S)],
        (GrammarState::Session, SessionName | Information) => &[
            (Information, S),
            (Uri, S),
            (Email, S),
            (Phone, S),
            (Connection, S),
            (Bandwidth, S),
            (Timing, T),
        ],
        (GrammarState::Session, Uri) => &[
            (Uri, S),
            (Email, S),
            (Phone, S),
            (Connection, S),
            (Bandwidth, S),
            (Timing, T),
        ],
        (GrammarState::Session, Email) => &[
            (Email, S),
            (Phone, S),
            (Connection, S),
            (Bandwidth, S),
            (Timing, T),
        ],
        (GrammarState::Session, Phone) => {
            &[(Phone, S), (Connection, S), (Bandwidth, S), (Timing, T)]
        }
        (GrammarState::Session, Connection) => &[(Connection, S), (Bandwidth, S), (Timing, T)],
        (GrammarState::Session, Bandwidth) => &[(Bandwidth, S), (Timing, T)],
        (GrammarState::Session, TimeZone) => {
            &[(TimeZone, S), (EncryptionKey, S), (Attribute, S), (Media, M)]
        }
        (GrammarState::Session, EncryptionKey) => {
            &[(EncryptionKey, S), (Attribute, S), (Media, M)]
        }
        (GrammarState::Session, Attribute) => &[(Attribute, S), (Media, M)],
        (GrammarState::Time, Timing | RepeatTimes) => &[
            (RepeatTimes, T),
            (Timing, T),
            (TimeZone, S),
            (EncryptionKey, S),
            (Attribute, S),
            (Media, M),
        ],
        (GrammarState::Media, Media | Information) => &[
            (Information, M),
            (Connection, M),
            (Bandwidth, M),
            (EncryptionKey, M),
            (Attribute, M),
            (Media, M),
        ],
        (GrammarState::Media, Connection) => &[
            (Connection, M),
            (Bandwidth, M),
            (EncryptionKey, M),
            (Attribute, M),
            (Media, M),
        ],
        (GrammarState::Media, Bandwidth) => {
            &[(Bandwidth, M), (EncryptionKey, M), (Attribute, M), (Media, M)]
        }
        (GrammarState::Media, EncryptionKey) => &[(EncryptionKey, M), (Attribute, M), (Media, M)],
        (GrammarState::Media, Attribute) => &[(Attribute, M), (Media, M)],
        _ => return None,
    };
    Some(next)
}

/// check_order walks the non-blank fields through the successor table. An
/// illegal successor is reported and skipped: the machine keeps the state and
/// the predecessor of its last good transition, so a single misplaced line is
/// reported once rather than cascading into the lines after it. A first line
/// the table knows nothing about, such as a stray `t=` or a byte order mark,
/// is likewise reported once and the walk restarts from the line after it.
pub fn check_order(fields: &[Field]) -> Vec<Diagnostic> {
    let mut errors = vec![];
    let mut state = GrammarState::Session;
    let mut next: Successors = &[];

    let mut lines = fields.iter().filter(|f| !f.is_blank());
    let Some(mut prev) = lines.next() else {
        return errors;
    };

    for cur in lines {
        if let Some(moving_on) = prev.field_type.and_then(|t| successors(state, t)) {
            next = moving_on;
        }

        let target = cur
            .field_type
            .and_then(|t| next.iter().find(|(n, _)| *n == t));
        match target {
            Some((_, to)) => {
                state = *to;
                prev = cur;
            }
            None => {
                errors.push(Diagnostic::at(
                    cur.line,
                    format!(
                        "SDP type '{}' cannot be followed by type '{}', as per the fixed order of RFC 4566 Section 5.",
                        prev.letter.unwrap_or_default(),
                        cur.letter.unwrap_or_default(),
                    ),
                ));
                // no line has been accepted yet, so the walk restarts here
                if next.is_empty() {
                    prev = cur;
                }
            }
        }
    }

    errors
}

const MUST_HAVES: [FieldType; 4] = [Version, Origin, SessionName, Timing];

/// check_mandatory reports every mandatory type that never occurs.
pub fn check_mandatory(fields: &[Field]) -> Vec<Diagnostic> {
    MUST_HAVES
        .iter()
        .filter(|t| !fields.iter().any(|f| f.is(**t)))
        .map(|t| {
            Diagnostic::document(format!(
                "An SDP file must have at least one record of type '{t}', as per RFC 4566 Section 5."
            ))
        })
        .collect()
}

/// check_first_field requires the document to open with `v=0`.
pub fn check_first_field(fields: &[Field]) -> Vec<Diagnostic> {
    match fields.first() {
        Some(f) if f.text.starts_with("v=0") => vec![],
        _ => vec![Diagnostic::at(
            1,
            "The first line must be 'v=0', as per RFC 4566 Section 5.1.",
        )],
    }
}
