#[cfg(test)]
mod rules_test;

pub mod rfc4566;
pub mod rfc4570;
pub mod rfc7104;
pub mod st2110_10;
pub mod st2110_20;
pub mod st2110_21;
pub mod st2110_30;

use std::fmt;

use crate::config::Config;
use crate::description::attributes::{extract_parameters, FormatParameters};
use crate::description::{segment, Segments, Stream};
use crate::diagnostic::Diagnostic;
use crate::lexer::{Document, Field};

/// Section groups the rules checking one clause of one specification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Section {
    /// RFC 4566 Section 5, SDP specification
    Rfc4566Format,
    /// RFC 4566 Section 5.1, protocol version
    Rfc4566Version,
    /// RFC 4566 Section 5.2, origin
    Rfc4566Origin,
    /// RFC 4566 Section 5.7, connection data
    Rfc4566Connection,
    /// RFC 4566 Section 5.14, media descriptions
    Rfc4566Media,
    /// RFC 4566 Section 6, SDP attributes
    Rfc4566Attributes,
    /// RFC 4570 Section 3, source filters
    Rfc4570SourceFilter,
    /// RFC 7104 Section 3 and RFC 5888, duplication grouping
    Rfc7104Duplication,
    /// SMPTE ST 2110-10 Section 8, media and reference clocks
    St2110Clock,
    /// SMPTE ST 2110-20 Section 7, uncompressed video
    St2110Video,
    /// SMPTE ST 2110-21 Section 8, traffic shaping
    St2110Shaping,
    /// SMPTE ST 2110-30 Section 6, PCM audio
    St2110Audio,
    /// Copies of the example document in SMPTE ST 2110-20
    ExampleCopy,
}

pub const SECTIONS: [Section; 13] = [
    Section::Rfc4566Format,
    Section::Rfc4566Version,
    Section::Rfc4566Origin,
    Section::Rfc4566Connection,
    Section::Rfc4566Media,
    Section::Rfc4566Attributes,
    Section::Rfc4570SourceFilter,
    Section::Rfc7104Duplication,
    Section::St2110Clock,
    Section::St2110Video,
    Section::St2110Shaping,
    Section::St2110Audio,
    Section::ExampleCopy,
];

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Section::Rfc4566Format => "RFC 4566 Section 5",
            Section::Rfc4566Version => "RFC 4566 Section 5.1",
            Section::Rfc4566Origin => "RFC 4566 Section 5.2",
            Section::Rfc4566Connection => "RFC 4566 Section 5.7",
            Section::Rfc4566Media => "RFC 4566 Section 5.14",
            Section::Rfc4566Attributes => "RFC 4566 Section 6",
            Section::Rfc4570SourceFilter => "RFC 4570 Section 3",
            Section::Rfc7104Duplication => "RFC 7104 Section 3",
            Section::St2110Clock => "SMPTE ST 2110-10 Section 8",
            Section::St2110Video => "SMPTE ST 2110-20 Section 7",
            Section::St2110Shaping => "SMPTE ST 2110-21 Section 8",
            Section::St2110Audio => "SMPTE ST 2110-30 Section 6",
            Section::ExampleCopy => "SMPTE ST 2110-20 Appendix",
        };
        write!(f, "{s}")
    }
}

/// Context holds the structures derived from a document once per run and
/// shared read-only by every rule.
pub struct Context<'a> {
    pub document: &'a Document,
    pub segments: Segments<'a>,
    /// Extracted format parameters and extraction findings, one entry per
    /// stream in stream order.
    pub parameters: Vec<(Option<FormatParameters>, Vec<Diagnostic>)>,
}

impl<'a> Context<'a> {
    pub fn new(document: &'a Document, config: &Config) -> Self {
        let segments = segment(document.fields());
        let parameters = segments
            .streams
            .iter()
            .map(|s| extract_parameters(s, config))
            .collect();
        Context {
            document,
            segments,
            parameters,
        }
    }

    pub fn fields(&self) -> &'a [Field] {
        self.document.fields()
    }

    pub fn streams(&self) -> &[Stream<'a>] {
        &self.segments.streams
    }

    /// Format parameters of the stream with the given 1-based index.
    pub fn parameters(&self, stream: usize) -> Option<&FormatParameters> {
        self.parameters
            .get(stream.checked_sub(1)?)
            .and_then(|(p, _)| p.as_ref())
    }
}

pub type CheckFn = fn(&Context<'_>, &Config) -> Vec<Diagnostic>;

/// Rule describes one entry of the catalog.
pub struct Rule {
    /// Stable identifier, stamped on every diagnostic the rule produces.
    pub id: &'static str,
    pub section: Section,
    /// Clause the rule enforces.
    pub clause: &'static str,
    pub check: CheckFn,
}

impl Rule {
    pub fn evaluate(&self, ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
        let mut errors = (self.check)(ctx, config);
        for e in &mut errors {
            e.rule = self.id;
        }
        errors
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("section", &self.section)
            .field("clause", &self.clause)
            .finish()
    }
}

macro_rules! rule {
    ($id:expr, $section:ident, $clause:expr, $check:path) => {
        Rule {
            id: $id,
            section: Section::$section,
            clause: $clause,
            check: $check,
        }
    };
}

/// The rule catalog, in evaluation order.
pub static RULES: &[Rule] = &[
    rule!("4566-5-endings", Rfc4566Format, "RFC 4566 Section 5", rfc4566::check_line_endings),
    rule!("4566-5-shape", Rfc4566Format, "RFC 4566 Section 5", rfc4566::check_line_shape),
    rule!("4566-5-letter", Rfc4566Format, "RFC 4566 Section 5", rfc4566::check_type_letters),
    rule!("4566-5-mandatory", Rfc4566Format, "RFC 4566 Section 5", rfc4566::check_mandatory),
    rule!("4566-5-order", Rfc4566Format, "RFC 4566 Section 5", rfc4566::check_order),
    rule!("4566-5-nul", Rfc4566Format, "RFC 4566 Section 5", rfc4566::check_nul),
    rule!("4566-5.1-version", Rfc4566Version, "RFC 4566 Section 5.1", rfc4566::check_version),
    rule!("4566-5.2-origin", Rfc4566Origin, "RFC 4566 Section 5.2", rfc4566::check_origin),
    rule!("4566-5.2-address", Rfc4566Origin, "RFC 4566 Section 5.2", rfc4566::check_origin_address),
    rule!("4566-5.7-presence", Rfc4566Connection, "RFC 4566 Section 5.7", rfc4566::check_connection_presence),
    rule!("4566-5.7-shape", Rfc4566Connection, "RFC 4566 Section 5.7", rfc4566::check_connection_shape),
    rule!("4566-5.7-cast", Rfc4566Connection, "RFC 4566 Section 5.7", rfc4566::check_connection_cast),
    rule!("4566-5.14-media", Rfc4566Media, "RFC 4566 Section 5.14", rfc4566::check_media_line),
    rule!("4566-5.14-no-media", Rfc4566Media, "RFC 4566 Section 5.14", rfc4566::check_no_media),
    rule!("4566-5.14-kind", Rfc4566Media, "RFC 4566 Section 5.14", rfc4566::check_media_kind),
    rule!("4566-6-rtpmap", Rfc4566Attributes, "RFC 4566 Section 6", rfc4566::check_rtpmap_shape),
    rule!("4566-6-fmtp", Rfc4566Attributes, "RFC 4566 Section 6", rfc4566::check_format_parameters),
    rule!("4570-3-shape", Rfc4570SourceFilter, "RFC 4570 Section 3", rfc4570::check_source_filter_shape),
    rule!("4570-3-dest", Rfc4570SourceFilter, "RFC 4570 Section 3", rfc4570::check_source_filter_destination),
    rule!("7104-3-present", Rfc7104Duplication, "RFC 7104 Section 3", rfc7104::check_duplication_present),
    rule!("7104-3-refs", Rfc7104Duplication, "RFC 7104 Section 3", rfc7104::check_duplication_references),
    rule!("5888-4-unique", Rfc7104Duplication, "RFC 5888 Section 4", rfc7104::check_unique_mids),
    rule!("2110-10-8.1-mediaclk", St2110Clock, "SMPTE ST 2110-10 Section 8.1", st2110_10::check_media_clock_present),
    rule!("2110-10-8.1-direct", St2110Clock, "SMPTE ST 2110-10 Section 8.1", st2110_10::check_media_clock_direct),
    rule!("2110-10-8.2-refclk", St2110Clock, "SMPTE ST 2110-10 Section 8.2", st2110_10::check_reference_clock_present),
    rule!("2110-10-8.2-format", St2110Clock, "SMPTE ST 2110-10 Section 8.2", st2110_10::check_reference_clock_format),
    rule!("2110-20-7.1-rtpmap", St2110Video, "SMPTE ST 2110-20 Section 7.1", st2110_20::check_video_rtpmap),
    rule!("2110-20-7.1-fmtp", St2110Video, "SMPTE ST 2110-20 Section 7.1", st2110_20::check_video_fmtp),
    rule!("2110-20-7.2-required", St2110Video, "SMPTE ST 2110-20 Section 7.2", st2110_20::check_required_parameters),
    rule!("2110-20-7.2-values", St2110Video, "SMPTE ST 2110-20 Section 7.2", st2110_20::check_parameter_values),
    rule!("2110-20-7.3-optional", St2110Video, "SMPTE ST 2110-20 Section 7.3", st2110_20::check_optional_parameters),
    rule!("2110-21-8.1-tp", St2110Shaping, "SMPTE ST 2110-21 Section 8.1", st2110_21::check_sender_type),
    rule!("2110-21-8.2-numbers", St2110Shaping, "SMPTE ST 2110-21 Section 8.2", st2110_21::check_shaping_numbers),
    rule!("2110-30-6.1-rtpmap", St2110Audio, "SMPTE ST 2110-30 Section 6.1", st2110_30::check_audio_rtpmap),
    rule!("2110-30-6.2-ptime", St2110Audio, "SMPTE ST 2110-30 Section 6.2", st2110_30::check_packet_time),
    rule!("2110-30-6.2.2-channel-order", St2110Audio, "SMPTE ST 2110-30 Section 6.2.2", st2110_30::check_channel_order),
    rule!("copy-2110-20", ExampleCopy, "SMPTE ST 2110-20 Appendix", st2110_20::check_example_copy),
];

/// Looks a rule up by identifier.
pub fn find(id: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.id == id)
}

/// Evaluates every rule of one section over a prepared context.
pub fn evaluate_section(section: Section, ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    let errors: Vec<Diagnostic> = RULES
        .iter()
        .filter(|r| r.section == section)
        .flat_map(|r| r.evaluate(ctx, config))
        .collect();
    log::debug!("{}: {} diagnostics", section, errors.len());
    errors
}

/// Runs the rules of one section over a document.
pub fn section(section: Section, document: &Document, config: &Config) -> Vec<Diagnostic> {
    let ctx = Context::new(document, config);
    evaluate_section(section, &ctx, config)
}

/// Runs a single rule over a document.
pub fn rule(id: &str, document: &Document, config: &Config) -> Option<Vec<Diagnostic>> {
    let rule = find(id)?;
    let ctx = Context::new(document, config);
    Some(rule.evaluate(&ctx, config))
}

/// Runs every section in catalog order and concatenates the findings.
/// Findings are not deduplicated.
pub fn all_sections(document: &Document, config: &Config) -> Vec<Diagnostic> {
    let ctx = Context::new(document, config);
    log::debug!(
        "checking {} lines, {} streams",
        document.fields().len(),
        ctx.streams().len()
    );
    SECTIONS
        .iter()
        .flat_map(|s| evaluate_section(*s, &ctx, config))
        .collect()
}
