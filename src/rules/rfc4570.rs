use super::Context;
use crate::config::Config;
use crate::description::attributes::{connection, source_filter, ATTR_KEY_SOURCE_FILTER};
use crate::diagnostic::Diagnostic;
use crate::lexer::{Field, FieldType};

const ADDRESS_TYPES: [&str; 3] = ["IP4", "IP6", "*"];

pub fn check_source_filter_shape(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    ctx.fields()
        .iter()
        .filter(|f| f.has_attribute(ATTR_KEY_SOURCE_FILTER))
        .filter(|f| {
            let filter = f.attribute_value(ATTR_KEY_SOURCE_FILTER).and_then(source_filter);
            !matches!(filter, Some(sf) if sf.net_type == "IN" && ADDRESS_TYPES.contains(&sf.addr_type))
        })
        .map(|f| {
            Diagnostic::at(
                f.line,
                "Source-filters must follow the pattern 'a=source-filter: <filter-mode> <nettype> <address-types> <dest-address> <src-list>', as per RFC 4570 Section 3.",
            )
        })
        .collect()
}

fn addresses<'a>(fields: impl Iterator<Item = &'a Field>) -> Vec<&'a str> {
    fields
        .filter(|f| f.is(FieldType::Connection))
        .filter_map(|f| connection(&f.value))
        .map(|c| c.address)
        .collect()
}

fn check_destinations(filters: &[&Field], visible: &[&str]) -> Vec<Diagnostic> {
    filters
        .iter()
        .filter_map(|f| {
            let value = f.attribute_value(ATTR_KEY_SOURCE_FILTER)?;
            source_filter(value).map(|sf| (f.line, sf.destination))
        })
        .filter(|(_, dest)| *dest != "*" && !visible.contains(dest))
        .map(|(line, dest)| {
            Diagnostic::at(
                line,
                format!(
                    "Source-filter destination address '{dest}' does not match any connection data address in scope, as per RFC 4570 Section 3."
                ),
            )
        })
        .collect()
}

/// A session-level filter may name any connection address of the document; a
/// media-level filter only its own stream's or the session's.
pub fn check_source_filter_destination(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    let session = ctx.segments.session;
    let session_filters: Vec<&Field> = session
        .iter()
        .filter(|f| f.has_attribute(ATTR_KEY_SOURCE_FILTER))
        .collect();

    let mut errors = check_destinations(&session_filters, &addresses(ctx.fields().iter()));
    for s in ctx.streams() {
        let filters: Vec<&Field> = s
            .attributes()
            .filter(|f| f.has_attribute(ATTR_KEY_SOURCE_FILTER))
            .collect();
        if filters.is_empty() {
            continue;
        }
        let visible = addresses(session.iter().chain(s.fields.iter()));
        errors.extend(check_destinations(&filters, &visible));
    }
    errors
}
