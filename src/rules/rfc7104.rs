use super::Context;
use crate::config::Config;
use crate::description::attributes::{
    groups, mids, ATTR_KEY_GROUP, ATTR_KEY_SSRC_GROUP, SEMANTIC_TOKEN_DUPLICATION,
};
use crate::diagnostic::Diagnostic;

const ATTR_KEY_SSRC: &str = "ssrc";

pub fn check_duplication_present(ctx: &Context<'_>, config: &Config) -> Vec<Diagnostic> {
    if !config.duplicate {
        return vec![];
    }
    let signalled = [ATTR_KEY_GROUP, ATTR_KEY_SSRC_GROUP].iter().any(|key| {
        groups(ctx.fields(), key)
            .iter()
            .any(|g| g.semantics == SEMANTIC_TOKEN_DUPLICATION)
    });
    if signalled {
        return vec![];
    }
    vec![Diagnostic::document(
        "Duplicated streams are required by configuration but no 'a=group:DUP' or 'a=ssrc-group:DUP' attribute was found, as per RFC 7104 Section 3.",
    )]
}

pub fn check_duplication_references(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    let mut errors = vec![];
    let mids = mids(ctx.streams());

    for g in groups(ctx.fields(), ATTR_KEY_GROUP)
        .iter()
        .filter(|g| g.semantics == SEMANTIC_TOKEN_DUPLICATION)
    {
        if g.ids.len() < 2 {
            errors.push(Diagnostic::at(
                g.line,
                "Duplication group must reference at least two media stream identifiers, as per RFC 7104 Section 3.",
            ));
        }
        for (n, id) in g.ids.iter().enumerate() {
            if g.ids[..n].contains(id) {
                errors.push(Diagnostic::at(
                    g.line,
                    format!(
                        "Duplication group references media stream identifier '{id}' more than once, as per RFC 5888 Section 5."
                    ),
                ));
            } else if !mids.iter().any(|m| m.id == *id) {
                errors.push(Diagnostic::at(
                    g.line,
                    format!(
                        "Duplication group references media stream identifier '{id}' that is not the 'a=mid' of any stream, as per RFC 5888 Section 5."
                    ),
                ));
            }
        }
    }

    // ssrc-group members are SSRCs declared by the same stream.
    for s in ctx.streams() {
        let ssrcs: Vec<&str> = s
            .attribute_values(ATTR_KEY_SSRC)
            .filter_map(|(_, v)| v.split_whitespace().next())
            .collect();
        for g in groups(s.fields, ATTR_KEY_SSRC_GROUP)
            .iter()
            .filter(|g| g.semantics == SEMANTIC_TOKEN_DUPLICATION)
        {
            if g.ids.len() < 2 {
                errors.push(Diagnostic::at(
                    g.line,
                    format!(
                        "For stream {}, SSRC duplication group must reference at least two SSRCs, as per RFC 7104 Section 3.",
                        s.index
                    ),
                ));
            }
            for id in g.ids.iter().filter(|id| !ssrcs.contains(id)) {
                errors.push(Diagnostic::at(
                    g.line,
                    format!(
                        "For stream {}, SSRC duplication group references SSRC '{}' that has no 'a=ssrc' attribute in the stream, as per RFC 7104 Section 3.",
                        s.index, id
                    ),
                ));
            }
        }
    }
    errors
}

pub fn check_unique_mids(ctx: &Context<'_>, _: &Config) -> Vec<Diagnostic> {
    let mids = mids(ctx.streams());
    mids.iter()
        .enumerate()
        .filter_map(|(n, m)| {
            let first = mids[..n].iter().find(|earlier| earlier.id == m.id)?;
            Some(Diagnostic::at(
                m.line,
                format!(
                    "For stream {}, media stream identifier '{}' is already used by stream {}, when identifiers must be unique, as per RFC 5888 Section 4.",
                    m.stream, m.id, first.stream
                ),
            ))
        })
        .collect()
}
