
pub mod attributes;

use crate::lexer::{Field, FieldType};

/// Stream is one media description: the fields from an `m=` line up to, but
/// not including, the next `m=` line or the end of the document.
#[derive(Debug, Clone, Copy)]
pub struct Stream<'a> {
    /// 1-based position of the stream in the document.
    pub index: usize,
    pub fields: &'a [Field],
}

impl<'a> Stream<'a> {
    /// The `m=` field that opens the stream.
    pub fn media_field(&self) -> &'a Field {
        &self.fields[0]
    }

    pub fn line(&self) -> usize {
        self.fields[0].line
    }

    pub fn attributes(&self) -> impl Iterator<Item = &'a Field> + 'a {
        let fields = self.fields;
        fields.iter().filter(|f| f.is(FieldType::Attribute))
    }

    /// Returns every `a=<key>:<value>` attribute of the stream with its field.
    pub fn attribute_values<'k>(
        &self,
        key: &'k str,
    ) -> impl Iterator<Item = (&'a Field, &'a str)> + 'k
    where
        'a: 'k,
    {
        let fields = self.fields;
        fields
            .iter()
            .filter_map(move |f| f.attribute_value(key).map(|v| (f, v)))
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.fields.iter().any(|f| f.has_attribute(key))
    }

    pub fn connections(&self) -> impl Iterator<Item = &'a Field> + 'a {
        let fields = self.fields;
        fields.iter().filter(|f| f.is(FieldType::Connection))
    }
}

/// Segments splits a document into its session-level prologue and its
/// ordered streams.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    pub session: &'a [Field],
    pub streams: Vec<Stream<'a>>,
}

impl<'a> Segments<'a> {
    pub fn session_attribute_values<'k>(
        &self,
        key: &'k str,
    ) -> impl Iterator<Item = (&'a Field, &'a str)> + 'k
    where
        'a: 'k,
    {
        let session = self.session;
        session
            .iter()
            .filter_map(move |f| f.attribute_value(key).map(|v| (f, v)))
    }

    pub fn session_connections(&self) -> impl Iterator<Item = &'a Field> + 'a {
        let session = self.session;
        session.iter().filter(|f| f.is(FieldType::Connection))
    }
}

/// segment partitions classified fields at every `m=` line.
pub fn segment(fields: &[Field]) -> Segments<'_> {
    let starts: Vec<usize> = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is(FieldType::Media))
        .map(|(i, _)| i)
        .collect();

    let session_end = starts.first().copied().unwrap_or(fields.len());
    let streams = starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(fields.len());
            Stream {
                index: n + 1,
                fields: &fields[start..end],
            }
        })
        .collect();

    Segments {
        session: &fields[..session_end],
        streams,
    }
}
