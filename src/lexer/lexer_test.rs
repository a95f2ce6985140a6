use super::*;

#[test]
fn test_split_lines() {
    let tests = vec![
        ("v=0\r\no=x\r\n", vec!["v=0", "o=x"]),
        ("v=0\no=x", vec!["v=0", "o=x"]),
        ("v=0\ro=x\r", vec!["v=0", "o=x"]),
        ("v=0\r\n\r\no=x\r\n", vec!["v=0", "", "o=x"]),
        ("v=0\n\r\no=x", vec!["v=0", "", "o=x"]),
    ];

    for (input, expected) in tests {
        assert_eq!(split_lines(input), expected, "input {input:?}");
    }
}

#[test]
fn test_classify() {
    let fields = classify("v=0\r\nx=1\r\n\r\nm=video 5004 RTP/AVP 96\r\nbad\r\n");
    assert_eq!(fields.len(), 5);

    assert_eq!(fields[0].line, 1);
    assert_eq!(fields[0].letter, Some('v'));
    assert_eq!(fields[0].field_type, Some(FieldType::Version));
    assert_eq!(fields[0].value, "0");
    assert!(fields[0].is_well_formed());

    assert_eq!(fields[1].letter, Some('x'));
    assert_eq!(fields[1].field_type, None);
    assert!(fields[1].is_well_formed());

    assert!(fields[2].is_blank());
    assert!(!fields[2].is_well_formed());
    assert_eq!(fields[2].line, 3);

    assert!(fields[3].is(FieldType::Media));
    assert_eq!(fields[3].value, "video 5004 RTP/AVP 96");

    assert_eq!(fields[4].field_type, Some(FieldType::Bandwidth));
    assert_eq!(fields[4].value, "");
    assert!(!fields[4].is_well_formed());
}

#[test]
fn test_line_shape() {
    let tests = vec![
        ("v=0", true),
        ("s= ", true),
        ("s=Session", true),
        ("a=fmtp:96 width=1920; ", true),
        ("i= leading space", false),
        ("v =0", false),
        ("V=0", false),
        ("a=", false),
        ("vv=0", false),
    ];

    for (line, expected) in tests {
        let fields = classify(line);
        assert_eq!(fields[0].is_well_formed(), expected, "line {line:?}");
    }
}

#[test]
fn test_attribute() {
    let fields = classify("a=rtpmap:96 raw/90000\r\na=recvonly\r\nc=IN IP4 1.2.3.4");
    assert_eq!(fields[0].attribute(), Some(("rtpmap", Some("96 raw/90000"))));
    assert_eq!(fields[0].attribute_value("rtpmap"), Some("96 raw/90000"));
    assert_eq!(fields[0].attribute_value("fmtp"), None);
    assert_eq!(fields[1].attribute(), Some(("recvonly", None)));
    assert!(fields[1].has_attribute("recvonly"));
    assert_eq!(fields[2].attribute(), None);
}

#[test]
fn test_line_endings() {
    let crlf = LineEndings::scan("v=0\r\no=x\r\n");
    assert!(crlf.crlf);
    assert!(crlf.is_strict());

    let mixed = LineEndings::scan("v=0\r\no=x\ns=y\r\n");
    assert!(mixed.bare_lf);
    assert!(!mixed.bare_cr);
    assert!(!mixed.is_strict());

    let cr = LineEndings::scan("v=0\ro=x\r\n");
    assert!(cr.bare_cr);
    assert!(!cr.is_strict());
}

#[test]
fn test_document() -> Result<()> {
    let doc = Document::new("v=0\r\no=- 1 1 IN IP4 192.0.2.1\r\n")?;
    assert_eq!(doc.fields().len(), 2);
    assert_eq!(doc.last_line(), 2);
    assert!(doc.endings().is_strict());
    Ok(())
}

#[test]
fn test_empty_document() {
    assert!(matches!(Document::new(""), Err(Error::EmptyDocument)));
    assert!(matches!(Document::new("\r\n\r\n"), Err(Error::EmptyDocument)));
    assert!(matches!(
        Document::from_bytes(vec![0xff, 0xfe]),
        Err(Error::Utf8(_))
    ));
}

#[test]
fn test_document_from_reader() -> Result<()> {
    let mut reader = io::Cursor::new(b"v=0\r\ns=x\r\n".to_vec());
    let doc = Document::from_reader(&mut reader)?;
    assert_eq!(doc.text(), "v=0\r\ns=x\r\n");
    assert_eq!(doc.fields()[1].value, "x");
    Ok(())
}
