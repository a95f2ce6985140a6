use std::collections::HashSet;

use super::st2110_20::ST_2110_20_EXAMPLE;
use super::st2110_30::channel_order_count;
use super::*;
use crate::config::{AddressFamily, CastMode, MediaKind};
use crate::error::Result;

const VIDEO_FMTP: &str = "a=fmtp:96 sampling=YCbCr-4:2:2; width=1920; height=1080; exactframerate=30000/1001; depth=10; TCS=SDR; colorimetry=BT709; PM=2110GPM; SSN=ST2110-20:2017; TP=2110TPN; interlace; ";

const REQUIRED_PARAMS: &str = "sampling=YCbCr-4:2:2; width=1920; height=1080; exactframerate=30000/1001; depth=10; colorimetry=BT709; PM=2110GPM; SSN=ST2110-20:2017; ";

fn video() -> String {
    format!(
        "v=0\r\n\
         o=- 1443716955 1443716955 IN IP4 192.168.1.230\r\n\
         s=Camera 1\r\n\
         t=0 0\r\n\
         a=ts-refclk:ptp=IEEE1588-2008:08-00-11-FF-FE-22-39-E4:0\r\n\
         m=video 5000 RTP/AVP 96\r\n\
         c=IN IP4 239.100.9.10/32\r\n\
         a=source-filter: incl IN IP4 239.100.9.10 192.168.1.230\r\n\
         a=rtpmap:96 raw/90000\r\n\
         {VIDEO_FMTP}\r\n\
         a=mediaclk:direct=0\r\n\
         a=mid:primary\r\n"
    )
}

/// The video document with a second stream, starting at line 13, that has no
/// connection data of its own.
fn two_streams() -> String {
    format!(
        "{}m=video 5002 RTP/AVP 96\r\n\
         a=rtpmap:96 raw/90000\r\n\
         {VIDEO_FMTP}\r\n\
         a=mediaclk:direct=0\r\n\
         a=mid:secondary\r\n",
        video()
    )
}

fn with_fmtp(fmtp: &str) -> String {
    video().replace(VIDEO_FMTP, fmtp)
}

const AUDIO: &str = "v=0\r\n\
     o=- 1443716955 1443716955 IN IP4 192.168.1.230\r\n\
     s=Audio 1\r\n\
     t=0 0\r\n\
     m=audio 5004 RTP/AVP 97\r\n\
     c=IN IP4 239.100.9.11/32\r\n\
     a=rtpmap:97 L24/48000/2\r\n\
     a=fmtp:97 channel-order=SMPTE2110.(ST); \r\n\
     a=ptime:1\r\n\
     a=ts-refclk:ptp=IEEE1588-2008:traceable\r\n\
     a=mediaclk:direct=0\r\n";

const NO_MEDIA: &str = "v=0\r\no=- 1 1 IN IP4 192.0.2.1\r\ns=x\r\nt=0 0\r\n";

fn run(id: &str, sdp: &str, config: &Config) -> Result<Vec<Diagnostic>> {
    let document = Document::new(sdp)?;
    Ok(rule(id, &document, config).expect("rule is registered"))
}

fn strict_config() -> Config {
    Config {
        should: true,
        check_endings: true,
        whitespace: true,
        address_family: AddressFamily::Ip4,
        cast: CastMode::Multicast,
        channel_order: true,
        shaping: true,
        ..Default::default()
    }
}

#[test]
fn test_conforming_documents() -> Result<()> {
    let connected = two_streams().replace(
        "m=video 5002 RTP/AVP 96\r\n",
        "m=video 5002 RTP/AVP 96\r\nc=IN IP4 239.100.9.20/32\r\n",
    );
    for sdp in [video(), connected, AUDIO.to_owned()] {
        let document = Document::new(sdp)?;
        for config in [Config::default(), strict_config()] {
            let errors = all_sections(&document, &config);
            assert!(errors.is_empty(), "{errors:#?}");
        }
    }
    Ok(())
}

#[test]
fn test_catalog() {
    let mut ids = HashSet::new();
    for r in RULES {
        assert!(ids.insert(r.id), "rule id {} is registered twice", r.id);
        assert!(SECTIONS.contains(&r.section), "{r:?}");
        assert!(find(r.id).is_some());
    }
    assert!(find("no-such-rule").is_none());
    assert_eq!(Section::Rfc4566Connection.to_string(), "RFC 4566 Section 5.7");
}

#[test]
fn test_all_sections_stamps_rule_ids() -> Result<()> {
    let document = Document::new(video().replace("t=0 0\r\n", ""))?;
    let errors = all_sections(&document, &Config::default());

    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| !e.rule.is_empty()));
    let mandatory: Vec<_> = errors.iter().filter(|e| e.rule == "4566-5-mandatory").collect();
    assert_eq!(mandatory.len(), 1);
    assert_eq!(mandatory[0].line, None);
    assert!(mandatory[0].message.contains("'t'"));
    Ok(())
}

#[test]
fn test_all_sections_is_deterministic() -> Result<()> {
    let document = Document::new(two_streams().replace("raw/90000", "raw/9000"))?;
    let config = strict_config();
    assert_eq!(all_sections(&document, &config), all_sections(&document, &config));
    Ok(())
}

#[test]
fn test_section() -> Result<()> {
    let document = Document::new(two_streams())?;
    let errors = section(Section::Rfc4566Connection, &document, &Config::default());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule, "4566-5.7-presence");

    assert!(section(Section::St2110Audio, &document, &Config::default()).is_empty());
    Ok(())
}

#[test]
fn test_line_endings() -> Result<()> {
    let sdp = video().replace("\r\n", "\n");
    let config = Config {
        check_endings: true,
        ..Default::default()
    };
    assert_eq!(run("4566-5-endings", &sdp, &config)?.len(), 1);
    assert!(run("4566-5-endings", &sdp, &Config::default())?.is_empty());
    assert!(run("4566-5-endings", &video(), &config)?.is_empty());
    Ok(())
}

#[test]
fn test_line_shape_and_letters() -> Result<()> {
    let sdp = video().replace("t=0 0\r\n", "t=0 0\r\n\r\n");
    let errors = run("4566-5-shape", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(5));
    assert!(errors[0].message.contains("Blank"));

    let sdp = video().replace("s=Camera 1", "s = Camera 1");
    let errors = run("4566-5-shape", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(3));

    let sdp = video().replace("s=Camera 1\r\n", "s=Camera 1\r\nx=unknown\r\n");
    let errors = run("4566-5-letter", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(4));
    assert!(errors[0].message.contains("'x'"));
    Ok(())
}

#[test]
fn test_order_does_not_cascade() -> Result<()> {
    let sdp = video().replace(
        "c=IN IP4 239.100.9.10/32\r\na=source-filter: incl IN IP4 239.100.9.10 192.168.1.230\r\n",
        "a=source-filter: incl IN IP4 239.100.9.10 192.168.1.230\r\nc=IN IP4 239.100.9.10/32\r\n",
    );
    let errors = run("4566-5-order", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(8));
    assert!(errors[0].message.contains("'a' cannot be followed by type 'c'"));
    Ok(())
}

#[test]
fn test_nul_and_version() -> Result<()> {
    let sdp = video().replace("s=Camera 1", "s=Camera\u{0}1");
    let errors = run("4566-5-nul", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(3));

    let sdp = video().replacen("v=0", "v=1", 1);
    let errors = run("4566-5.1-version", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(1));
    Ok(())
}

#[test]
fn test_origin() -> Result<()> {
    let sdp = video().replace("IN IP4 192.168.1.230\r\n", "IN IP4 239.1.2.3\r\n");
    let errors = run("4566-5.2-origin", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("multicast"));

    let sdp = video().replace("o=- 1443716955", "o=- session");
    assert_eq!(run("4566-5.2-origin", &sdp, &Config::default())?.len(), 1);

    let config = Config {
        address_family: AddressFamily::Ip6,
        ..Default::default()
    };
    let errors = run("4566-5.2-origin", &video(), &config)?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("'IP4'"));
    assert_eq!(run("4566-5.2-address", &video(), &config)?.len(), 1);
    assert!(run("4566-5.2-address", &video(), &Config::default())?.is_empty());
    Ok(())
}

#[test]
fn test_connection_presence() -> Result<()> {
    let errors = run("4566-5.7-presence", &two_streams(), &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(13));
    assert!(errors[0].message.contains("stream 2"));

    // a session-level connection covers every stream
    let sdp = two_streams().replace("t=0 0\r\n", "c=IN IP4 239.100.9.10/32\r\nt=0 0\r\n");
    assert!(run("4566-5.7-presence", &sdp, &Config::default())?.is_empty());

    let errors = run("4566-5.7-presence", NO_MEDIA, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(4));
    assert!(errors[0].message.contains("all streams"));
    Ok(())
}

#[test]
fn test_multicast_ttl() -> Result<()> {
    let sdp = video().replace("239.100.9.10/32", "239.100.9.10");
    let errors = run("4566-5.7-shape", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(7));
    assert!(errors[0].message.contains("TTL"));

    let sdp = video().replace("239.100.9.10/32", "239.100.9.10/300");
    let errors = run("4566-5.7-shape", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("0 to 255"));

    let sdp = video().replace("c=IN IP4 239.100.9.10/32", "c=IN IP4 192.0.2.9");
    assert!(run("4566-5.7-shape", &sdp, &Config::default())?.is_empty());

    let sdp = video().replace("c=IN IP4 239.100.9.10/32", "c=IP4 239.100.9.10/32");
    assert_eq!(run("4566-5.7-shape", &sdp, &Config::default())?.len(), 1);
    Ok(())
}

#[test]
fn test_connection_cast() -> Result<()> {
    let sdp = video().replace("c=IN IP4 239.100.9.10/32", "c=IN IP4 192.0.2.9");
    let config = Config {
        cast: CastMode::Multicast,
        ..Default::default()
    };
    let errors = run("4566-5.7-cast", &sdp, &config)?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("unicast"));

    let config = Config {
        cast: CastMode::Unicast,
        ..Default::default()
    };
    assert_eq!(run("4566-5.7-cast", &video(), &config)?.len(), 1);

    let config = Config {
        address_family: AddressFamily::Ip6,
        ..Default::default()
    };
    assert_eq!(run("4566-5.7-cast", &video(), &config)?.len(), 1);
    Ok(())
}

#[test]
fn test_media() -> Result<()> {
    let sdp = video().replace("m=video 5000 RTP/AVP 96", "m=video 5000 RTP/AVP");
    assert_eq!(run("4566-5.14-media", &sdp, &Config::default())?.len(), 1);

    let sdp = video().replace("m=video 5000 RTP/AVP 96", "m=vidoe 70000 RTP/AVP 96");
    assert_eq!(run("4566-5.14-media", &sdp, &Config::default())?.len(), 2);

    assert_eq!(run("4566-5.14-no-media", NO_MEDIA, &Config::default())?.len(), 1);
    let config = Config {
        no_media: false,
        ..Default::default()
    };
    assert!(run("4566-5.14-no-media", NO_MEDIA, &config)?.is_empty());

    let config = Config {
        media_kind: MediaKind::Audio,
        ..Default::default()
    };
    let errors = run("4566-5.14-kind", &video(), &config)?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(6));
    assert!(run("4566-5.14-kind", AUDIO, &config)?.is_empty());
    Ok(())
}

#[test]
fn test_attributes() -> Result<()> {
    let sdp = video().replace("a=rtpmap:96 raw/90000", "a=rtpmap:96 raw");
    let errors = run("4566-6-rtpmap", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(9));

    let sdp = with_fmtp("a=fmtp:96 width=1920; width=1920; height=1080");
    let errors = run("4566-6-fmtp", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("repeated"));

    let sdp = video().replace(
        "a=mediaclk:direct=0",
        &format!("{VIDEO_FMTP}\r\na=mediaclk:direct=0"),
    );
    let errors = run("4566-6-fmtp", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(11));

    let config = Config {
        whitespace: true,
        ..Default::default()
    };
    let sdp = with_fmtp(&format!("a=fmtp:96 {}", REQUIRED_PARAMS.trim_end()));
    assert_eq!(run("4566-6-fmtp", &sdp, &config)?.len(), 1);
    Ok(())
}

#[test]
fn test_source_filter() -> Result<()> {
    let sdp = video().replace("a=source-filter: incl", "a=source-filter:incl");
    assert_eq!(run("4570-3-shape", &sdp, &Config::default())?.len(), 1);

    let sdp = video().replace("incl IN IP4", "incl ATM IP4");
    assert_eq!(run("4570-3-shape", &sdp, &Config::default())?.len(), 1);

    let sdp = video().replace("incl IN IP4 239.100.9.10", "incl IN IP4 239.100.9.99");
    let errors = run("4570-3-dest", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(8));
    assert!(errors[0].message.contains("239.100.9.99"));

    // session-level filters see the connection data of every stream
    let sdp = video().replace(
        "t=0 0\r\n",
        "t=0 0\r\na=source-filter: incl IN IP4 239.100.9.10 192.168.1.230\r\n",
    );
    assert!(run("4570-3-dest", &sdp, &Config::default())?.is_empty());
    Ok(())
}

#[test]
fn test_duplication() -> Result<()> {
    let config = Config {
        duplicate: true,
        ..Default::default()
    };
    assert_eq!(run("7104-3-present", &video(), &config)?.len(), 1);
    assert!(run("7104-3-present", &video(), &Config::default())?.is_empty());

    let grouped = |group: &str| {
        two_streams().replace("t=0 0\r\n", &format!("t=0 0\r\na={group}\r\n"))
    };

    let sdp = grouped("group:DUP primary secondary");
    assert!(run("7104-3-present", &sdp, &config)?.is_empty());
    assert!(run("7104-3-refs", &sdp, &config)?.is_empty());

    let errors = run("7104-3-refs", &grouped("group:DUP primary tertiary"), &config)?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(5));
    assert!(errors[0].message.contains("'tertiary'"));

    let errors = run("7104-3-refs", &grouped("group:DUP primary"), &config)?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("at least two"));

    let sdp = video().replace(
        "a=mid:primary\r\n",
        "a=mid:primary\r\na=ssrc:1111 cname:camera\r\na=ssrc-group:DUP 1111 2222\r\n",
    );
    assert!(run("7104-3-present", &sdp, &config)?.is_empty());
    let errors = run("7104-3-refs", &sdp, &config)?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("'2222'"));
    Ok(())
}

#[test]
fn test_unique_mids() -> Result<()> {
    assert!(run("5888-4-unique", &two_streams(), &Config::default())?.is_empty());

    let sdp = two_streams().replace("a=mid:secondary", "a=mid:primary");
    let errors = run("5888-4-unique", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(17));
    assert!(errors[0].message.contains("stream 2"));
    Ok(())
}

#[test]
fn test_media_clock() -> Result<()> {
    let sdp = two_streams().replace("a=mediaclk:direct=0\r\na=mid:secondary", "a=mid:secondary");
    let errors = run("2110-10-8.1-mediaclk", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(13));

    let should = Config {
        should: true,
        ..Default::default()
    };
    let sdp = video().replace("a=mediaclk:direct=0", "a=mediaclk:sender");
    assert!(run("2110-10-8.1-direct", &sdp, &Config::default())?.is_empty());
    let errors = run("2110-10-8.1-direct", &sdp, &should)?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("'direct'"));

    let sdp = video().replace("a=mediaclk:direct=0", "a=mediaclk:direct=5");
    let errors = run("2110-10-8.1-direct", &sdp, &should)?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("offset"));
    Ok(())
}

#[test]
fn test_reference_clock() -> Result<()> {
    let refclk = "a=ts-refclk:ptp=IEEE1588-2008:08-00-11-FF-FE-22-39-E4:0";

    let sdp = video().replace(&format!("{refclk}\r\n"), "");
    let errors = run("2110-10-8.2-refclk", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(5));

    // media-level reference clocks satisfy the requirement too
    let sdp = sdp.replace("a=mediaclk:direct=0", &format!("{refclk}\r\na=mediaclk:direct=0"));
    assert!(run("2110-10-8.2-refclk", &sdp, &Config::default())?.is_empty());

    let sdp = video().replace("39-E4:0", "39-E4:200");
    let errors = run("2110-10-8.2-format", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("domain"));

    let sdp = video().replace("08-00-11-FF-FE-22-39-E4:0", "08-00");
    assert_eq!(run("2110-10-8.2-format", &sdp, &Config::default())?.len(), 1);

    let sdp = video().replace(refclk, "a=ts-refclk:localmac=CA-FE-01-CA-FE-02");
    assert!(run("2110-10-8.2-format", &sdp, &Config::default())?.is_empty());
    Ok(())
}

#[test]
fn test_video_rtpmap() -> Result<()> {
    let sdp = video().replace("raw/90000", "raw/9000");
    let errors = run("2110-20-7.1-rtpmap", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("clock rate"));

    let sdp = video().replace("a=rtpmap:96", "a=rtpmap:97");
    let errors = run("2110-20-7.1-rtpmap", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("does not match"));

    let sdp = video().replace("raw/90000", "smpte291/90000");
    assert!(run("2110-20-7.1-rtpmap", &sdp, &Config::default())?.is_empty());
    let config = Config {
        media_kind: MediaKind::Video,
        ..Default::default()
    };
    let errors = run("2110-20-7.1-rtpmap", &sdp, &config)?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("'smpte291'"));

    let sdp = video().replace("a=rtpmap:96 raw/90000\r\n", "");
    assert_eq!(run("2110-20-7.1-rtpmap", &sdp, &config)?.len(), 1);
    Ok(())
}

#[test]
fn test_video_fmtp() -> Result<()> {
    let sdp = video().replace(&format!("{VIDEO_FMTP}\r\n"), "");
    let errors = run("2110-20-7.1-fmtp", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(6));
    Ok(())
}

#[test]
fn test_required_parameters() -> Result<()> {
    let sdp = with_fmtp("a=fmtp:96 width=1920; height=1080; ");
    let errors = run("2110-20-7.2-required", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 6);
    for (e, key) in errors
        .iter()
        .zip(["sampling", "depth", "exactframerate", "colorimetry", "PM", "SSN"])
    {
        assert_eq!(e.line, Some(10));
        assert!(e.message.contains(&format!("'{key}'")), "{}", e.message);
    }
    Ok(())
}

#[test]
fn test_parameter_values() -> Result<()> {
    let sdp = with_fmtp("a=fmtp:96 sampling=YCbCr-4:2:2; width=0; height=1080; exactframerate=4/2; depth=9; colorimetry=BT709; PM=2110GPM; SSN=ST2110-20:2017; ");
    let errors = run("2110-20-7.2-values", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 3);
    assert!(errors[0].message.contains("'width'"));
    assert!(errors[1].message.contains("'depth'"));
    assert!(errors[2].message.contains("not reduced"));

    let sdp = with_fmtp("a=fmtp:96 sampling=YUV; width=1920; height=1080; exactframerate=25; depth=10; colorimetry=BT709; PM; SSN=ST2110-20:2017; ");
    let errors = run("2110-20-7.2-values", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 2);
    assert!(errors[0].message.contains("'YUV'"));
    assert!(errors[1].message.contains("must have a value"));
    Ok(())
}

#[test]
fn test_optional_parameters() -> Result<()> {
    let sdp = with_fmtp(&format!(
        "a=fmtp:96 {REQUIRED_PARAMS}segmented; MAXUDP=1500; PAR=16:12; TCS=SDR; "
    ));
    let errors = run("2110-20-7.3-optional", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 3);
    assert!(errors[0].message.contains("'segmented'"));
    assert!(errors[1].message.contains("'MAXUDP'"));
    assert!(errors[2].message.contains("lowest terms"));

    let sdp = with_fmtp(&format!("a=fmtp:96 {REQUIRED_PARAMS}interlace=1; RANGE=FULL; "));
    let errors = run("2110-20-7.3-optional", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("flag"));
    Ok(())
}

#[test]
fn test_traffic_shaping() -> Result<()> {
    let shaping = Config {
        shaping: true,
        ..Default::default()
    };
    let sdp = with_fmtp(&format!("a=fmtp:96 {REQUIRED_PARAMS}"));
    assert!(run("2110-21-8.1-tp", &sdp, &Config::default())?.is_empty());
    let errors = run("2110-21-8.1-tp", &sdp, &shaping)?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(10));

    let sdp = with_fmtp(&format!("a=fmtp:96 {REQUIRED_PARAMS}TP=2110TPX; "));
    let errors = run("2110-21-8.1-tp", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("'2110TPX'"));

    let sdp = with_fmtp(&format!("a=fmtp:96 {REQUIRED_PARAMS}CMAX=0; TROFF=x; "));
    assert_eq!(run("2110-21-8.2-numbers", &sdp, &Config::default())?.len(), 2);
    let sdp = with_fmtp(&format!("a=fmtp:96 {REQUIRED_PARAMS}CMAX=4; TROFF=0; "));
    assert!(run("2110-21-8.2-numbers", &sdp, &Config::default())?.is_empty());
    Ok(())
}

#[test]
fn test_audio_rtpmap() -> Result<()> {
    let sdp = AUDIO.replace("L24/48000/2", "L24/32000/2");
    let errors = run("2110-30-6.1-rtpmap", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(7));
    assert!(errors[0].message.contains("32000"));

    let sdp = AUDIO.replace("a=rtpmap:97", "a=rtpmap:98");
    let errors = run("2110-30-6.1-rtpmap", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(7));
    assert!(errors[0].message.contains("'98'"));

    let sdp = AUDIO.replace("L24/48000/2", "L20/48000/2");
    let errors = run("2110-30-6.1-rtpmap", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(7));
    assert!(errors[0].message.contains("'L20'"));
    Ok(())
}

#[test]
fn test_packet_time() -> Result<()> {
    let should = Config {
        should: true,
        ..Default::default()
    };
    let sdp = AUDIO.replace("a=ptime:1\r\n", "");
    assert!(run("2110-30-6.2-ptime", &sdp, &Config::default())?.is_empty());
    assert_eq!(run("2110-30-6.2-ptime", &sdp, &should)?.len(), 1);

    let sdp = AUDIO.replace("a=ptime:1", "a=ptime:0.125");
    assert!(run("2110-30-6.2-ptime", &sdp, &should)?.is_empty());
    let sdp = AUDIO.replace("a=ptime:1", "a=ptime:fast");
    let errors = run("2110-30-6.2-ptime", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(9));
    Ok(())
}

#[test]
fn test_channel_order() -> Result<()> {
    let required = Config {
        channel_order: true,
        ..Default::default()
    };
    let sdp = AUDIO.replace("a=fmtp:97 channel-order=SMPTE2110.(ST); \r\n", "");
    assert!(run("2110-30-6.2.2-channel-order", &sdp, &Config::default())?.is_empty());
    assert_eq!(run("2110-30-6.2.2-channel-order", &sdp, &required)?.len(), 1);

    let sdp = AUDIO.replace("(ST)", "(XX)");
    let errors = run("2110-30-6.2.2-channel-order", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, Some(8));

    let sdp = AUDIO.replace("(ST)", "(51)");
    let errors = run("2110-30-6.2.2-channel-order", &sdp, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("6 channels"));

    let sdp = AUDIO.replace("(ST)", "(ST,U02)").replace("48000/2", "48000/4");
    assert!(run("2110-30-6.2.2-channel-order", &sdp, &required)?.is_empty());
    Ok(())
}

#[test]
fn test_channel_order_count() {
    let tests = vec![
        ("SMPTE2110.(M)", Some(1)),
        ("SMPTE2110.(ST,ST)", Some(4)),
        ("SMPTE2110.(51,ST,U10)", Some(18)),
        ("SMPTE2110.(222,SGRP)", Some(28)),
        ("SMPTE2110.()", None),
        ("SMPTE2110.(M,)", None),
        ("SMPTE2110.(U1)", None),
        ("AES3.(ST)", None),
    ];
    for (value, expected) in tests {
        assert_eq!(channel_order_count(value), expected, "{value}");
    }
}

#[test]
fn test_example_copy() -> Result<()> {
    let errors = run("copy-2110-20", ST_2110_20_EXAMPLE, &Config::default())?;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, None);

    let config = Config {
        no_copy: false,
        ..Default::default()
    };
    assert!(run("copy-2110-20", ST_2110_20_EXAMPLE, &config)?.is_empty());
    assert!(run("copy-2110-20", &video(), &Config::default())?.is_empty());
    Ok(())
}
