use sdpoker::config::{AddressFamily, CastMode};
use sdpoker::rules::st2110_20::ST_2110_20_EXAMPLE;
use sdpoker::{check, Config, Error, Result};

const CAMERA: &str = "v=0\r\n\
o=- 1443716955 1443716955 IN IP4 192.168.1.230\r\n\
s=Camera 1\r\n\
t=0 0\r\n\
a=ts-refclk:ptp=IEEE1588-2008:08-00-11-FF-FE-22-39-E4:0\r\n\
m=video 5000 RTP/AVP 96\r\n\
c=IN IP4 239.100.9.10/32\r\n\
a=rtpmap:96 raw/90000\r\n\
a=fmtp:96 sampling=YCbCr-4:2:2; width=1920; height=1080; exactframerate=25; depth=10; colorimetry=BT709; PM=2110GPM; SSN=ST2110-20:2017; \r\n\
a=mediaclk:direct=0\r\n";

#[test]
fn test_conforming_camera() -> Result<()> {
    let config = Config {
        address_family: AddressFamily::Ip4,
        cast: CastMode::Multicast,
        ..Default::default()
    };
    assert_eq!(check(CAMERA, &config)?, vec![]);
    Ok(())
}

#[test]
fn test_findings_carry_line_and_rule() -> Result<()> {
    let sdp = CAMERA.replace("239.100.9.10/32", "239.100.9.10");
    let errors = check(&sdp, &Config::default())?;

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule, "4566-5.7-shape");
    assert_eq!(errors[0].line, Some(7));
    assert!(errors[0].to_string().starts_with("Line 7: "));
    Ok(())
}

#[test]
fn test_example_is_flagged() -> Result<()> {
    let errors = check(ST_2110_20_EXAMPLE, &Config::default())?;
    assert!(errors.iter().any(|e| e.rule == "copy-2110-20"));

    let config = Config {
        no_copy: false,
        ..Default::default()
    };
    assert!(check(ST_2110_20_EXAMPLE, &config)?
        .iter()
        .all(|e| e.rule != "copy-2110-20"));
    Ok(())
}

#[test]
fn test_empty_input_is_fatal() {
    assert!(matches!(check("", &Config::default()), Err(Error::EmptyDocument)));
}
