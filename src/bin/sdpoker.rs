use std::fs::{self, File};
use std::io::Write;

use anyhow::Result;
use clap::{AppSettings, Arg, ArgMatches, Command};
use sdpoker::config::{AddressFamily, CastMode, MediaKind};
use sdpoker::rules::all_sections;
use sdpoker::{Config, Document};

fn flag(name: &'static str, help: &'static str) -> Arg<'static> {
    Arg::new(name).long(name).help(help)
}

fn toggle(name: &'static str, help: &'static str) -> Arg<'static> {
    Arg::new(name)
        .long(name)
        .takes_value(true)
        .value_name("bool")
        .possible_values(["true", "false"])
        .default_value("true")
        .help(help)
}

/// Resolves the run configuration: the JSON file when given, with command
/// line flags switched on over it.
fn load_config(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::from_json(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    config.should |= matches.is_present("should");
    config.check_endings |= matches.is_present("checkEndings");
    config.whitespace |= matches.is_present("whitespace");
    config.duplicate |= matches.is_present("duplicate");
    config.channel_order |= matches.is_present("channelOrder");
    config.shaping |= matches.is_present("shaping");

    if matches.is_present("ip4") {
        config.address_family = AddressFamily::Ip4;
    } else if matches.is_present("ip6") {
        config.address_family = AddressFamily::Ip6;
    }
    if matches.is_present("multicast") {
        config.cast = CastMode::Multicast;
    } else if matches.is_present("unicast") {
        config.cast = CastMode::Unicast;
    }
    if matches.is_present("videoOnly") {
        config.media_kind = MediaKind::Video;
    } else if matches.is_present("audioOnly") {
        config.media_kind = MediaKind::Audio;
    }

    if matches.occurrences_of("noCopy") > 0 {
        config.no_copy = matches.value_of("noCopy") == Some("true");
    }
    if matches.occurrences_of("noMedia") > 0 {
        config.no_media = matches.value_of("noMedia") == Some("true");
    }

    Ok(config)
}

/// Returns true when the document has at least one finding.
fn run(matches: &ArgMatches) -> Result<bool> {
    let config = load_config(matches)?;
    log::debug!("config: {:?}", config);

    let path = matches.value_of("file").unwrap_or_default();
    let mut file = File::open(path)?;
    let document = Document::from_reader(&mut file)?;

    let errors = all_sections(&document, &config);
    for e in &errors {
        log::debug!("{}: {}", e.rule, e);
        eprintln!("{e}");
    }
    Ok(!errors.is_empty())
}

fn main() {
    let app = Command::new("sdpoker")
        .version("0.1.0")
        .author("The sdpoker Developers")
        .about("Checks an SDP file for conformance with RFC 4566 and SMPTE ST 2110.")
        .setting(AppSettings::DeriveDisplayOrder)
        .arg(
            Arg::new("file")
                .required(true)
                .index(1)
                .help("SDP file to check."),
        )
        .arg(flag("should", "Check \"should\" clauses as well as \"shall\" clauses."))
        .arg(flag(
            "checkEndings",
            "Report line endings other than CRLF.",
        ))
        .arg(flag(
            "whitespace",
            "Require format parameters to be separated by exactly '; '.",
        ))
        .arg(flag("ip4", "All addresses must be IPv4.").conflicts_with("ip6"))
        .arg(flag("ip6", "All addresses must be IPv6."))
        .arg(flag("multicast", "Connection addresses must be multicast.").conflicts_with("unicast"))
        .arg(flag("unicast", "Connection addresses must be unicast."))
        .arg(flag("duplicate", "Streams must be duplicated with RFC 7104 grouping."))
        .arg(flag("videoOnly", "Every stream must be video.").conflicts_with("audioOnly"))
        .arg(flag("audioOnly", "Every stream must be audio."))
        .arg(flag(
            "channelOrder",
            "Audio streams must signal their channel order.",
        ))
        .arg(flag(
            "shaping",
            "Video streams must signal their traffic shaping parameters.",
        ))
        .arg(toggle("noCopy", "Reject copies of the SMPTE ST 2110-20 example."))
        .arg(toggle("noMedia", "Reject files without any media descriptions."))
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .value_name("json")
                .help("JSON file with the configuration; flags are applied on top."),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .short('d')
                .help("Prints debug log information"),
        );

    let matches = app.get_matches();

    if matches.is_present("debug") {
        env_logger::Builder::new()
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{}:{} [{}] {} - {}",
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.level(),
                    chrono::Local::now().format("%H:%M:%S.%6f"),
                    record.args()
                )
            })
            .filter(None, log::LevelFilter::Trace)
            .init();
    }

    let code = match run(&matches) {
        Ok(true) => 1,
        Ok(false) => 0,
        Err(err) => {
            eprintln!("Error: {err}");
            2
        }
    };
    std::process::exit(code);
}
