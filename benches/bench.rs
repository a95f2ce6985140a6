use criterion::measurement::WallTime;
use criterion::{criterion_main, BenchmarkGroup, Criterion};
use sdpoker::rules::{all_sections, st2110_20::ST_2110_20_EXAMPLE};
use sdpoker::{Config, Document};

const AUDIO_SDP: &str = "v=0\r\n\
o=- 1443716955 1443716955 IN IP4 192.168.1.230\r\n\
s=Audio 1\r\n\
t=0 0\r\n\
m=audio 5004 RTP/AVP 97\r\n\
c=IN IP4 239.100.9.11/32\r\n\
a=rtpmap:97 L24/48000/8\r\n\
a=fmtp:97 channel-order=SMPTE2110.(51,ST); \r\n\
a=ptime:0.125\r\n\
a=ts-refclk:ptp=IEEE1588-2008:traceable\r\n\
a=mediaclk:direct=0\r\n";

fn benchmark_check(g: &mut BenchmarkGroup<WallTime>) {
    let config = Config {
        should: true,
        whitespace: true,
        check_endings: true,
        ..Default::default()
    };

    // BenchmarkClassify
    g.bench_function("Classify", |b| {
        b.iter(|| {
            let _ = Document::new(ST_2110_20_EXAMPLE).unwrap();
        })
    });

    // BenchmarkVideo
    let video = Document::new(ST_2110_20_EXAMPLE).unwrap();
    g.bench_function("Video", |b| {
        b.iter(|| {
            let _ = all_sections(&video, &config);
        })
    });

    // BenchmarkAudio
    let audio = Document::new(AUDIO_SDP).unwrap();
    g.bench_function("Audio", |b| {
        b.iter(|| {
            let _ = all_sections(&audio, &config);
        })
    });
}

fn benches() {
    let mut c = Criterion::default().configure_from_args();
    let mut g = c.benchmark_group("Check");

    benchmark_check(&mut g);

    g.finish();
}

criterion_main!(benches);
