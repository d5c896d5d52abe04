// Copyright (c) 2024 Mike Tsao

use more_asserts::{assert_gt, assert_le};
use reelsynth::prelude::*;

// Renders a short cut of one of the built-in videos the way the command line
// does, then reads the WAV back to check its layout.
#[test]
fn render_builtin_video_to_wav() {
    let dir = tempfile::tempdir().unwrap();
    let settings = RenderSettings::load_from_json(&format!(
        r#"{{ "seed": 1234, "output-dir": {:?} }}"#,
        dir.path().to_string_lossy()
    ))
    .unwrap();

    let sheet = CueSheet::builtin();
    let video = sheet.find("08_calendar").unwrap();
    let mut renderer = settings.renderer();
    let signal = renderer.render(video, Some(Seconds(2.0)));
    assert_eq!(signal.len(), 88200);
    assert!(signal.is_audible(), "the opening impact should be audible");
    assert_le!(signal.peak(), 1.0);

    let path = settings.output_path_for(&video.name);
    assert_eq!(path, dir.path().join("08_calendar_bgm.wav"));
    settings.exporter().export_to_wav(&signal, &path).unwrap();

    let mut reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);

    let interleaved: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(interleaved.len(), 88200 * 2);
    let left: Vec<i16> = interleaved.iter().step_by(2).copied().collect();
    let right: Vec<i16> = interleaved.iter().skip(1).step_by(2).copied().collect();

    // 0.3 ms at 44.1 kHz is 13 frames.
    const DELAY: usize = 13;
    assert!(right[..DELAY].iter().all(|s| *s == 0));
    assert_eq!(&right[DELAY..], &left[..left.len() - DELAY]);
    assert!(left.iter().all(|s| s.unsigned_abs() <= 30000));
    assert_gt!(left.iter().map(|s| s.unsigned_abs()).max().unwrap(), 1000);
}

#[test]
fn seeded_renders_repeat() {
    let sheet = CueSheet::builtin();
    let video = sheet.find("05_winter").unwrap();

    let a = Renderer::new_with(SampleRate::DEFAULT, Some(7)).render(video, Some(Seconds(1.5)));
    let b = Renderer::new_with(SampleRate::DEFAULT, Some(7)).render(video, Some(Seconds(1.5)));
    assert_eq!(a.samples(), b.samples());

    let c = Renderer::new_with(SampleRate::DEFAULT, Some(8)).render(video, Some(Seconds(1.5)));
    assert_ne!(
        a.samples(),
        c.samples(),
        "a different seed should change the noise-based sounds"
    );
}

#[test]
fn every_builtin_style_renders() {
    let sheet = CueSheet::builtin();
    let mut renderer = Renderer::new_with(SampleRate(22050), Some(3));
    for video in sheet.videos.iter() {
        let signal = renderer.render(video, Some(Seconds(1.0)));
        assert_eq!(signal.len(), 22050, "{}", video.name);
        assert!(signal.is_audible(), "{} was silent", video.name);
        assert!(
            signal.samples().iter().all(|s| s.0.is_finite() && s.0.abs() <= 1.0),
            "{} escaped the clip range",
            video.name
        );
    }
}
