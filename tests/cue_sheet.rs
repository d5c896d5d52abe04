// Copyright (c) 2024 Mike Tsao

use reelsynth::{motion::MotionTrack, orchestration::CueSheetError, prelude::*};
use std::path::Path;

const SHEET: &str = r#"{
  "videos": [
    {
      "name": "promo",
      "duration": 6.0,
      "style": "chill",
      "sfx": [
        { "at": 0.0, "kind": "impact" },
        { "at": 1.5, "kind": "whoosh", "direction": "down" },
        { "at": 3.0, "kind": "rise", "duration": 1.5 },
        { "at": 4.5, "kind": "ding" }
      ],
      "flashes": [0.0, 4.5],
      "shakes": [1.5]
    },
    {
      "name": "teaser",
      "duration": 3.0,
      "style": "hype",
      "tempo": 150.0,
      "shake-power": 10.0
    }
  ]
}"#;

fn write_sheet(dir: &Path, json: &str) -> std::path::PathBuf {
    let path = dir.join("cues.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn load_cue_sheet_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = CueSheet::load(&write_sheet(dir.path(), SHEET)).unwrap();
    assert_eq!(sheet.videos.len(), 2);

    let promo = sheet.find("promo").unwrap();
    assert_eq!(promo.duration, Seconds(6.0));
    assert_eq!(promo.effective_tempo(), promo.style.default_tempo());
    assert_eq!(promo.sfx.len(), 4);
    assert_eq!(promo.shake_power, VideoCue::DEFAULT_SHAKE_POWER);

    let teaser = sheet.find("teaser").unwrap();
    assert_eq!(teaser.effective_tempo(), Tempo(150.0));
    assert!(teaser.sfx.is_empty());

    assert_eq!(
        sheet.find("missing"),
        Err(CueSheetError::UnknownVideo("missing".to_string()))
    );

    // The file should survive a save in our own format.
    let reloaded = CueSheet::load_from_json(&sheet.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, sheet);
}

#[test]
fn bad_cue_sheets_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    assert!(CueSheet::load(&dir.path().join("nope.json")).is_err());

    let duplicate = r#"{ "videos": [
        { "name": "a", "duration": 1.0 },
        { "name": "a", "duration": 2.0 } ] }"#;
    assert!(CueSheet::load(&write_sheet(dir.path(), duplicate)).is_err());

    let negative = r#"{ "videos": [ { "name": "a", "duration": -1.0 } ] }"#;
    assert!(CueSheet::load_from_json(negative).is_err());

    let unknown_sound = r#"{ "videos": [
        { "name": "a", "duration": 1.0, "sfx": [ { "at": 0.0, "kind": "kazoo" } ] } ] }"#;
    assert!(CueSheet::load_from_json(unknown_sound).is_err());
}

#[test]
fn loaded_sheet_drives_render_and_motion() {
    let sheet = CueSheet::load_from_json(SHEET).unwrap();
    let promo = sheet.find("promo").unwrap();

    let signal = Renderer::new_with(SampleRate(22050), Some(11)).render(promo, None);
    assert_eq!(signal.len(), 6 * 22050);
    assert!(signal.is_audible());

    let track = MotionTrack::for_video(promo, 30.0).unwrap();
    assert_eq!(track.frames.len(), 180);
    assert_eq!(track.frames[0].flash, 0.85);
    assert_eq!(track.frames[135].flash, 0.85);
    assert_eq!(track.frames[45].flash, 0.0);
    assert!(track.frames[46].shake_x != 0 || track.frames[46].shake_y != 0);
    assert_eq!((track.frames[100].shake_x, track.frames[100].shake_y), (0, 0));
}
