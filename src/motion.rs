// Copyright (c) 2024 Mike Tsao

//! Timing for the frame effects that accompany the soundtrack: white flashes
//! and screen shakes on cue, plus the easing curves used to animate text.
//! Nothing here draws; an external renderer consumes the numbers.

use crate::{orchestration::VideoCue, prelude::*};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How long a flash takes to fade out.
pub const FLASH_DURATION: Seconds = Seconds(0.08);
/// How far toward white a flash goes at its peak.
pub const FLASH_BLEND: f64 = 0.85;
/// How long a shake takes to settle.
pub const SHAKE_DECAY: Seconds = Seconds(0.15);
/// The highest frame rate we'll compute a track for.
pub const MAX_FPS: f64 = 240.0;

/// Checks that `fps` is a usable frame rate.
pub fn validate_fps(fps: f64) -> anyhow::Result<()> {
    if fps.is_finite() && fps > 0.0 && fps <= MAX_FPS {
        Ok(())
    } else {
        Err(anyhow::anyhow!("fps {fps} must be in (0, {MAX_FPS}]"))
    }
}

/// Cubic ease-out. The input is clamped to [0, 1].
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Ease-out that overshoots before settling.
pub fn ease_back(t: f64) -> f64 {
    const C: f64 = 2.5;
    let t = t.clamp(0.0, 1.0);
    1.0 + (C + 1.0) * (t - 1.0).powi(3) + C * (t - 1.0).powi(2)
}

/// A springy ease-out that rings around 1.0. Exactly 0 and 1 at the ends.
pub fn ease_elastic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        return t;
    }
    2.0f64.powf(-13.0 * t) * ((t * 10.0 - 0.75) * 2.094).sin() + 1.0
}

#[allow(missing_docs)]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// The strongest flash active at time `t`, from 1.0 at a trigger fading
/// linearly to 0.0 after `duration`.
pub fn flash_intensity(t: Seconds, triggers: &[Seconds], duration: Seconds) -> f64 {
    triggers
        .iter()
        .map(|trigger| (t - *trigger).0)
        .filter(|dt| (0.0..duration.0).contains(dt))
        .fold(0.0, |intensity, dt| intensity.max(1.0 - dt / duration.0))
}

/// The frame's pixel displacement at time `t`. Overlapping shakes add up.
pub fn shake_offset(t: Seconds, triggers: &[Seconds], power: f64, decay: Seconds) -> (i32, i32) {
    triggers
        .iter()
        .map(|trigger| (t - *trigger).0)
        .filter(|dt| (0.0..decay.0).contains(dt))
        .fold((0, 0), |(dx, dy), dt| {
            let s = power * (1.0 - dt / decay.0);
            (
                dx + (s * (dt * 80.0).sin()) as i32,
                dy + (s * (dt * 65.0).cos()) as i32,
            )
        })
}

/// The effects on one video frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MotionFrame {
    #[allow(missing_docs)]
    pub index: usize,
    #[allow(missing_docs)]
    pub time: Seconds,
    /// How far to blend the frame toward white, 0.0 to [FLASH_BLEND].
    pub flash: f64,
    #[allow(missing_docs)]
    pub shake_x: i32,
    #[allow(missing_docs)]
    pub shake_y: i32,
}

/// Per-frame flash and shake values for a whole video.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MotionTrack {
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub fps: f64,
    #[allow(missing_docs)]
    pub frames: Vec<MotionFrame>,
}
impl MotionTrack {
    /// Computes every frame of the video at `fps`.
    pub fn for_video(cue: &VideoCue, fps: f64) -> anyhow::Result<Self> {
        validate_fps(fps)?;
        let frame_count = (cue.duration.0 * fps).floor();
        let frame_count = if frame_count.is_finite() && frame_count > 0.0 {
            frame_count as usize
        } else {
            0
        };
        let frames = (0..frame_count)
            .map(|index| {
                let time = Seconds(index as f64 / fps);
                let (shake_x, shake_y) =
                    shake_offset(time, &cue.shakes, cue.shake_power, SHAKE_DECAY);
                MotionFrame {
                    index,
                    time,
                    flash: FLASH_BLEND * flash_intensity(time, &cue.flashes, FLASH_DURATION),
                    shake_x,
                    shake_y,
                }
            })
            .collect();
        Ok(Self {
            name: cue.name.clone(),
            fps,
            frames,
        })
    }

    /// Frames with a flash or a shake.
    pub fn active_frames(&self) -> impl Iterator<Item = &MotionFrame> {
        self.frames
            .iter()
            .filter(|f| f.flash > 0.0 || f.shake_x != 0 || f.shake_y != 0)
    }

    #[allow(missing_docs)]
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the track as JSON.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)
            .map_err(|e| anyhow::format_err!("Unable to write {path:?}: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::CueSheet;
    use float_cmp::approx_eq;
    use more_asserts::{assert_gt, assert_lt};

    #[test]
    fn easing_endpoints() {
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        assert_eq!(ease_out(2.0), 1.0);
        assert_eq!(ease_out(-1.0), 0.0);
        assert!(approx_eq!(f64, ease_out(0.5), 0.875));

        assert_eq!(ease_back(0.0), 0.0);
        assert_eq!(ease_back(1.0), 1.0);
        assert_gt!(ease_back(0.8), 1.0, "should overshoot");

        assert_eq!(ease_elastic(0.0), 0.0);
        assert_eq!(ease_elastic(1.0), 1.0);
        assert_eq!(ease_elastic(5.0), 1.0);

        assert_eq!(lerp(10.0, 20.0, 0.25), 12.5);
    }

    #[test]
    fn flash_fades() {
        let triggers = [Seconds(1.0), Seconds(3.0)];
        assert_eq!(flash_intensity(Seconds(0.99), &triggers, FLASH_DURATION), 0.0);
        assert_eq!(flash_intensity(Seconds(1.0), &triggers, FLASH_DURATION), 1.0);
        assert!(approx_eq!(
            f64,
            flash_intensity(Seconds(1.04), &triggers, FLASH_DURATION),
            0.5,
            epsilon = 1e-9
        ));
        assert_eq!(flash_intensity(Seconds(1.08), &triggers, FLASH_DURATION), 0.0);
        assert_eq!(flash_intensity(Seconds(3.0), &triggers, FLASH_DURATION), 1.0);
        assert_eq!(flash_intensity(Seconds(3.0), &[], FLASH_DURATION), 0.0);
    }

    #[test]
    fn overlapping_flashes_take_the_max() {
        let triggers = [Seconds(1.0), Seconds(1.04)];
        assert_eq!(flash_intensity(Seconds(1.04), &triggers, FLASH_DURATION), 1.0);
    }

    #[test]
    fn shake_truncates_and_sums() {
        let triggers = [Seconds(0.0)];
        assert_eq!(shake_offset(Seconds(0.0), &triggers, 18.0, SHAKE_DECAY), (0, 18));
        let dt: f64 = 0.05;
        let s = 18.0 * (1.0 - dt / 0.15);
        let expected = (
            (s * (dt * 80.0).sin()) as i32,
            (s * (dt * 65.0).cos()) as i32,
        );
        assert_eq!(shake_offset(Seconds(dt), &triggers, 18.0, SHAKE_DECAY), expected);
        assert_eq!(shake_offset(Seconds(0.15), &triggers, 18.0, SHAKE_DECAY), (0, 0));

        let doubled = shake_offset(Seconds(0.0), &[Seconds(0.0), Seconds(0.0)], 18.0, SHAKE_DECAY);
        assert_eq!(doubled, (0, 36));
    }

    #[test]
    fn motion_track_for_builtin_video() {
        let sheet = CueSheet::builtin();
        let cue = sheet.find("03_5000yen").unwrap();
        let track = MotionTrack::for_video(cue, 30.0).unwrap();
        assert_eq!(track.frames.len(), 450);
        assert_eq!(track.frames[0].flash, FLASH_BLEND);
        assert_eq!(track.frames[30].time, Seconds(1.0));
        assert_eq!(track.frames[30].shake_y, 22, "power 22 at the trigger");
        assert_eq!(track.frames[3].flash, 0.0);

        let quiet = MotionTrack::for_video(sheet.find("08_calendar").unwrap(), 30.0).unwrap();
        assert_eq!(quiet.active_frames().count(), 0);
        assert_lt!(0, track.active_frames().count());
    }

    #[test]
    fn motion_track_json() {
        let sheet = CueSheet::builtin();
        let track = MotionTrack::for_video(sheet.find("04_best_time").unwrap(), 24.0).unwrap();
        assert_eq!(track.frames.len(), 432);
        let json = track.to_json().unwrap();
        assert!(json.contains("\"shake-x\""));
        let back: MotionTrack = serde_json::from_str(&json).unwrap();
        assert_eq!(back, track);

        // Frame times survive the trip to the renderer bit for bit.
        assert_eq!(back.frames[5].time, Seconds(5.0 / 24.0));
        assert_eq!(back.frames[5].time.0.to_bits(), (5.0f64 / 24.0).to_bits());
    }

    #[test]
    fn frame_rate_is_bounded() {
        let sheet = CueSheet::builtin();
        let cue = sheet.find("04_best_time").unwrap();
        assert!(MotionTrack::for_video(cue, 1e12).is_err());
        assert!(MotionTrack::for_video(cue, 0.0).is_err());
        assert!(MotionTrack::for_video(cue, f64::NAN).is_err());
        assert!(MotionTrack::for_video(cue, MAX_FPS).is_ok());
        assert!(validate_fps(MAX_FPS + 1.0).is_err());
    }
}
