// Copyright (c) 2024 Mike Tsao

//! Pitches of the C-major scale and the triads built on them. The values are
//! the usual equal-temperament frequencies rounded to two decimal places.

use super::FrequencyHz;

#[allow(missing_docs)]
pub mod pitch {
    use super::FrequencyHz;

    pub const C3: FrequencyHz = FrequencyHz(130.81);
    pub const D3: FrequencyHz = FrequencyHz(146.83);
    pub const E3: FrequencyHz = FrequencyHz(164.81);
    pub const F3: FrequencyHz = FrequencyHz(174.61);
    pub const G3: FrequencyHz = FrequencyHz(196.00);
    pub const A3: FrequencyHz = FrequencyHz(220.00);
    pub const B3: FrequencyHz = FrequencyHz(246.94);
    pub const C4: FrequencyHz = FrequencyHz(261.63);
    pub const D4: FrequencyHz = FrequencyHz(293.66);
    pub const E4: FrequencyHz = FrequencyHz(329.63);
    pub const F4: FrequencyHz = FrequencyHz(349.23);
    pub const G4: FrequencyHz = FrequencyHz(392.00);
    pub const A4: FrequencyHz = FrequencyHz(440.00);
    pub const B4: FrequencyHz = FrequencyHz(493.88);
    pub const C5: FrequencyHz = FrequencyHz(523.25);
    pub const D5: FrequencyHz = FrequencyHz(587.33);
    pub const E5: FrequencyHz = FrequencyHz(659.25);
}

/// Three-note chords, root position.
pub mod chord {
    use super::{pitch::*, FrequencyHz};

    /// A triad.
    pub type Triad = [FrequencyHz; 3];

    /// C major
    pub const C: Triad = [C3, E3, G3];
    /// G major
    pub const G: Triad = [G3, B3, D4];
    /// A minor
    pub const AM: Triad = [A3, C4, E4];
    /// F major
    pub const F: Triad = [F3, A3, C4];
    /// D minor
    pub const DM: Triad = [D3, F3, A3];
    /// E minor
    pub const EM: Triad = [E3, G3, B3];
}

#[cfg(test)]
mod tests {
    use super::{chord, pitch};

    #[test]
    fn octaves_roughly_double() {
        let ratio = pitch::C4.0 / pitch::C3.0;
        assert!((ratio - 2.0).abs() < 0.001);
        let ratio = pitch::A4.0 / pitch::A3.0;
        assert_eq!(ratio, 2.0);
    }

    #[test]
    fn triads_are_ascending() {
        for triad in [chord::C, chord::G, chord::AM, chord::F, chord::DM, chord::EM] {
            assert!(triad[0] < triad[1] && triad[1] < triad[2], "{triad:?}");
        }
    }
}
