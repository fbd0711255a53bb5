//! Voice model parameters and the per-stream decoder state.

use std::f32::consts::PI;

use crate::consts::{MAX_HARMONICS, MIN_HARMONICS};

/// Fundamental frequency and harmonic count derived from a pitch index.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BaseParams {
    /// w_0
    pub fundamental: f32,
    /// L
    pub harmonics: usize,
}

impl BaseParams {
    /// Create a new `BaseParams` from the given 7-bit pitch index, b<sub>0</sub>.
    ///
    /// The index must not be one of the reserved erasure/silence values.
    pub fn new(pitch: u8) -> BaseParams {
        let f = (-4.311767578125 - 0.021336 * (pitch as f32 + 0.5)).exp2();
        let w = 2.0 * PI * f;
        let h = (0.9254 * (PI / w + 0.25).floor()) as usize;

        BaseParams {
            fundamental: w,
            harmonics: h.max(MIN_HARMONICS).min(MAX_HARMONICS),
        }
    }
}

/// One set of voice model parameters, describing a single 20ms segment.
///
/// Per-harmonic values are indexed from 1 through `MAX_HARMONICS`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSet {
    /// Fundamental frequency, ω<sub>0</sub>.
    pub fundamental: f32,
    /// Number of harmonics, L.
    pub harmonics: usize,
    /// Spectral amplitudes, M<sub>l</sub>.
    pub amps: [f32; MAX_HARMONICS],
    /// Base-2 log of the spectral amplitudes.
    pub log_amps: [f32; MAX_HARMONICS],
    /// Voiced/unvoiced decision for each harmonic.
    pub voiced: [bool; MAX_HARMONICS],
    /// Synthesis phase, φ<sub>l</sub>.
    pub phase: [f32; MAX_HARMONICS],
    /// Accumulated phase base, ψ<sub>l</sub>.
    pub phase_base: [f32; MAX_HARMONICS],
    /// Log2 gain tracking term, γ.
    pub gamma: f32,
    /// Number of unvoiced harmonics in the frame.
    pub unvoiced: usize,
    /// Number of consecutive frames repeated from history.
    pub repeat: usize,
}

impl ParamSet {
    pub fn amp(&self, l: usize) -> f32 { self.amps[l - 1] }
    pub fn is_voiced(&self, l: usize) -> bool { self.voiced[l - 1] }
    pub fn phase(&self, l: usize) -> f32 { self.phase[l - 1] }
    pub fn phase_base(&self, l: usize) -> f32 { self.phase_base[l - 1] }

    /// Copy the spectral description of `other` into this set, keeping this set's
    /// phase history and repeat count.
    pub fn repeat_from(&mut self, other: &ParamSet) {
        self.fundamental = other.fundamental;
        self.harmonics = other.harmonics;
        self.amps = other.amps;
        self.log_amps = other.log_amps;
        self.voiced = other.voiced;
        self.gamma = other.gamma;
        self.unvoiced = other.unvoiced;
    }
}

impl Default for ParamSet {
    fn default() -> ParamSet {
        ParamSet {
            fundamental: 0.09378,
            harmonics: 30,
            amps: [0.0; MAX_HARMONICS],
            log_amps: [0.0; MAX_HARMONICS],
            voiced: [false; MAX_HARMONICS],
            phase: [0.0; MAX_HARMONICS],
            phase_base: [PI / 2.0; MAX_HARMONICS],
            gamma: 0.0,
            unvoiced: 0,
            repeat: 0,
        }
    }
}

/// Parameter history carried across the frames of one voice transmission.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecoderState {
    /// Parameters of the frame being decoded.
    pub current: ParamSet,
    /// Parameters of the previous frame, before enhancement.
    pub previous: ParamSet,
    /// Enhanced parameters of the previous frame, used as the synthesis start point.
    pub previous_enhanced: ParamSet,
}

impl DecoderState {
    /// Discard all history and return to the default parameters.
    pub fn reset(&mut self) {
        *self = DecoderState::default();
    }

    /// Whether all three parameter sets hold their default values.
    pub fn is_initial(&self) -> bool {
        let init = ParamSet::default();

        self.current == init && self.previous == init && self.previous_enhanced == init
    }
}
