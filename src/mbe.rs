//! Built-in AMBE 3600x2400 vocoder engine.
//!
//! Error correction follows the D-Star frame structure exactly, so the reported
//! error counts are real. The audio is only a rough approximation of the speech:
//! the vector-quantized spectral magnitude codebooks are not carried, the voicing
//! and gain indexes are mapped with simple linear rules rather than the AMBE tables,
//! and silence and tone frames reset the stream history instead of being synthesized.

use collect_slice::CollectSlice;
use tracing::trace;

use crate::consts::{MAX_HARMONICS, SAMPLES_PER_FRAME};
use crate::engine::{Synthesis, VocoderEngine};
use crate::enhance::enhance;
use crate::fec::{FecFrame, VoiceBits};
use crate::frame::BitGroups;
use crate::noise::Noise;
use crate::params::{BaseParams, DecoderState, ParamSet};
use crate::synth::{synthesize, update_phase};

/// Frames with more corrected errors than this repeat the previous parameters.
const REPEAT_THRESHOLD: usize = 3;
/// Consecutive repeats allowed before the stream is muted and reset.
const MAX_REPEATS: usize = 3;
/// Number of voicing bands.
const BANDS: usize = 8;
/// Log2 offset applied to the gain term to get harmonic amplitudes.
const AMP_OFFSET: f32 = 10.0;
/// Scale applied to synthesized samples before conversion to PCM.
const OUTPUT_GAIN: f32 = 7.0;
/// Synthesized samples are clipped to this magnitude.
const CLIP: f32 = 32760.0;

/// Decodes the index in the given range of voice bits, MSB first.
fn field(voice: &VoiceBits, start: usize, len: usize) -> u8 {
    voice[start..start + len].iter().fold(0, |v, &b| v << 1 | b)
}

/// Frame classification from the pitch index, b<sub>0</sub>.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bootstrap {
    Pitch(u8),
    Erasure,
    Silence,
}

impl Bootstrap {
    pub fn new(voice: &VoiceBits) -> Bootstrap {
        match field(voice, 0, 7) {
            pitch @ 0..=119 => Bootstrap::Pitch(pitch),
            120..=123 => Bootstrap::Erasure,
            // Tones are rendered as silence.
            _ => Bootstrap::Silence,
        }
    }
}

/// Voicing index, b<sub>1</sub>.
fn voicing(voice: &VoiceBits) -> u8 { field(voice, 7, 5) }

/// Gain index, b<sub>2</sub>.
fn gain(voice: &VoiceBits) -> u8 { field(voice, 12, 5) }

/// Fill in the current parameters from the given indexes and previous parameters.
fn decode_params(cur: &mut ParamSet, prev: &ParamSet, pitch: u8, voicing: u8, gain: u8) {
    let base = BaseParams::new(pitch);
    let voiced_bands = voicing as usize * (BANDS + 1) / 32;

    cur.fundamental = base.fundamental;
    cur.harmonics = base.harmonics;
    cur.gamma = 0.25 * gain as f32 + 0.5 * prev.gamma;

    let amp = (cur.gamma - AMP_OFFSET).exp2();

    for l in 1..=MAX_HARMONICS {
        let (a, v) = if l <= base.harmonics {
            (amp, (l - 1) * BANDS / base.harmonics < voiced_bands)
        } else {
            (0.0, false)
        };

        cur.amps[l - 1] = a;
        cur.log_amps[l - 1] = if a > 0.0 { a.log2() } else { 0.0 };
        cur.voiced[l - 1] = v;
    }

    cur.unvoiced = cur.voiced[..base.harmonics].iter().filter(|&&v| !v).count();
}

/// Engine implementing D-Star error correction and harmonic synthesis.
#[derive(Clone, Debug)]
pub struct MbeEngine {
    noise: Noise,
}

impl MbeEngine {
    /// Create a new `MbeEngine` with an entropy-seeded noise source.
    pub fn new() -> MbeEngine {
        MbeEngine {
            noise: Noise::new(),
        }
    }

    /// Create a new `MbeEngine` whose output is reproducible for the given seed.
    pub fn with_seed(seed: u64) -> MbeEngine {
        MbeEngine {
            noise: Noise::with_seed(seed),
        }
    }
}

impl Default for MbeEngine {
    fn default() -> MbeEngine {
        MbeEngine::new()
    }
}

impl VocoderEngine for MbeEngine {
    fn synthesize(&mut self, bits: &BitGroups, state: &mut DecoderState, quality: u8)
        -> Synthesis
    {
        let fec = FecFrame::new(bits);
        let mut diag = "=".repeat(fec.errors.total());

        let bad = match Bootstrap::new(&fec.voice) {
            Bootstrap::Erasure => {
                diag.push('E');
                state.current.repeat = 0;
                true
            },
            Bootstrap::Silence => true,
            Bootstrap::Pitch(_) if fec.errors.total() > REPEAT_THRESHOLD => {
                let repeat = state.current.repeat;

                state.current.repeat_from(&state.previous);
                state.current.repeat = repeat + 1;
                diag.push('R');
                false
            },
            Bootstrap::Pitch(pitch) => {
                decode_params(&mut state.current, &state.previous, pitch,
                              voicing(&fec.voice), gain(&fec.voice));
                state.current.repeat = 0;
                false
            },
        };

        let mut pcm = [0; SAMPLES_PER_FRAME];

        if !bad && state.current.repeat <= MAX_REPEATS {
            state.previous = state.current.clone();
            enhance(&mut state.current);
            update_phase(&mut state.current, &state.previous_enhanced, &mut self.noise);

            synthesize(&state.current, &state.previous_enhanced, quality, &mut self.noise)
                .iter()
                .map(|&x| (x * OUTPUT_GAIN).max(-CLIP).min(CLIP) as i16)
                .collect_slice_checked(&mut pcm[..]);

            state.previous_enhanced = state.current.clone();
        } else {
            if !bad {
                diag.push('M');
            }

            state.reset();
        }

        trace!(errors = fec.errors.total(), diag = %diag, "engine frame");

        Synthesis {
            pcm: pcm,
            errors: fec.errors,
            diagnostic: diag,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::ErrorCounts;
    use crate::fec::build;

    fn frame(pitch: u16, voicing: u16, gain: u16) -> BitGroups {
        build(pitch << 5 | voicing, gain << 7, 0)
    }

    #[test]
    fn test_bootstrap() {
        let mut v = [0; 49];

        assert_eq!(Bootstrap::new(&v), Bootstrap::Pitch(0));

        // 120 = 0b1111000
        v[..7].copy_from_slice(&[1, 1, 1, 1, 0, 0, 0]);
        assert_eq!(Bootstrap::new(&v), Bootstrap::Erasure);

        v[..7].copy_from_slice(&[1, 1, 1, 1, 1, 0, 0]);
        assert_eq!(Bootstrap::new(&v), Bootstrap::Silence);

        v[..7].copy_from_slice(&[1, 1, 1, 0, 1, 1, 1]);
        assert_eq!(Bootstrap::new(&v), Bootstrap::Pitch(119));
    }

    #[test]
    fn test_fields() {
        let f = FecFrame::new(&frame(40, 0b10110, 0b01101));

        assert_eq!(Bootstrap::new(&f.voice), Bootstrap::Pitch(40));
        assert_eq!(voicing(&f.voice), 0b10110);
        assert_eq!(gain(&f.voice), 0b01101);
    }

    #[test]
    fn test_decode_params() {
        let prev = ParamSet {
            gamma: 4.0,
            ..ParamSet::default()
        };
        let mut cur = ParamSet::default();

        decode_params(&mut cur, &prev, 40, 16, 20);

        assert_eq!(cur.harmonics, 16);
        assert!((cur.gamma - 7.0).abs() < 0.00001);

        // 16 * 9 / 32 = 4 of 8 bands voiced.
        assert!(cur.is_voiced(1));
        assert!(cur.is_voiced(8));
        assert!(!cur.is_voiced(9));
        assert!(!cur.is_voiced(16));
        assert_eq!(cur.unvoiced, 8);

        assert!((cur.amp(1) - 0.125).abs() < 0.00001);
        assert_eq!(cur.amp(17), 0.0);
    }

    #[test]
    fn test_clean_frame() {
        let mut e = MbeEngine::with_seed(5);
        let mut state = DecoderState::default();

        let out = e.synthesize(&frame(40, 31, 31), &mut state, 3);

        assert_eq!(out.errors, ErrorCounts::new(0, 0));
        assert_eq!(out.diagnostic, "");
        assert_eq!(state.current.harmonics, 16);
        assert_eq!(state.previous_enhanced, state.current);
        assert_eq!(state.previous.harmonics, 16);
        assert!(out.pcm.iter().any(|&s| s != 0));
    }

    #[test]
    fn test_seeded_output() {
        let bits = frame(60, 10, 28);

        let mut a = MbeEngine::with_seed(11);
        let mut sa = DecoderState::default();
        let mut b = MbeEngine::with_seed(11);
        let mut sb = DecoderState::default();

        for _ in 0..3 {
            let x = a.synthesize(&bits, &mut sa, 3);
            let y = b.synthesize(&bits, &mut sb, 3);

            assert_eq!(x.pcm[..], y.pcm[..]);
        }

        assert_eq!(sa, sb);
    }

    #[test]
    fn test_erasure() {
        let mut e = MbeEngine::with_seed(1);
        let mut state = DecoderState::default();

        e.synthesize(&frame(40, 31, 31), &mut state, 3);
        assert!(!state.is_initial());

        let out = e.synthesize(&frame(121, 0, 0), &mut state, 3);

        assert_eq!(out.diagnostic, "E");
        assert!(out.pcm.iter().all(|&s| s == 0));
        assert!(state.is_initial());
    }

    #[test]
    fn test_silence() {
        let mut e = MbeEngine::with_seed(1);
        let mut state = DecoderState::default();

        let out = e.synthesize(&frame(125, 31, 31), &mut state, 3);

        assert_eq!(out.diagnostic, "");
        assert!(out.pcm.iter().all(|&s| s == 0));
        assert!(state.is_initial());
    }

    #[test]
    fn test_repeat_then_mute() {
        let mut e = MbeEngine::with_seed(1);
        let mut state = DecoderState::default();

        e.synthesize(&frame(40, 31, 31), &mut state, 3);

        // Corrupt two bits of each Golay vector and change the pitch.
        let mut bad = frame(80, 0, 0);
        bad[0][3] ^= 1;
        bad[0][9] ^= 1;
        bad[1][1] ^= 1;
        bad[1][2] ^= 1;

        for i in 1..=3 {
            let out = e.synthesize(&bad, &mut state, 3);

            assert_eq!(out.errors, ErrorCounts::new(2, 2));
            assert_eq!(out.diagnostic, "====R");
            assert_eq!(state.current.repeat, i);
            assert_eq!(state.current.harmonics, 16);
        }

        let out = e.synthesize(&bad, &mut state, 3);

        assert_eq!(out.diagnostic, "====RM");
        assert!(out.pcm.iter().all(|&s| s == 0));
        assert!(state.is_initial());
    }
}
