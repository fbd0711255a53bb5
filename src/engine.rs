//! Interface to the speech synthesis engine driven by the decoder.

use crate::consts::SAMPLES_PER_FRAME;
use crate::errors::ErrorCounts;
use crate::frame::{BitGroups, PcmFrame};
use crate::params::DecoderState;

/// Output of one engine invocation.
#[derive(Clone, Debug)]
pub struct Synthesis {
    /// Synthesized audio, produced even when the frame ends up muted.
    pub pcm: PcmFrame,
    /// Bit errors corrected while recovering the voice parameters.
    pub errors: ErrorCounts,
    /// Free-form engine diagnostics. Advisory only.
    pub diagnostic: String,
}

/// Converts unpacked frame bits into audio.
///
/// Implementations read and update the given parameter history in place, which is
/// how interpolation and concealment state propagates from frame to frame.
pub trait VocoderEngine {
    /// Synthesize one frame at the given unvoiced synthesis quality.
    fn synthesize(&mut self, bits: &BitGroups, state: &mut DecoderState, quality: u8)
        -> Synthesis;
}

impl<E: VocoderEngine + ?Sized> VocoderEngine for Box<E> {
    fn synthesize(&mut self, bits: &BitGroups, state: &mut DecoderState, quality: u8)
        -> Synthesis
    {
        (**self).synthesize(bits, state, quality)
    }
}

/// Deterministic engine that reports fixed error counts.
///
/// Each frame's gain term is derived from the frame bits and half of the previous
/// gain, and every output sample is derived from that gain, so output depends on
/// stream history the same way a real engine's does.
#[derive(Clone, Debug, Default)]
pub struct StubEngine {
    errors: ErrorCounts,
    calls: usize,
}

impl StubEngine {
    /// Create a new `StubEngine` that reports no errors.
    pub fn new() -> StubEngine {
        StubEngine::default()
    }

    /// Create a new `StubEngine` that reports the given errors for every frame.
    pub fn with_errors(primary: usize, secondary: usize) -> StubEngine {
        StubEngine {
            errors: ErrorCounts::new(primary, secondary),
            calls: 0,
        }
    }

    /// Number of frames synthesized so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl VocoderEngine for StubEngine {
    fn synthesize(&mut self, bits: &BitGroups, state: &mut DecoderState, _quality: u8)
        -> Synthesis
    {
        self.calls += 1;

        let ones = bits.iter().flat_map(|g| g.iter()).filter(|&&b| b == 1).count();

        state.previous = state.current.clone();
        state.current.gamma = ones as f32 + 0.5 * state.previous.gamma;
        state.current.repeat = 0;
        state.previous_enhanced = state.current.clone();

        let level = (state.current.gamma * 64.0) as i32;
        let mut pcm = [0; SAMPLES_PER_FRAME];

        for (n, s) in pcm.iter_mut().enumerate() {
            *s = (level + n as i32).min(i16::MAX as i32) as i16;
        }

        Synthesis {
            pcm: pcm,
            errors: self.errors,
            diagnostic: String::new(),
        }
    }
}
