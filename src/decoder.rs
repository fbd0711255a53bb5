//! Decode D-Star AMBE frames into an audio signal.

use tracing::debug;

use crate::consts::UV_QUALITY;
use crate::engine::VocoderEngine;
use crate::error::DecodeError;
use crate::frame::{AmbeFrame, PcmFrame};
use crate::mbe::MbeEngine;
use crate::mute;
use crate::params::DecoderState;

/// Result of decoding a single frame.
#[derive(Clone, Debug)]
pub struct DecodedFrame {
    /// Synthesized audio. Only usable when `accepted` is set.
    pub pcm: PcmFrame,
    /// Combined number of bit errors corrected in the frame.
    pub total_errors: usize,
    /// Whether the frame passed the muting policy.
    pub accepted: bool,
    /// Engine diagnostics for the frame.
    pub diagnostic: String,
}

/// Decodes the frames of one voice stream.
///
/// A decoder carries parameter history from frame to frame, so each instance must
/// only be fed frames from a single stream, and `reset` should be called whenever a
/// new transmission begins.
pub struct Decoder<E = MbeEngine> {
    /// Tracks saved parameters across frames.
    state: DecoderState,
    engine: E,
}

impl Decoder<MbeEngine> {
    /// Create a new `Decoder` backed by the built-in engine.
    pub fn create() -> Decoder<MbeEngine> {
        Decoder::new(MbeEngine::new())
    }
}

impl<E: VocoderEngine> Decoder<E> {
    /// Create a new `Decoder` in the default state, driving the given engine.
    pub fn new(engine: E) -> Decoder<E> {
        Decoder {
            state: DecoderState::default(),
            engine: engine,
        }
    }

    /// Return to the default state, discarding all stream history.
    pub fn reset(&mut self) {
        debug!("resetting decoder state");
        self.state.reset();
    }

    /// Decode the given frame.
    ///
    /// Audio is always synthesized and the error count always reported, but the
    /// audio of a frame rejected by the muting policy must not be played.
    pub fn decode(&mut self, frame: &AmbeFrame) -> DecodedFrame {
        let bits = frame.unpack();
        let out = self.engine.synthesize(&bits, &mut self.state, UV_QUALITY);
        let verdict = mute::decide(&out.errors);

        debug!(
            errors = verdict.total_errors,
            accepted = verdict.accepted,
            diag = %out.diagnostic,
            "decoded frame"
        );

        DecodedFrame {
            pcm: out.pcm,
            total_errors: verdict.total_errors,
            accepted: verdict.accepted,
            diagnostic: out.diagnostic,
        }
    }

    /// Decode a frame held in the given buffer, which must be exactly one frame long.
    pub fn decode_bytes(&mut self, buf: &[u8]) -> Result<DecodedFrame, DecodeError> {
        if buf.is_empty() {
            return Err(DecodeError::InvalidArgument { what: "empty frame buffer" });
        }

        let frame = AmbeFrame::try_from(buf)?;

        Ok(self.decode(&frame))
    }

    /// Current parameter history.
    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    /// Engine driven by this decoder.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Release the decoder, returning its engine.
    pub fn destroy(self) -> E {
        self.engine
    }
}

impl Default for Decoder<MbeEngine> {
    fn default() -> Decoder<MbeEngine> {
        Decoder::create()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::engine::StubEngine;

    const A: [u8; 9] = [0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF];
    const B: [u8; 9] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];

    #[test]
    fn test_fresh_equals_reset() {
        let mut fresh = Decoder::new(StubEngine::new());
        let mut reset = Decoder::new(StubEngine::new());

        reset.reset();

        let a = fresh.decode(&AmbeFrame::new(A));
        let b = reset.decode(&AmbeFrame::new(A));

        assert_eq!(a.pcm[..], b.pcm[..]);
        assert_eq!(a.total_errors, b.total_errors);
        assert_eq!(fresh.state(), reset.state());
    }

    #[test]
    fn test_state_continuity() {
        let mut cont = Decoder::new(StubEngine::new());
        let mut split = Decoder::new(StubEngine::new());

        cont.decode(&AmbeFrame::new(A));
        let b1 = cont.decode(&AmbeFrame::new(B));

        split.decode(&AmbeFrame::new(A));
        split.reset();
        let b2 = split.decode(&AmbeFrame::new(B));

        assert_ne!(b1.pcm[..], b2.pcm[..]);
    }

    #[test]
    fn test_reset_discards_history() {
        let mut d = Decoder::new(StubEngine::new());

        assert!(d.state().is_initial());
        d.decode(&AmbeFrame::new(A));
        assert!(!d.state().is_initial());
        d.reset();
        assert!(d.state().is_initial());
    }

    #[test]
    fn test_muted() {
        let mut d = Decoder::new(StubEngine::with_errors(5, 4));
        let f = d.decode(&AmbeFrame::new(A));

        assert!(!f.accepted);
        assert_eq!(f.total_errors, 9);

        let mut d = Decoder::new(StubEngine::with_errors(3, 4));
        let f = d.decode(&AmbeFrame::new(A));

        assert!(f.accepted);
        assert_eq!(f.total_errors, 7);
    }

    #[test]
    fn test_decode_bytes() {
        let mut d = Decoder::new(StubEngine::new());

        match d.decode_bytes(&[]) {
            Err(DecodeError::InvalidArgument { .. }) => {},
            _ => panic!("expected invalid argument"),
        }

        match d.decode_bytes(&A[..5]) {
            Err(DecodeError::FrameLength { expected: 9, got: 5 }) => {},
            _ => panic!("expected frame length error"),
        }

        // Rejected input leaves the state untouched.
        assert!(d.state().is_initial());
        assert_eq!(d.engine().calls(), 0);

        assert!(d.decode_bytes(&A).unwrap().accepted);
        assert_eq!(d.destroy().calls(), 1);
    }

    #[test]
    fn test_independent_instances() {
        let mut x = Decoder::new(StubEngine::new());
        let mut y = Decoder::new(StubEngine::new());

        x.decode(&AmbeFrame::new(A));
        x.decode(&AmbeFrame::new(A));

        let fy = y.decode(&AmbeFrame::new(B));
        let mut z = Decoder::new(StubEngine::new());
        let fz = z.decode(&AmbeFrame::new(B));

        assert_eq!(fy.pcm[..], fz.pcm[..]);
    }
}
