//! Received AMBE frames and the bit group layout consumed by the vocoder.

use collect_slice::CollectSlice;

use crate::consts::{DATA_GROUPS, FRAME_BYTES, GROUPS, GROUP_BITS, SAMPLES_PER_FRAME};
use crate::error::DecodeError;

/// A single group of frame bits, each element 0 or 1.
pub type BitGroup = [u8; GROUP_BITS];

/// Unpacked frame bits. Groups 0 through 2 hold the 72 frame bits in transmission
/// order and group 3 is always zero.
pub type BitGroups = [BitGroup; GROUPS];

/// 20ms of signed 16-bit mono audio at 8kHz.
pub type PcmFrame = [i16; SAMPLES_PER_FRAME];

/// A received 72-bit D-Star AMBE voice frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AmbeFrame([u8; FRAME_BYTES]);

impl AmbeFrame {
    /// Create a new `AmbeFrame` from the given 9 bytes.
    pub fn new(bytes: [u8; FRAME_BYTES]) -> AmbeFrame {
        AmbeFrame(bytes)
    }

    /// Raw frame bytes.
    pub fn bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.0
    }

    /// Iterate over the 72 frame bits, MSB of byte 0 first.
    pub fn bits(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().flat_map(|&b| (0..8).rev().map(move |i| b >> i & 1))
    }

    /// Distribute the frame bits sequentially into groups 0, 1, and 2 and leave
    /// group 3 zeroed.
    pub fn unpack(&self) -> BitGroups {
        let mut groups = [[0; GROUP_BITS]; GROUPS];
        let mut bits = self.bits();

        for group in groups.iter_mut().take(DATA_GROUPS) {
            bits.by_ref().take(GROUP_BITS).collect_slice_checked(&mut group[..]);
        }

        debug_assert!(bits.next().is_none());

        groups
    }
}

impl From<[u8; FRAME_BYTES]> for AmbeFrame {
    fn from(bytes: [u8; FRAME_BYTES]) -> AmbeFrame {
        AmbeFrame::new(bytes)
    }
}

impl TryFrom<&[u8]> for AmbeFrame {
    type Error = DecodeError;

    fn try_from(buf: &[u8]) -> Result<AmbeFrame, DecodeError> {
        let bytes: [u8; FRAME_BYTES] = buf.try_into().map_err(|_| DecodeError::FrameLength {
            expected: FRAME_BYTES,
            got: buf.len(),
        })?;

        Ok(AmbeFrame(bytes))
    }
}
