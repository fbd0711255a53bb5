//! Constants used in the codec.

/// Major version of the library.
pub const VERSION_MAJOR: u32 = 1;
/// Minor version of the library.
pub const VERSION_MINOR: u32 = 0;
/// Patch version of the library.
pub const VERSION_PATCH: u32 = 0;

/// Bytes in one D-Star AMBE frame.
pub const FRAME_BYTES: usize = 9;
/// Bits in one D-Star AMBE frame.
pub const FRAME_BITS: usize = FRAME_BYTES * 8;

/// Number of bit groups in the unpacked frame layout.
pub const GROUPS: usize = 4;
/// Bits in each unpacked bit group.
pub const GROUP_BITS: usize = 24;
/// Number of groups that carry bits extracted from the frame.
pub const DATA_GROUPS: usize = FRAME_BITS / GROUP_BITS;

/// Voice parameter bits recovered from a frame after error correction.
pub const VOICE_BITS: usize = 49;

/// Audio samples per second
pub const SAMPLE_RATE: usize = 8000;
/// Samples per voice frame
pub const SAMPLES_PER_FRAME: usize = 160;
/// Voice frames per second.
pub const FRAME_RATE: usize = SAMPLE_RATE / SAMPLES_PER_FRAME;

/// Frames whose combined corrected error count exceeds this are muted.
///
/// Derived empirically from D-Star streams.
pub const MUTING_THRESHOLD: usize = 7;

/// Unvoiced synthesis quality, 1 (lowest) through 3 (highest).
pub const UV_QUALITY: u8 = 3;

/// Number of harmonics L when the fundamental frequency ω<sub>0</sub> is maximum.
pub const MIN_HARMONICS: usize = 9;
/// Number of harmonics L when the fundamental frequency ω<sub>0</sub> is minimum.
pub const MAX_HARMONICS: usize = 56;
