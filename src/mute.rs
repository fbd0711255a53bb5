//! Frame muting based on corrected error counts.

use crate::consts::MUTING_THRESHOLD;
use crate::errors::ErrorCounts;

/// Outcome of applying the muting policy to one frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the frame's audio is usable.
    pub accepted: bool,
    /// Combined corrected error count, reported whether or not the frame is muted.
    pub total_errors: usize,
}

/// Decide whether a frame with the given error counts should be heard.
///
/// Frames with more than `MUTING_THRESHOLD` corrected errors produce harsh
/// artifacts, so their audio is dropped.
pub fn decide(errors: &ErrorCounts) -> Verdict {
    let total = errors.total();

    Verdict {
        accepted: total <= MUTING_THRESHOLD,
        total_errors: total,
    }
}
