/// Bit errors corrected while decoding one frame.
///
/// The two tallies are tracked independently by the vocoder: `primary` covers the
/// first Golay-coded vector, c<sub>0</sub>, and `secondary` the demodulated second
/// vector, c<sub>1</sub>.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorCounts {
    /// Errors corrected in c<sub>0</sub>.
    pub primary: usize,
    /// Errors corrected in c<sub>1</sub>.
    pub secondary: usize,
}

impl ErrorCounts {
    /// Create a new `ErrorCounts` from the two tallies.
    pub fn new(primary: usize, secondary: usize) -> ErrorCounts {
        ErrorCounts {
            primary: primary,
            secondary: secondary,
        }
    }

    /// Total number of errors corrected in the frame.
    pub fn total(&self) -> usize {
        self.primary + self.secondary
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_errors() {
        let e = ErrorCounts::new(5, 4);

        assert_eq!(e.primary, 5);
        assert_eq!(e.secondary, 4);
        assert_eq!(e.total(), 9);
        assert_eq!(ErrorCounts::default().total(), 0);
    }
}
