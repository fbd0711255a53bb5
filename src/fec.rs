//! Error correction and demodulation of the unpacked frame vectors.
//!
//! The first two vectors, c<sub>0</sub> and c<sub>1</sub>, are each protected by
//! a Golay (23, 12) code. Before encoding, c<sub>1</sub> is whitened with a
//! pseudo-random sequence seeded from the data bits of c<sub>0</sub>, so c<sub>0</sub>
//! has to be corrected first.

use collect_slice::CollectSlice;
use once_cell::sync::Lazy;

use crate::consts::VOICE_BITS;
use crate::errors::ErrorCounts;
use crate::frame::{BitGroup, BitGroups};

/// Recovered voice parameter bits, each element 0 or 1.
pub type VoiceBits = [u8; VOICE_BITS];

/// Generator polynomial x<sup>11</sup> + x<sup>10</sup> + x<sup>6</sup> +
/// x<sup>5</sup> + x<sup>4</sup> + x<sup>2</sup> + 1.
const GENERATOR: u32 = 0xC75;

/// Maps each syndrome to the minimum-weight error pattern that produces it.
static SYNDROMES: Lazy<Vec<u32>> = Lazy::new(|| {
    let mut table = vec![0; 1 << 11];

    for a in 0..23 {
        table[syndrome(1 << a) as usize] = 1 << a;

        for b in a + 1..23 {
            table[syndrome(1 << a | 1 << b) as usize] = 1 << a | 1 << b;

            for c in b + 1..23 {
                let pattern = 1 << a | 1 << b | 1 << c;
                table[syndrome(pattern) as usize] = pattern;
            }
        }
    }

    table
});

/// Compute the 11-bit remainder of the given 23-bit word modulo the generator.
fn syndrome(word: u32) -> u32 {
    let mut r = word & 0x7FFFFF;

    for i in (11..23).rev() {
        if r >> i & 1 == 1 {
            r ^= GENERATOR << (i - 11);
        }
    }

    r
}

/// Encode 12 data bits into a systematic 23-bit Golay codeword.
#[cfg(test)]
pub(crate) fn golay_encode(data: u16) -> u32 {
    let shifted = (data as u32 & 0xFFF) << 11;
    shifted | syndrome(shifted)
}

/// Decode the given 23-bit Golay codeword, correcting up to 3 bit errors.
///
/// Returns the 12 data bits and the number of bits corrected.
pub fn golay_decode(word: u32) -> (u16, usize) {
    let pattern = SYNDROMES[syndrome(word) as usize];
    let fixed = (word ^ pattern) & 0x7FFFFF;

    ((fixed >> 11) as u16, pattern.count_ones() as usize)
}

/// Pseudo-random whitening mask for c<sub>1</sub>, seeded from c<sub>0</sub> data.
///
/// Element k, 1 ≤ k ≤ 23, is applied to group bit 23 - k.
fn whitening(c0: u16) -> [u8; 24] {
    let mut mask = [0; 24];
    let mut pr = 16 * c0 as u32;

    for m in mask.iter_mut().skip(1) {
        pr = (173 * pr + 13849) % 65536;
        *m = (pr / 32768) as u8;
    }

    mask
}

/// Build a codeword from group bits, where `offset` selects the group bit that
/// becomes codeword bit 0.
fn gather(group: &BitGroup, offset: usize) -> u32 {
    (0..23).fold(0, |w, i| w | (group[i + offset] as u32) << i)
}

/// Voice bits and error counts recovered from one frame.
#[derive(Copy, Clone, Debug)]
pub struct FecFrame {
    /// Voice parameter bits, b<sub>0</sub> first.
    pub voice: VoiceBits,
    /// Bits corrected in c<sub>0</sub> and c<sub>1</sub>.
    pub errors: ErrorCounts,
}

impl FecFrame {
    /// Correct and demodulate the given unpacked frame.
    pub fn new(groups: &BitGroups) -> FecFrame {
        // Bit 0 of group 0 is unused parity.
        let (c0, primary) = golay_decode(gather(&groups[0], 1));

        let mask = whitening(c0);
        let mut g1 = groups[1];

        for (k, j) in (0..23).rev().enumerate() {
            g1[j] ^= mask[k + 1];
        }

        let (c1, secondary) = golay_decode(gather(&g1, 0));

        let mut voice = [0; VOICE_BITS];

        (0..12).rev().map(|i| (c0 >> i & 1) as u8)
            .chain((0..12).rev().map(|i| (c1 >> i & 1) as u8))
            .chain((0..11).rev().map(|j| groups[2][j]))
            .chain((0..14).rev().map(|j| groups[3][j]))
            .collect_slice_checked(&mut voice[..]);

        FecFrame {
            voice: voice,
            errors: ErrorCounts::new(primary, secondary),
        }
    }
}

/// Build the unpacked layout of an error-free frame carrying the given c<sub>0</sub>
/// and c<sub>1</sub> data bits and 11 bits of c<sub>2</sub>.
#[cfg(test)]
pub(crate) fn build(c0: u16, c1: u16, c2: u16) -> BitGroups {
    let mut groups = [[0; 24]; 4];

    let w0 = golay_encode(c0);
    for i in 0..23 {
        groups[0][i + 1] = (w0 >> i & 1) as u8;
    }

    let w1 = golay_encode(c1);
    let mask = whitening(c0);
    for (k, j) in (0..23).rev().enumerate() {
        groups[1][j] = (w1 >> j & 1) as u8 ^ mask[k + 1];
    }

    for j in 0..11 {
        groups[2][j] = (c2 >> j & 1) as u8;
    }

    groups
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_golay_clean() {
        for &d in &[0, 1, 0x555, 0xAAA, 0xFFF, 0x123] {
            assert_eq!(golay_decode(golay_encode(d)), (d, 0));
        }
    }

    #[test]
    fn test_golay_correct() {
        let w = golay_encode(0x9C3);

        assert_eq!(golay_decode(w ^ 1 << 22), (0x9C3, 1));
        assert_eq!(golay_decode(w ^ (1 << 3 | 1 << 17)), (0x9C3, 2));
        assert_eq!(golay_decode(w ^ (1 << 0 | 1 << 11 | 1 << 20)), (0x9C3, 3));
    }

    #[test]
    fn test_golay_table_complete() {
        // Golay (23, 12) is perfect: every syndrome is reachable with weight <= 3.
        assert!(SYNDROMES.iter().skip(1).all(|&p| p != 0));
        assert!(SYNDROMES.iter().all(|&p| p.count_ones() <= 3));
    }

    #[test]
    fn test_whitening() {
        let m = whitening(0);

        // 13849 < 32768, 173 * 13849 + 13849 = 2409726 mod 65536 = 50430.
        assert_eq!(m[0], 0);
        assert_eq!(m[1], 0);
        assert_eq!(m[2], 1);
    }

    #[test]
    fn test_clean_frame() {
        let f = FecFrame::new(&build(0xABC, 0x5A5, 0x7FF));

        assert_eq!(f.errors, ErrorCounts::new(0, 0));
        assert_eq!(&f.voice[..12], &[1, 0, 1, 0, 1, 0, 1, 1, 1, 1, 0, 0]);
        assert_eq!(&f.voice[12..24], &[0, 1, 0, 1, 1, 0, 1, 0, 0, 1, 0, 1]);
        assert!(f.voice[24..35].iter().all(|&b| b == 1));
        assert!(f.voice[35..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_corrupt_frame() {
        let mut g = build(0x321, 0x0F0, 0);

        g[0][5] ^= 1;
        g[0][20] ^= 1;
        g[1][0] ^= 1;
        g[1][9] ^= 1;
        g[1][22] ^= 1;

        let f = FecFrame::new(&g);
        let clean = FecFrame::new(&build(0x321, 0x0F0, 0));

        assert_eq!(f.errors, ErrorCounts::new(2, 3));
        assert_eq!(f.voice[..], clean.voice[..]);
    }

    #[test]
    fn test_parity_bit_ignored() {
        let mut g = build(0x444, 0x222, 0);
        g[0][0] ^= 1;

        assert_eq!(FecFrame::new(&g).errors.total(), 0);
    }
}
