//! Spectral amplitude enhancement.

use std::f32::consts::PI;

use arrayvec::ArrayVec;

use crate::consts::MAX_HARMONICS;
use crate::params::ParamSet;

/// Energy-related values of a set of spectral amplitudes.
#[derive(Copy, Clone, Debug)]
pub struct FrameEnergy {
    /// Spectral amplitude energy, R<sub>M0</sub>.
    pub energy: f32,
    /// Scaled energy value, R<sub>M1</sub>.
    pub scaled: f32,
}

impl FrameEnergy {
    /// Compute the energy values of the amplitudes in the given parameter set.
    pub fn new(params: &ParamSet) -> FrameEnergy {
        let amps = &params.amps[..params.harmonics];

        FrameEnergy {
            energy: amps.iter()
                .map(|&m| m.powi(2))
                .fold(0.0, |s, x| s + x),
            scaled: amps.iter().enumerate()
                .map(|(l, &m)| m.powi(2) * (params.fundamental * (l + 1) as f32).cos())
                .fold(0.0, |s, x| s + x),
        }
    }
}

/// Enhance the spectral amplitudes of the given parameter set in place, emphasizing
/// formants while preserving total energy.
pub fn enhance(params: &mut ParamSet) {
    let fen = FrameEnergy::new(params);

    // Nothing to weight in a silent frame.
    if fen.energy <= 0.0 {
        return;
    }

    let energy_sqr = fen.energy.powi(2);
    let scaled_sqr = fen.scaled.powi(2);
    let denom = params.fundamental * fen.energy * (energy_sqr - scaled_sqr);

    let mut enhanced = params.amps[..params.harmonics].iter().enumerate().map(|(l, &m)| {
        let l = l + 1;

        // Low harmonics pass through unweighted.
        if 8 * l <= params.harmonics || denom <= 0.0 {
            return m;
        }

        let weight = m.sqrt() * (
            0.96 * PI * (
                energy_sqr + scaled_sqr - 2.0 * fen.energy * fen.scaled *
                    (params.fundamental * l as f32).cos()
            ) / denom
        ).powf(0.25);

        m * weight.max(0.5).min(1.2)
    }).collect::<ArrayVec<f32, MAX_HARMONICS>>();

    let total = enhanced.iter().fold(0.0, |s, &m| s + m.powi(2));
    let scale = if total > 0.0 { (fen.energy / total).sqrt() } else { 1.0 };

    for m in enhanced.iter_mut() {
        *m *= scale;
    }

    for (l, m) in enhanced.into_iter().enumerate() {
        params.amps[l] = m;
        params.log_amps[l] = if m > 0.0 { m.log2() } else { 0.0 };
    }
}
