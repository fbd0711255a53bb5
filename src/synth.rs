//! Harmonic speech synthesis from voice model parameters.
//!
//! Each frame crossfades from the previous frame's (enhanced) parameters to the
//! current ones. Voiced harmonics are rendered as single sinusoids with phase carried
//! across frames, and unvoiced harmonics as a small bundle of random-phase sinusoids
//! spread across the harmonic's band.

use std::cmp::max;
use std::f32::consts::PI;

use crate::consts::{MAX_HARMONICS, SAMPLES_PER_FRAME};
use crate::noise::Noise;
use crate::params::ParamSet;

/// Synthesized samples before conversion to PCM.
pub type FloatFrame = [f32; SAMPLES_PER_FRAME];

/// Update the phase base ψ<sub>l</sub> and synthesis phase φ<sub>l</sub> of the
/// current parameters from the previous frame's phases.
pub fn update_phase(cur: &mut ParamSet, prev: &ParamSet, noise: &mut Noise) {
    let common = (prev.fundamental + cur.fundamental) * SAMPLES_PER_FRAME as f32 / 2.0;
    let trans = cur.harmonics / 4;

    for l in 1..=MAX_HARMONICS {
        let base = (prev.phase_base(l) + common * l as f32).rem_euclid(2.0 * PI);

        cur.phase_base[l - 1] = base;
        cur.phase[l - 1] = if l <= trans {
            base
        } else {
            base + cur.unvoiced as f32 * noise.next_phase() / cur.harmonics as f32
        };
    }
}

/// Weight of the previous frame at sample n, falling from 1 to 0 over the frame.
fn fade_out(n: usize) -> f32 {
    0.5 * (1.0 + (PI * n as f32 / SAMPLES_PER_FRAME as f32).cos())
}

fn fade_in(n: usize) -> f32 {
    1.0 - fade_out(n)
}

/// Add a windowed sinusoid to the buffer, with sample n evaluated at time n + offset.
fn add_tone(buf: &mut FloatFrame, amp: f32, freq: f32, phase: f32, offset: isize,
            window: fn(usize) -> f32)
{
    for (n, s) in buf.iter_mut().enumerate() {
        *s += window(n) * amp * (freq * (n as isize + offset) as f32 + phase).cos();
    }
}

/// Add the unvoiced energy of harmonic l of the given parameters to the buffer.
fn add_unvoiced(buf: &mut FloatFrame, params: &ParamSet, l: usize, quality: usize,
                noise: &mut Noise, window: fn(usize) -> f32)
{
    let step = 1.0 / quality as f32;
    let offset = (step - 1.0) / 2.0;
    let amp = params.amp(l) / (quality as f32).sqrt();

    for k in 0..quality {
        let freq = params.fundamental * (l as f32 + offset + k as f32 * step);
        add_tone(buf, amp, freq, noise.next_phase(), 0, window);
    }
}

/// Synthesize one frame, transitioning from `prev` to `cur`.
///
/// The quality parameter sets the number of sinusoids, 1 through 3, used to render
/// each unvoiced harmonic.
pub fn synthesize(cur: &ParamSet, prev: &ParamSet, quality: u8, noise: &mut Noise)
    -> FloatFrame
{
    let mut buf = [0.0; SAMPLES_PER_FRAME];
    let quality = quality.max(1).min(3) as usize;

    for l in 1..=max(cur.harmonics, prev.harmonics) {
        if l <= prev.harmonics && prev.amp(l) > 0.0 {
            if prev.is_voiced(l) {
                add_tone(&mut buf, prev.amp(l), prev.fundamental * l as f32,
                         prev.phase(l), 0, fade_out);
            } else {
                add_unvoiced(&mut buf, prev, l, quality, noise, fade_out);
            }
        }

        if l <= cur.harmonics && cur.amp(l) > 0.0 {
            if cur.is_voiced(l) {
                add_tone(&mut buf, cur.amp(l), cur.fundamental * l as f32,
                         cur.phase(l), -(SAMPLES_PER_FRAME as isize), fade_in);
            } else {
                add_unvoiced(&mut buf, cur, l, quality, noise, fade_in);
            }
        }
    }

    buf
}
