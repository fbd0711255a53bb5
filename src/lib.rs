//! Decoder for D-Star AMBE 3600x2400 digital voice frames.
//!
//! Each 72-bit frame is unpacked into the bit group layout consumed by a
//! [`VocoderEngine`](engine::VocoderEngine), which recovers the voice parameters and
//! synthesizes 20ms of 8kHz audio. A [`Decoder`](decoder::Decoder) carries parameter
//! history across the frames of one transmission and applies the error muting policy
//! to each frame.
//!
//! A decoder instance must not be shared across concurrent operations, but separate
//! instances are fully independent.

pub mod consts;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod errors;
pub mod fec;
pub mod frame;
pub mod mbe;
pub mod mute;
pub mod params;
pub mod stream;

mod enhance;
mod noise;
mod synth;

pub use decoder::{DecodedFrame, Decoder};
pub use engine::{StubEngine, Synthesis, VocoderEngine};
pub use error::{DecodeError, StreamError};
pub use errors::ErrorCounts;
pub use frame::{AmbeFrame, BitGroups, PcmFrame};
pub use mbe::MbeEngine;
pub use params::{DecoderState, ParamSet};
pub use stream::StreamStats;

/// Library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Library version as (major, minor, patch).
pub fn version_info() -> (u32, u32, u32) {
    (consts::VERSION_MAJOR, consts::VERSION_MINOR, consts::VERSION_PATCH)
}
