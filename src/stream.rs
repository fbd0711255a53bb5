//! Decode streams of `.ambe` frames into raw PCM.
//!
//! Input is a headerless sequence of 9-byte frames. Output is a headerless sequence of
//! 160 little-endian signed 16-bit samples for every frame that passes the muting
//! policy.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::consts::{FRAME_BYTES, SAMPLES_PER_FRAME, SAMPLE_RATE};
use crate::decoder::Decoder;
use crate::engine::VocoderEngine;
use crate::error::StreamError;
use crate::frame::{AmbeFrame, PcmFrame};

/// Counters accumulated while decoding a stream.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Frames decoded and written.
    pub frames: usize,
    /// Frames muted due to excessive errors.
    pub muted: usize,
    /// Total bit errors corrected over all frames, muted or not.
    pub errors: usize,
    /// Length of a trailing partial frame, if the stream ended with one.
    pub trailing: Option<usize>,
}

impl StreamStats {
    /// Playback duration of the written audio.
    pub fn duration(&self) -> Duration {
        Duration::from_millis((self.frames * SAMPLES_PER_FRAME * 1000 / SAMPLE_RATE) as u64)
    }
}

/// Fill the given buffer from the reader, returning how many bytes were read before
/// the end of the stream.
fn read_frame<R: Read>(input: &mut R, buf: &mut [u8; FRAME_BYTES]) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {},
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}

fn write_pcm<W: Write>(output: &mut W, pcm: &PcmFrame) -> io::Result<()> {
    let mut bytes = [0; SAMPLES_PER_FRAME * 2];

    for (dst, s) in bytes.chunks_exact_mut(2).zip(pcm.iter()) {
        dst.copy_from_slice(&s.to_le_bytes());
    }

    output.write_all(&bytes)
}

/// Decode every complete frame from the input, writing the audio of accepted frames
/// to the output.
///
/// A trailing partial frame ends the stream with a warning. Read and write failures
/// abort decoding.
pub fn decode_stream<E, R, W>(decoder: &mut Decoder<E>, mut input: R, mut output: W)
    -> Result<StreamStats, StreamError>
    where E: VocoderEngine, R: Read, W: Write
{
    let mut stats = StreamStats::default();
    let mut buf = [0; FRAME_BYTES];

    loop {
        let n = read_frame(&mut input, &mut buf).map_err(StreamError::Read)?;

        if n == 0 {
            break;
        }

        if n < FRAME_BYTES {
            warn!(bytes = n, expected = FRAME_BYTES,
                  "partial frame at end of stream, ignoring");
            stats.trailing = Some(n);
            break;
        }

        let frame = decoder.decode(&AmbeFrame::new(buf));
        stats.errors += frame.total_errors;

        if frame.accepted {
            write_pcm(&mut output, &frame.pcm).map_err(StreamError::Write)?;
            stats.frames += 1;
        } else {
            stats.muted += 1;
        }
    }

    output.flush().map_err(StreamError::Write)?;

    info!(frames = stats.frames, muted = stats.muted, errors = stats.errors,
          "stream decoded");

    Ok(stats)
}

/// Decode the `.ambe` file at `input` into a `.raw` PCM file at `output`.
pub fn decode_file<E, P, Q>(decoder: &mut Decoder<E>, input: P, output: Q)
    -> Result<StreamStats, StreamError>
    where E: VocoderEngine, P: AsRef<Path>, Q: AsRef<Path>
{
    let input = input.as_ref();
    let output = output.as_ref();

    let fin = File::open(input).map_err(|e| StreamError::Open {
        path: input.to_path_buf(),
        source: e,
    })?;

    let fout = File::create(output).map_err(|e| StreamError::Create {
        path: output.to_path_buf(),
        source: e,
    })?;

    info!(input = %input.display(), output = %output.display(), "decoding");

    decode_stream(decoder, BufReader::new(fin), BufWriter::new(fout))
}
