use std::env;
use std::process;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use ambe::consts::{
    FRAME_BITS, FRAME_BYTES, FRAME_RATE, MUTING_THRESHOLD, SAMPLES_PER_FRAME, SAMPLE_RATE,
    VOICE_BITS,
};
use ambe::{stream, version, Decoder};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("dstar_codec");

    let code = match args.get(1).map(String::as_str) {
        Some("info") => {
            print_info();
            0
        }
        Some("decode") if args.len() == 4 => match decode_file(&args[2], &args[3]) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                1
            }
        },
        Some("decode") => {
            eprintln!("Error: decode requires input and output files");
            eprintln!();
            print_usage(prog);
            1
        }
        Some(other) => {
            eprintln!("Error: unknown command '{}'", other);
            eprintln!();
            print_usage(prog);
            1
        }
        None => {
            print_usage(prog);
            1
        }
    };

    process::exit(code);
}

fn print_usage(prog: &str) {
    eprintln!("D-Star AMBE codec tool v{}", version());
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} decode <input.ambe> <output.raw>  - Decode AMBE to PCM", prog);
    eprintln!("  {} info                              - Show library info", prog);
    eprintln!();
    eprintln!("File formats:");
    eprintln!("  .ambe  - Raw D-Star AMBE frames ({} bytes per frame)", FRAME_BYTES);
    eprintln!("  .raw   - Raw PCM audio (16-bit signed little-endian, {}Hz, mono)", SAMPLE_RATE);
    eprintln!();
    eprintln!("Convert PCM to WAV:");
    eprintln!("  sox -t raw -r {} -e signed -b 16 -c 1 output.raw output.wav", SAMPLE_RATE);
}

fn print_info() {
    println!("D-Star AMBE library information");
    println!();
    println!("Version: {}", version());
    println!();
    println!("Codec: D-Star AMBE (AMBE 3600x2400)");
    println!("  - Voice data rate: 2400 bps");
    println!("  - FEC overhead: 1200 bps");
    println!("  - Total bit rate: 3600 bps");
    println!();
    println!("Audio format:");
    println!("  - Sample rate: {} Hz", SAMPLE_RATE);
    println!("  - Bit depth: 16-bit signed");
    println!("  - Channels: mono");
    println!("  - Frame size: {} samples (20ms)", SAMPLES_PER_FRAME);
    println!();
    println!("AMBE frame format:");
    println!("  - Size: {} bits ({} bytes)", FRAME_BITS, FRAME_BYTES);
    println!("  - Frame rate: {} fps", FRAME_RATE);
    println!("  - Voice parameters: {} bits", VOICE_BITS);
    println!("  - Muting threshold: {} corrected errors", MUTING_THRESHOLD);
}

fn decode_file(input: &str, output: &str) -> Result<()> {
    let mut decoder = Decoder::create();

    let stats = stream::decode_file(&mut decoder, input, output)
        .with_context(|| format!("failed to decode '{}'", input))?;

    println!("Decoded {} frames ({:.2} seconds)", stats.frames,
             stats.duration().as_secs_f64());

    if stats.muted > 0 {
        println!("Muted {} frames due to excessive errors (>{})", stats.muted,
                 MUTING_THRESHOLD);
    }

    println!("Total bit errors corrected: {}", stats.errors);

    Ok(())
}
