//! CLI tool for rendering a timeline transcription to a WAV file
//!
//! Usage: render <input.txt> [output.wav]
//!
//! If output is not specified, generates <input>.wav

use std::env;
use std::fs;
use std::process;

use tracing_subscriber::EnvFilter;

use sonata::replayer::Replayer;
use sonata::synth::Synth;
use sonata::timeline::parser::parse_timeline;
use sonata::wav::write_wav_stereo;

const SAMPLE_RATE: u32 = 44100;
const CHUNK_FRAMES: usize = 4096;

const USAGE: &str = "Usage: render <input.txt> [output.wav]

Render a timeline transcription file to a stereo WAV file.

Arguments:
  input.txt     Path to transcription file (see timeline::parser for the format)
  output.wav    Output WAV file path (optional, defaults to <input>.wav)

Examples:
  render song.txt
  render song.txt output.wav
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() >= 3 {
        args[2].clone()
    } else if let Some(stem) = input_path.strip_suffix(".txt") {
        format!("{}.wav", stem)
    } else {
        format!("{}.wav", input_path)
    };

    let content = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let timeline = match parse_timeline(&content) {
        Ok(timeline) => timeline,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            process::exit(1);
        }
    };
    println!(
        "Parsed {} tracks at {} ticks/beat",
        timeline.tracks().len(),
        timeline.ticks_per_beat()
    );

    let synth = match Synth::new(SAMPLE_RATE) {
        Ok(synth) => synth,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    // Render until the timeline is exhausted and every decay tail has died.
    // Notes that are never released sustain forever, so the tail is capped.
    let max_tail_chunks = 30 * SAMPLE_RATE as usize / CHUNK_FRAMES;
    let mut replayer = Replayer::new(timeline, synth);
    let mut samples = Vec::new();
    let mut tail_chunks = 0;
    while !replayer.finished() || replayer.synth().generator_count() > 0 {
        samples.extend_from_slice(&replayer.generate(CHUNK_FRAMES));
        if replayer.finished() {
            tail_chunks += 1;
            if tail_chunks > max_tail_chunks {
                eprintln!("Warning: notes still sounding after 30s tail, truncating");
                break;
            }
        }
    }

    if let Err(e) = write_wav_stereo(&output_path, &samples, SAMPLE_RATE) {
        eprintln!("Error writing {}: {}", output_path, e);
        process::exit(1);
    }

    let seconds = samples.len() as f32 / 2.0 / SAMPLE_RATE as f32;
    println!("Wrote {:.2}s of audio to {}", seconds, output_path);
}
