//! Sonata: a software synthesizer for decoded MIDI-like event timelines.
//!
//! The crate turns an already-decoded timeline (per-track tick-delta events)
//! into interleaved stereo PCM samples:
//! - [`generator`]: composable signal generators (oscillators, ADSR shaping)
//! - [`synth`]: the mixer that owns live generators, plus channels and programs
//! - [`timeline`]: the event data model and a debug text format for it
//! - [`replayer`]: the scheduler that merges tracks and drives the mixer
//! - [`wav`]: WAV output for the CLI tools
//!
//! Parsing of the MIDI container format and audio device output are external
//! concerns; the replayer consumes a validated [`timeline::Timeline`] and is
//! pulled for samples by the caller.

pub mod generator;
pub mod replayer;
pub mod synth;
pub mod timeline;
pub mod wav;
