//! Instrument programs
//!
//! A program knows how to build the generator graph for one note. The table
//! mirrors the General MIDI split the synth supports: the string section
//! (programs 41-50, minus 48) plays [`Strings`], everything else falls back
//! to [`Piano`]. Unknown program numbers are never an error.

use crate::generator::{AdsrEnvelope, Generator, SineOsc};

/// Frequency in Hz for a MIDI pitch, with pitch 69 (A4) at 440 Hz
pub fn midi_to_frequency(pitch: u8) -> f32 {
    440.0 * 2f32.powf((pitch as f32 - 69.0) / 12.0)
}

/// An instrument definition: builds the generator graph for one note
pub trait Program {
    /// Construct a fresh note generator
    ///
    /// # Arguments
    /// * `pitch` - MIDI pitch (0-127)
    /// * `velocity` - MIDI velocity (0-127), scales the envelope amplitudes
    /// * `sample_rate` - Sample rate in Hz
    fn create_note(&self, pitch: u8, velocity: u8, sample_rate: u32) -> Box<dyn Generator>;

    /// Short instrument name for logging
    fn name(&self) -> &'static str;
}

/// Default instrument: short percussive sine envelope
pub struct Piano;

/// Sustained string section: slow attack and long release
pub struct Strings;

pub static PIANO: Piano = Piano;
pub static STRINGS: Strings = Strings;

impl Program for Piano {
    fn create_note(&self, pitch: u8, velocity: u8, sample_rate: u32) -> Box<dyn Generator> {
        let osc = SineOsc::new(midi_to_frequency(pitch), sample_rate);
        let gain = velocity as f32 / 128.0;
        Box::new(AdsrEnvelope::new(
            Box::new(osc),
            0.2 * gain,
            0.1 * gain,
            0.02,
            0.3,
            0.02,
            sample_rate,
        ))
    }

    fn name(&self) -> &'static str {
        "piano"
    }
}

impl Program for Strings {
    fn create_note(&self, pitch: u8, velocity: u8, sample_rate: u32) -> Box<dyn Generator> {
        let osc = SineOsc::new(midi_to_frequency(pitch), sample_rate);
        let gain = velocity as f32 / 128.0;
        Box::new(AdsrEnvelope::new(
            Box::new(osc),
            0.5 * gain,
            0.2 * gain,
            0.4,
            0.8,
            0.4,
            sample_rate,
        ))
    }

    fn name(&self) -> &'static str {
        "strings"
    }
}

/// Look up the program for a MIDI program number
///
/// Unknown numbers fall back to [`Piano`]. Program 48 is deliberately absent
/// from the strings range.
pub fn lookup(program_number: u8) -> &'static dyn Program {
    match program_number {
        41..=47 | 49 | 50 => &STRINGS,
        _ => &PIANO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pitch_is_440() {
        assert_eq!(midi_to_frequency(69), 440.0);
    }

    #[test]
    fn test_octaves_double_frequency() {
        assert!((midi_to_frequency(81) - 880.0).abs() < 1e-3);
        assert!((midi_to_frequency(57) - 220.0).abs() < 1e-3);
        // Middle C
        assert!((midi_to_frequency(60) - 261.626).abs() < 0.01);
    }

    #[test]
    fn test_program_table_ranges() {
        assert_eq!(lookup(0).name(), "piano");
        assert_eq!(lookup(40).name(), "piano");
        assert_eq!(lookup(41).name(), "strings");
        assert_eq!(lookup(47).name(), "strings");
        // 48 sits inside the GM string range but is not in the table
        assert_eq!(lookup(48).name(), "piano");
        assert_eq!(lookup(49).name(), "strings");
        assert_eq!(lookup(50).name(), "strings");
        assert_eq!(lookup(51).name(), "piano");
        assert_eq!(lookup(127).name(), "piano");
    }

    #[test]
    fn test_created_note_is_live_and_unreleased() {
        let note = lookup(0).create_note(69, 100, 44100);
        assert!(note.is_alive());
        assert!(!note.is_released());
    }

    #[test]
    fn test_velocity_scales_amplitude() {
        let mut loud = lookup(0).create_note(69, 127, 1000);
        let mut quiet = lookup(0).create_note(69, 32, 1000);

        // Render into sustain and compare energy
        let mut loud_buf = vec![0.0f32; 2000];
        let mut quiet_buf = vec![0.0f32; 2000];
        loud.render(&mut loud_buf);
        quiet.render(&mut quiet_buf);

        let energy = |buf: &[f32]| buf.iter().map(|s| s.abs()).sum::<f32>();
        assert!(energy(&loud_buf) > energy(&quiet_buf) * 2.0);
    }
}
