//! Per-MIDI-channel note state
//!
//! A channel maps sounding pitches to generator ids and carries the currently
//! selected program. It never owns generators: the [`Synth`] does, and a
//! reclaimed id is simply treated as an already-released note.

use std::collections::HashMap;

use tracing::debug;

use super::program::{self, Program};
use super::{GeneratorId, Synth};

/// State for one of the 16 MIDI channels
pub struct Channel {
    /// At most one sounding generator per pitch
    notes: HashMap<u8, GeneratorId>,
    program: &'static dyn Program,
}

impl Channel {
    pub fn new() -> Self {
        Self {
            notes: HashMap::new(),
            program: &program::PIANO,
        }
    }

    /// Start a note, force-releasing any unreleased occupant of the pitch
    ///
    /// Retriggering a sounding pitch is a hard cut: the old generator goes
    /// into release and the new one starts a fresh envelope from zero.
    pub fn note_on(&mut self, synth: &mut Synth, pitch: u8, velocity: u8) {
        if let Some(&occupant) = self.notes.get(&pitch) {
            if !synth.is_released(occupant) {
                synth.release(occupant);
            }
        }
        let generator = self
            .program
            .create_note(pitch, velocity, synth.sample_rate());
        let id = synth.add_generator(generator);
        self.notes.insert(pitch, id);
    }

    /// Release the note at `pitch`; a stray note-off is silently ignored
    pub fn note_off(&mut self, synth: &mut Synth, pitch: u8, _velocity: u8) {
        if let Some(&occupant) = self.notes.get(&pitch) {
            if !synth.is_released(occupant) {
                synth.release(occupant);
            }
        }
    }

    /// Select the program for subsequent notes
    ///
    /// Unknown numbers fall back to the default instrument, never an error.
    pub fn set_program(&mut self, program_number: u8) {
        self.program = program::lookup(program_number);
        debug!(
            program = program_number,
            instrument = self.program.name(),
            "program change"
        );
    }

    /// Name of the currently selected program
    pub fn program_name(&self) -> &'static str {
        self.program.name()
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::new()
    }
}
