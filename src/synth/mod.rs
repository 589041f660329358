//! Mixer and per-channel state
//!
//! The [`Synth`] owns every live generator and mixes them into an interleaved
//! stereo buffer. Generators are held in an arena keyed by stable
//! [`GeneratorId`]s; channels keep ids, never references, so the mixer stays
//! the sole owner and can reclaim dead generators after each mix pass.

pub mod channel;
pub mod program;

pub use channel::Channel;
pub use program::{midi_to_frequency, Program};

use std::collections::HashMap;

use thiserror::Error;

use crate::generator::Generator;

/// Errors raised when constructing a [`Synth`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SynthError {
    #[error("sample rate must be positive")]
    InvalidSampleRate,
}

/// Stable handle to a generator owned by the [`Synth`]
///
/// Ids are never reused; a lookup with a reclaimed id simply misses, which
/// callers treat as "already released and gone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorId(u64);

/// Polyphonic mixer owning the live generator set
pub struct Synth {
    sample_rate: u32,
    generators: HashMap<GeneratorId, Box<dyn Generator>>,
    next_id: u64,
}

impl std::fmt::Debug for Synth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synth")
            .field("sample_rate", &self.sample_rate)
            .field("generators", &self.generators.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Synth {
    /// Create a mixer at the given sample rate
    pub fn new(sample_rate: u32) -> Result<Self, SynthError> {
        if sample_rate == 0 {
            return Err(SynthError::InvalidSampleRate);
        }
        Ok(Self {
            sample_rate,
            generators: HashMap::new(),
            next_id: 0,
        })
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Add a generator to the live set and return its handle
    pub fn add_generator(&mut self, generator: Box<dyn Generator>) -> GeneratorId {
        let id = GeneratorId(self.next_id);
        self.next_id += 1;
        self.generators.insert(id, generator);
        id
    }

    /// Mix `out.len() / 2` stereo frames of every live generator into `out`
    ///
    /// The buffer is zero-filled first, then each generator sums into it.
    /// Generators that died during the pass are removed afterwards, never
    /// while the mix loop is running.
    pub fn render_into(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        for generator in self.generators.values_mut() {
            generator.render(out);
        }
        self.generators.retain(|_, generator| generator.is_alive());
    }

    /// Render `frames` stereo frames into a fresh interleaved buffer
    pub fn generate(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; frames * 2];
        self.render_into(&mut out);
        out
    }

    /// Begin release on a generator, if it still exists and has not released
    pub fn release(&mut self, id: GeneratorId) {
        if let Some(generator) = self.generators.get_mut(&id) {
            generator.release();
        }
    }

    /// Whether the generator has begun release
    ///
    /// A reclaimed (missing) id counts as released: the note is gone.
    pub fn is_released(&self, id: GeneratorId) -> bool {
        match self.generators.get(&id) {
            Some(generator) => generator.is_released(),
            None => true,
        }
    }

    /// Number of generators currently in the live set
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{AdsrEnvelope, ProbeGenerator};

    const SAMPLE_RATE: u32 = 1000;

    fn probe_note() -> Box<dyn Generator> {
        // 10ms attack/decay/release over a unit probe
        Box::new(AdsrEnvelope::new(
            Box::new(ProbeGenerator::new(1.0)),
            0.8,
            0.4,
            0.01,
            0.01,
            0.01,
            SAMPLE_RATE,
        ))
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        assert_eq!(Synth::new(0).unwrap_err(), SynthError::InvalidSampleRate);
    }

    #[test]
    fn test_empty_mix_is_silence() {
        let mut synth = Synth::new(SAMPLE_RATE).unwrap();
        let mut out = vec![0.7f32; 64];
        synth.render_into(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_generators_sum_into_buffer() {
        let mut synth = Synth::new(SAMPLE_RATE).unwrap();
        synth.add_generator(Box::new(ProbeGenerator::new(0.25)));
        synth.add_generator(Box::new(ProbeGenerator::new(0.5)));

        let out = synth.generate(16);
        assert!(out.iter().all(|&s| (s - 0.75).abs() < 1e-6));
    }

    #[test]
    fn test_dead_generators_are_reclaimed_once() {
        let mut synth = Synth::new(SAMPLE_RATE).unwrap();
        let id = synth.add_generator(probe_note());
        assert_eq!(synth.generator_count(), 1);

        synth.release(id);
        // 10ms release at 1kHz is 10 samples; render well past it
        synth.generate(64);
        assert_eq!(synth.generator_count(), 0);
        assert!(synth.is_released(id));

        // Rendering again with the generator gone stays silent
        let out = synth.generate(16);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_missing_id_counts_as_released() {
        let mut synth = Synth::new(SAMPLE_RATE).unwrap();
        let id = synth.add_generator(probe_note());
        synth.release(id);
        synth.generate(64);

        // Reclaimed: release is a no-op, is_released stays true
        synth.release(id);
        assert!(synth.is_released(id));
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut synth = Synth::new(SAMPLE_RATE).unwrap();
        let first = synth.add_generator(probe_note());
        synth.release(first);
        synth.generate(64);

        let second = synth.add_generator(probe_note());
        assert_ne!(first, second);
    }
}
