//! Basic oscillators
//!
//! Both oscillators produce a mono signal duplicated into the left and right
//! channels. They run forever: lifetime is managed by the envelope shaper that
//! wraps them, not by the oscillator itself.
//!
//! A frequency of zero or below is undefined behavior guarded at the caller
//! (MIDI pitch validity), not checked here.

use super::Generator;

/// Sine wave oscillator
///
/// `sample = sin(2π · t / period)` with `period = sample_rate / frequency`.
pub struct SineOsc {
    /// Period in samples
    period: f64,
    /// Sample clock
    t: u64,
}

impl SineOsc {
    /// Create a sine oscillator at `frequency` Hz
    pub fn new(frequency: f32, sample_rate: u32) -> Self {
        Self {
            period: sample_rate as f64 / frequency as f64,
            t: 0,
        }
    }
}

impl Generator for SineOsc {
    fn render(&mut self, out: &mut [f32]) {
        for frame in out.chunks_exact_mut(2) {
            // Reduce the phase before taking the sine so long notes do not
            // lose precision as t grows.
            let cycles = (self.t as f64 / self.period).fract();
            let sample = (cycles * std::f64::consts::TAU).sin() as f32;
            frame[0] += sample;
            frame[1] += sample;
            self.t += 1;
        }
    }

    fn is_alive(&self) -> bool {
        true
    }

    fn release(&mut self) {}

    fn is_released(&self) -> bool {
        false
    }
}

/// Square wave oscillator
///
/// `sample = +1` while the fractional phase exceeds `phase_offset`, else `-1`.
/// A `phase_offset` of 0.5 gives the usual 50% duty cycle.
pub struct SquareOsc {
    period: f64,
    phase_offset: f64,
    t: u64,
}

impl SquareOsc {
    /// Create a square oscillator at `frequency` Hz with the given duty phase
    pub fn new(frequency: f32, phase_offset: f32, sample_rate: u32) -> Self {
        Self {
            period: sample_rate as f64 / frequency as f64,
            phase_offset: phase_offset as f64,
            t: 0,
        }
    }
}

impl Generator for SquareOsc {
    fn render(&mut self, out: &mut [f32]) {
        for frame in out.chunks_exact_mut(2) {
            let cycles = (self.t as f64 / self.period).fract();
            let sample = if cycles > self.phase_offset { 1.0 } else { -1.0 };
            frame[0] += sample;
            frame[1] += sample;
            self.t += 1;
        }
    }

    fn is_alive(&self) -> bool {
        true
    }

    fn release(&mut self) {}

    fn is_released(&self) -> bool {
        false
    }
}
