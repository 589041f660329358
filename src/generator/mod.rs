pub mod adsr;
pub mod osc;
pub mod probe;

pub use adsr::AdsrEnvelope;
pub use osc::{SineOsc, SquareOsc};
pub use probe::ProbeGenerator;

/// Core trait for all signal generators
///
/// A generator produces an interleaved stereo signal as a lazy function of its
/// internal sample clock. Generators compose: an envelope shaper wraps another
/// generator and scales its output.
pub trait Generator {
    /// Mix `out.len() / 2` stereo frames into `out` and advance the internal
    /// clock by that many samples.
    ///
    /// Output is additive: callers zero the buffer once and let every live
    /// generator sum into it. A dead generator must leave the buffer untouched.
    fn render(&mut self, out: &mut [f32]);

    /// Whether this generator can still produce output
    ///
    /// Once false, the mixer reclaims the generator on its next pass and it
    /// must never be rendered again.
    fn is_alive(&self) -> bool;

    /// Begin the release phase, if the generator has one
    ///
    /// Idempotent: calling it again after release has begun has no effect.
    /// Plain oscillators have no envelope and ignore this.
    fn release(&mut self);

    /// Whether release has begun (or the generator never releases)
    fn is_released(&self) -> bool;
}
