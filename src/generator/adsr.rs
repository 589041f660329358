//! ADSR envelope shaper
//!
//! Wraps a child generator and applies a four-phase amplitude contour:
//! attack ramps 0 to the attack amplitude, decay ramps down to the sustain
//! amplitude, sustain holds until [`AdsrEnvelope::release`] is called, release
//! ramps to 0. Once the release ramp runs out the envelope is dead and emits
//! nothing further, not even silence.
//!
//! A single render call may span several phases; each sub-range uses its own
//! amplitude formula so the contour stays continuous at every boundary.

use super::Generator;

/// ADSR amplitude shaper around a child generator
///
/// The child is advanced by exactly the rendered frame count on every call,
/// producing the raw signal that the shaper scales per-sample and adds into
/// the destination buffer.
pub struct AdsrEnvelope {
    child: Box<dyn Generator>,
    attack_amplitude: f32,
    sustain_amplitude: f32,
    /// Sample index where attack ends
    attack_end: u64,
    /// Sample index where decay ends
    decay_end: u64,
    /// Amplitude lost per sample during decay
    decay_rate: f32,
    /// Amplitude lost per sample during release
    release_rate: f32,
    /// Release ramp length in samples
    release_samples: u64,
    /// Sample index at which release was requested, once known
    release_start: Option<u64>,
    /// Sample index where the release ramp ends; meaningful once released
    release_end: u64,
    alive: bool,
    /// Sample clock since note-on
    t: u64,
}

impl AdsrEnvelope {
    /// Create an envelope around `child`
    ///
    /// # Arguments
    /// * `child` - Generator producing the raw signal
    /// * `attack_amplitude` - Peak amplitude reached at the end of attack
    /// * `sustain_amplitude` - Amplitude held after decay
    /// * `attack_secs` - Attack duration in seconds
    /// * `decay_secs` - Decay duration in seconds (after attack)
    /// * `release_secs` - Release duration in seconds (after note-off)
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(
        child: Box<dyn Generator>,
        attack_amplitude: f32,
        sustain_amplitude: f32,
        attack_secs: f32,
        decay_secs: f32,
        release_secs: f32,
        sample_rate: u32,
    ) -> Self {
        let attack_end = (sample_rate as f32 * attack_secs) as u64;
        let decay_end = (sample_rate as f32 * (attack_secs + decay_secs)) as u64;
        let decay_rate = if decay_end > attack_end {
            (attack_amplitude - sustain_amplitude) / (decay_end - attack_end) as f32
        } else {
            0.0
        };
        let release_samples = ((sample_rate as f32 * release_secs) as u64).max(1);

        Self {
            child,
            attack_amplitude,
            sustain_amplitude,
            attack_end,
            decay_end,
            decay_rate,
            release_rate: sustain_amplitude / release_samples as f32,
            release_samples,
            release_start: None,
            release_end: 0,
            alive: true,
            t: 0,
        }
    }
}

impl Generator for AdsrEnvelope {
    fn render(&mut self, out: &mut [f32]) {
        if !self.alive {
            return;
        }

        // Raw child signal; the child always advances by the full frame count.
        let mut raw = vec![0.0f32; out.len()];
        self.child.render(&mut raw);

        let frames = out.len() / 2;
        let mut i = 0;
        while i < frames {
            if let Some(release_start) = self.release_start {
                if self.t >= self.release_end {
                    self.alive = false;
                    return;
                }
                while i < frames && self.t < self.release_end {
                    let amplitude = self.sustain_amplitude
                        - self.release_rate * (self.t - release_start) as f32;
                    out[2 * i] += raw[2 * i] * amplitude;
                    out[2 * i + 1] += raw[2 * i + 1] * amplitude;
                    self.t += 1;
                    i += 1;
                }
            } else if self.t < self.attack_end {
                while i < frames && self.t < self.attack_end {
                    let amplitude = self.attack_amplitude * self.t as f32 / self.attack_end as f32;
                    out[2 * i] += raw[2 * i] * amplitude;
                    out[2 * i + 1] += raw[2 * i + 1] * amplitude;
                    self.t += 1;
                    i += 1;
                }
            } else if self.t < self.decay_end {
                while i < frames && self.t < self.decay_end {
                    let amplitude =
                        self.attack_amplitude - self.decay_rate * (self.t - self.attack_end) as f32;
                    out[2 * i] += raw[2 * i] * amplitude;
                    out[2 * i + 1] += raw[2 * i + 1] * amplitude;
                    self.t += 1;
                    i += 1;
                }
            } else {
                while i < frames {
                    out[2 * i] += raw[2 * i] * self.sustain_amplitude;
                    out[2 * i + 1] += raw[2 * i + 1] * self.sustain_amplitude;
                    self.t += 1;
                    i += 1;
                }
            }
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    /// Begin the release ramp at the current sample
    ///
    /// The ramp always starts from the sustain amplitude, even when release is
    /// requested mid-attack. That hard cut is the intended note-steal policy.
    fn release(&mut self) {
        if self.release_start.is_some() {
            return;
        }
        self.release_start = Some(self.t);
        self.release_end = self.t + self.release_samples;
    }

    fn is_released(&self) -> bool {
        self.release_start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{ProbeGenerator, SineOsc};

    const SAMPLE_RATE: u32 = 1000;

    /// Envelope over a unit probe: output equals the amplitude contour.
    /// 100 samples attack to 0.8, 100 samples decay to 0.4, 100 samples release.
    fn probe_envelope() -> AdsrEnvelope {
        AdsrEnvelope::new(
            Box::new(ProbeGenerator::new(1.0)),
            0.8,
            0.4,
            0.1,
            0.1,
            0.1,
            SAMPLE_RATE,
        )
    }

    fn render_frames(env: &mut AdsrEnvelope, count: usize) -> Vec<f32> {
        let mut buffer = vec![0.0f32; count * 2];
        env.render(&mut buffer);
        buffer
    }

    #[test]
    fn test_attack_ramps_from_zero() {
        let mut env = probe_envelope();
        let buffer = render_frames(&mut env, 100);

        assert_eq!(buffer[0], 0.0);
        // t = 50: halfway up the attack
        assert!((buffer[2 * 50] - 0.4).abs() < 1e-6);
        // t = 99: one step below the peak
        assert!((buffer[2 * 99] - 0.8 * 99.0 / 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_continuity_at_phase_boundaries() {
        let mut env = probe_envelope();
        let buffer = render_frames(&mut env, 250);

        // Attack formula one sample before the boundary, decay formula on it
        let last_attack = buffer[2 * 99];
        let first_decay = buffer[2 * 100];
        assert!((first_decay - 0.8).abs() < 1e-6);
        assert!((first_decay - last_attack).abs() < 0.8 / 100.0 + 1e-6);

        // Decay meets sustain exactly
        let first_sustain = buffer[2 * 200];
        assert!((first_sustain - 0.4).abs() < 1e-6);
        let last_decay = buffer[2 * 199];
        assert!((last_decay - first_sustain).abs() < 0.4 / 100.0 + 1e-6);
    }

    #[test]
    fn test_single_call_equals_split_calls_across_boundary() {
        // One render spanning attack->decay->sustain...
        let mut whole = probe_envelope();
        let expected = render_frames(&mut whole, 250);

        // ...must match renders split at arbitrary points
        let mut split = probe_envelope();
        let mut actual = render_frames(&mut split, 73);
        actual.extend(render_frames(&mut split, 101));
        actual.extend(render_frames(&mut split, 76));

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_release_ramp_and_exact_death() {
        let mut env = probe_envelope();
        // Into sustain
        render_frames(&mut env, 250);

        env.release();
        assert!(env.is_released());
        assert!(env.is_alive());

        let buffer = render_frames(&mut env, 100);
        // Release starts at the sustain amplitude and ramps down
        assert!((buffer[0] - 0.4).abs() < 1e-6);
        assert!((buffer[2 * 50] - 0.2).abs() < 1e-6);
        assert!((buffer[2 * 99] - 0.4 / 100.0).abs() < 1e-6);

        // The ramp is exhausted: the next render flips dead and emits nothing
        let mut tail = vec![7.0f32; 8];
        env.render(&mut tail);
        assert!(!env.is_alive());
        assert!(tail.iter().all(|&s| s == 7.0));

        // And stays silent afterwards
        env.render(&mut tail);
        assert!(tail.iter().all(|&s| s == 7.0));
    }

    #[test]
    fn test_death_within_a_single_oversized_call() {
        let mut env = probe_envelope();
        render_frames(&mut env, 250);
        env.release();

        // 150 frames requested but only 100 remain before death
        let buffer = render_frames(&mut env, 150);
        assert!(!env.is_alive());
        assert!((buffer[0] - 0.4).abs() < 1e-6);
        // Frames past the release end stay untouched
        assert_eq!(buffer[2 * 100], 0.0);
        assert_eq!(buffer[2 * 149], 0.0);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut env = probe_envelope();
        render_frames(&mut env, 250);

        env.release();
        render_frames(&mut env, 50);
        // A second release mid-ramp must not restart the ramp
        env.release();

        let buffer = render_frames(&mut env, 10);
        assert!((buffer[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_release_during_attack_hard_cuts_to_sustain_level() {
        // Intentional policy: the release ramp starts at the sustain
        // amplitude even when the attack never got there.
        let mut env = probe_envelope();
        render_frames(&mut env, 30);

        env.release();
        let buffer = render_frames(&mut env, 10);
        assert!((buffer[0] - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_output_is_additive() {
        let mut env = probe_envelope();
        render_frames(&mut env, 200);

        // Sustain at 0.4 over a pre-filled buffer
        let mut buffer = vec![1.0f32; 20];
        env.render(&mut buffer);
        assert!(buffer.iter().all(|&s| (s - 1.4).abs() < 1e-6));
    }

    #[test]
    fn test_child_clock_continues_across_calls() {
        // A sine child must keep its phase across split renders, proving the
        // child advances by exactly the frame count each call.
        let make = || {
            AdsrEnvelope::new(
                Box::new(SineOsc::new(50.0, SAMPLE_RATE)),
                0.8,
                0.4,
                0.1,
                0.1,
                0.1,
                SAMPLE_RATE,
            )
        };

        let mut whole = make();
        let expected = render_frames(&mut whole, 240);

        let mut split = make();
        let mut actual = render_frames(&mut split, 120);
        actual.extend(render_frames(&mut split, 120));

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_zero_attack_skips_straight_to_decay() {
        let mut env = AdsrEnvelope::new(
            Box::new(ProbeGenerator::new(1.0)),
            0.8,
            0.4,
            0.0,
            0.1,
            0.1,
            SAMPLE_RATE,
        );
        let buffer = render_frames(&mut env, 10);
        // First sample already at the attack amplitude
        assert!((buffer[0] - 0.8).abs() < 1e-6);
    }
}
