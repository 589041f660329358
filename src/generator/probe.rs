use super::Generator;

/// A constant-amplitude probe generator
///
/// Emits the same value into both channels forever. Wrapping it in an envelope
/// shaper makes the shaper's amplitude contour directly observable, which is
/// what the envelope tests and the `plot-envelope` tool use it for.
pub struct ProbeGenerator {
    level: f32,
    t: u64,
}

impl ProbeGenerator {
    /// Create a probe emitting `level` on every sample
    pub fn new(level: f32) -> Self {
        Self { level, t: 0 }
    }

    /// Samples rendered so far
    pub fn position(&self) -> u64 {
        self.t
    }
}

impl Generator for ProbeGenerator {
    fn render(&mut self, out: &mut [f32]) {
        for frame in out.chunks_exact_mut(2) {
            frame[0] += self.level;
            frame[1] += self.level;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_constant_output() {
        let mut probe = ProbeGenerator::new(0.25);
        let mut buffer = vec![0.0f32; 16];
        probe.render(&mut buffer);

        assert!(buffer.iter().all(|&s| s == 0.25));
        assert_eq!(probe.position(), 8);
    }

    #[test]
    fn test_probe_adds_into_buffer() {
        let mut probe = ProbeGenerator::new(1.0);
        let mut buffer = vec![0.5f32; 4];
        probe.render(&mut buffer);

        assert!(buffer.iter().all(|&s| s == 1.5));
    }
}
