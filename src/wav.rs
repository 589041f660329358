//! WAV file writer utility
//!
//! Thin wrapper over `hound` for writing the replayer's interleaved stereo
//! output as 16-bit PCM. Samples are clamped to [-1.0, 1.0] here; the synth
//! core itself emits unclamped amplitudes.

use std::path::Path;

/// Write interleaved stereo f32 samples as a 16-bit PCM WAV file
///
/// # Arguments
/// * `path` - Output file path
/// * `samples` - Interleaved stereo samples (L, R, L, R, ...)
/// * `sample_rate` - Sample rate in Hz
pub fn write_wav_stereo(
    path: impl AsRef<Path>,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_file_has_expected_format() {
        let path = std::env::temp_dir().join("sonata_test_format.wav");
        let samples = vec![0.0f32; 200];
        write_wav_stereo(&path, &samples, 44100).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 200);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let path = std::env::temp_dir().join("sonata_test_clamp.wav");
        write_wav_stereo(&path, &[2.0, -2.0, 1.0, -1.0], 44100).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples[0], i16::MAX);
        assert_eq!(samples[1], -i16::MAX);
        assert_eq!(samples[2], i16::MAX);
        assert_eq!(samples[3], -i16::MAX);

        std::fs::remove_file(&path).unwrap();
    }
}
