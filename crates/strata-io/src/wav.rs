//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use strata_core::{Buffer, DEFAULT_SAMPLE_RATE};

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = reader.len() as u64;
    let num_frames = total_samples / spec.channels.max(1) as u64;
    let duration_secs = num_frames as f64 / spec.sample_rate as f64;

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
///
/// 32-bit files are written as IEEE float, narrower ones as PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self::mono(DEFAULT_SAMPLE_RATE, 16)
    }
}

impl WavSpec {
    /// Mono spec at the given rate and depth.
    pub fn mono(sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample,
        }
    }

    fn check(self) -> Result<()> {
        match self.bits_per_sample {
            16 | 24 | 32 => Ok(()),
            bits => Err(Error::UnsupportedBitDepth(bits)),
        }
    }

    /// Positive full-scale integer value for PCM output.
    fn full_scale(self) -> f32 {
        ((1i64 << (self.bits_per_sample.clamp(1, 32) - 1)) - 1) as f32
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Read a WAV file and return samples as f32 along with the spec.
///
/// Multi-channel files are mixed down to mono by averaging channels.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels.max(1) as usize;

    let samples: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = spec.full_scale();
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let mono_samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono_samples, spec))
}

/// Write mono samples to a WAV file.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let mut sink = WavSink::create(path, spec)?;
    sink.write_samples(samples)?;
    sink.finalize()
}

/// Streaming WAV writer fed one engine buffer at a time.
pub struct WavSink {
    writer: WavWriter<BufWriter<File>>,
    spec: WavSpec,
    frames: u64,
    clipped: u64,
}

impl WavSink {
    /// Create (or truncate) `path` and write the header.
    pub fn create<P: AsRef<Path>>(path: P, spec: WavSpec) -> Result<Self> {
        spec.check()?;
        let writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
        Ok(Self {
            writer,
            spec,
            frames: 0,
            clipped: 0,
        })
    }

    /// The spec this sink writes.
    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    /// Frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Integer samples that were clamped to full scale.
    pub fn clipped(&self) -> u64 {
        self.clipped
    }

    /// Append one rendered buffer, duplicated across all channels.
    pub fn write_buffer(&mut self, buffer: &Buffer) -> Result<()> {
        self.write_samples(buffer)
    }

    /// Append mono samples, duplicated across all channels.
    pub fn write_samples(&mut self, samples: &[f32]) -> Result<()> {
        let channels = self.spec.channels.max(1);
        if self.spec.bits_per_sample == 32 {
            for &sample in samples {
                for _ in 0..channels {
                    self.writer.write_sample(sample)?;
                }
            }
        } else {
            let max_val = self.spec.full_scale();
            for &sample in samples {
                if !(-1.0..=1.0).contains(&sample) {
                    self.clipped += 1;
                }
                let int_sample = (sample.clamp(-1.0, 1.0) * max_val) as i32;
                for _ in 0..channels {
                    self.writer.write_sample(int_sample)?;
                }
            }
        }
        self.frames += samples.len() as u64;
        Ok(())
    }

    /// Patch the header lengths and close the file.
    pub fn finalize(self) -> Result<()> {
        if self.clipped > 0 {
            tracing::warn!(
                clipped = self.clipped,
                frames = self.frames,
                "samples clamped to full scale"
            );
        }
        self.writer.finalize()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::BUFFER_SAMPLES;
    use tempfile::NamedTempFile;

    fn ramp(len: usize, scale: f32) -> Vec<f32> {
        (0..len).map(|i| (i as f32 / len as f32) * 2.0 * scale - scale).collect()
    }

    #[test]
    fn test_roundtrip_f32() {
        let samples = ramp(1000, 1.0);
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, WavSpec::mono(48000, 32)).unwrap();

        let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
        assert_eq!(loaded_spec.sample_rate, 48000);
        assert_eq!(loaded, samples);
    }

    #[test]
    fn test_roundtrip_i16() {
        let samples = ramp(1000, 0.9);
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &samples, WavSpec::default()).unwrap();

        let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
        assert_eq!(loaded_spec.sample_rate, 44100);
        assert_eq!(loaded.len(), samples.len());

        // 16-bit has less precision
        for (a, b) in samples.iter().zip(loaded.iter()) {
            assert!((a - b).abs() < 0.001);
        }
    }

    #[test]
    fn test_i16_clamps_and_scales_by_32767() {
        let file = NamedTempFile::new().unwrap();
        let mut sink = WavSink::create(file.path(), WavSpec::default()).unwrap();
        sink.write_samples(&[1.0, -1.0, 2.5, -3.0, 0.5]).unwrap();
        assert_eq!(sink.clipped(), 2);
        sink.finalize().unwrap();

        let raw: Vec<i16> = WavReader::open(file.path())
            .unwrap()
            .into_samples::<i16>()
            .map(|s| s.unwrap())
            .collect();
        assert_eq!(raw, vec![32767, -32767, 32767, -32767, 16383]);
    }

    #[test]
    fn test_sink_counts_buffers() {
        let file = NamedTempFile::new().unwrap();
        let mut sink = WavSink::create(file.path(), WavSpec::mono(44100, 32)).unwrap();
        let buffer = [0.25; BUFFER_SAMPLES];
        for _ in 0..3 {
            sink.write_buffer(&buffer).unwrap();
        }
        assert_eq!(sink.frames(), 3 * BUFFER_SAMPLES as u64);
        sink.finalize().unwrap();

        let info = read_wav_info(file.path()).unwrap();
        assert_eq!(info.num_frames, 3 * BUFFER_SAMPLES as u64);
        assert_eq!(info.format, WavFormat::IeeeFloat);
        assert_eq!(info.channels, 1);
    }

    #[test]
    fn test_stereo_sink_duplicates_and_reads_back_mono() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
        };
        write_wav(file.path(), &[0.1, 0.2, 0.3], spec).unwrap();

        let info = read_wav_info(file.path()).unwrap();
        assert_eq!(info.num_frames, 3);
        let (mono, _) = read_wav(file.path()).unwrap();
        assert_eq!(mono, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_unsupported_bit_depth() {
        let file = NamedTempFile::new().unwrap();
        let result = WavSink::create(file.path(), WavSpec::mono(44100, 8));
        assert!(matches!(result, Err(Error::UnsupportedBitDepth(8))));
    }

    #[test]
    fn test_info_duration() {
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &vec![0.0; 22050], WavSpec::default()).unwrap();
        let info = read_wav_info(file.path()).unwrap();
        assert_eq!(info.format, WavFormat::Pcm);
        assert_eq!(info.bits_per_sample, 16);
        assert!((info.duration_secs - 0.5).abs() < 1e-9);
    }
}
