//! Audio decoding and small signal helpers.
//!
//! The [`AudioDecoder`] trait is the seam between the analysis pipeline and
//! whatever turns a file into samples. [`SymphoniaDecoder`] is the default
//! implementation and understands every container/codec symphonia probes.

use hound::{SampleFormat, WavSpec, WavWriter};
use ndarray::Array2;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

#[derive(Debug, Clone, Copy)]
pub struct AudioSpec {
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("hound error: {0}")]
    Hound(#[from] hound::Error),
    #[error("symphonia error: {0}")]
    Symphonia(SymphoniaError),
    #[error("no audio track found")]
    NoAudioTrack,
    #[error("unsupported number of channels")]
    UnsupportedChannels,
    #[error("resampling error: {0}")]
    Resample(String),
    #[error("decoded stream contains no samples")]
    NoSamples,
    #[error("decoded stream contains non-finite samples")]
    NonFiniteSamples,
}

impl From<SymphoniaError> for AudioError {
    fn from(err: SymphoniaError) -> Self {
        Self::Symphonia(err)
    }
}

/// Mono samples together with their sample rate.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Reject streams that decoded to nothing or to NaN/Inf samples.
    pub fn validate(&self) -> Result<(), AudioError> {
        if self.samples.is_empty() {
            return Err(AudioError::NoSamples);
        }
        if !self.samples.iter().all(|v| v.is_finite()) {
            return Err(AudioError::NonFiniteSamples);
        }
        Ok(())
    }
}

/// Turns an audio file into mono samples.
///
/// Implementations must report a path that is not a file as
/// [`AudioError::NotFound`] and every other failure through the remaining
/// variants, so callers can tell a missing file from a broken one. A file
/// that decodes to no samples, or to non-finite ones, is a broken file.
pub trait AudioDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio, AudioError>;
}

/// Symphonia-backed decoder with optional resampling to a fixed rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder {
    /// Resample to this rate after decoding (None keeps the file's rate).
    pub target_sr: Option<u32>,
}

impl SymphoniaDecoder {
    pub fn new(target_sr: Option<u32>) -> Self {
        Self { target_sr }
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedAudio, AudioError> {
        let (data, spec) = load_audio(path, self.target_sr, true)?;
        let audio = DecodedAudio {
            samples: data.row(0).to_vec(),
            sample_rate: spec.sample_rate,
        };
        audio.validate()?;
        Ok(audio)
    }
}

/// Load audio from a file.
///
/// # Arguments
/// * `path` - Path to the audio file
/// * `target_sr` - Resample to this rate (None keeps the file's rate)
/// * `mono` - Average all channels into one
///
/// # Returns
/// Tuple of (audio_data, audio_spec) where audio_data has shape (channels, frames)
///
/// # Errors
/// [`AudioError::NotFound`] when `path` is not a file; any other variant when
/// the file cannot be probed or decoded.
///
/// # Example
/// ```no_run
/// use drone_intervals::io;
///
/// let (data, spec) = io::load_audio("drone.wav", Some(22050), true).unwrap();
/// assert_eq!(data.shape()[0], 1);
/// assert_eq!(spec.sample_rate, 22050);
/// ```
pub fn load_audio<P: AsRef<Path>>(
    path: P,
    target_sr: Option<u32>,
    mono: bool,
) -> Result<(Array2<f32>, AudioSpec), AudioError> {
    let path_ref = path.as_ref();
    if !path_ref.is_file() {
        return Err(AudioError::NotFound {
            path: path_ref.to_path_buf(),
        });
    }

    let mut hint = Hint::new();
    if let Some(ext) = path_ref.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let file = std::fs::File::open(path_ref).map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => AudioError::NotFound {
            path: path_ref.to_path_buf(),
        },
        _ => AudioError::Io(err),
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.sample_rate.is_some())
        .ok_or(AudioError::NoAudioTrack)?
        .clone();

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(AudioError::NoAudioTrack)?;
    let channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(0);
    if channels == 0 {
        return Err(AudioError::UnsupportedChannels);
    }

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(SymphoniaError::IoError(_)) => break,
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track.id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(audio) => audio,
            Err(SymphoniaError::IoError(_)) => break,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("skipping undecodable packet: {msg}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let mut sb = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        sb.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sb.samples());
    }

    let frames = samples.len() / channels;
    if frames == 0 {
        return Err(AudioError::NoSamples);
    }
    let data = Array2::from_shape_fn((channels, frames), |(ch, frame)| {
        samples[frame * channels + ch]
    });
    let data = if mono { to_mono(&data) } else { data };
    log::debug!(
        "decoded {} frames at {} Hz ({} channel(s)) from {}",
        frames,
        sample_rate,
        channels,
        path_ref.display()
    );

    let mut spec = AudioSpec {
        sample_rate,
        channels: data.shape()[0] as u16,
    };
    if let Some(target) = target_sr
        && target != sample_rate
    {
        let resampled = resample(&data, sample_rate, target)?;
        spec.sample_rate = target;
        return Ok((resampled, spec));
    }

    Ok((data, spec))
}

/// Resample every channel of `data` from `src_sr` to `dst_sr`.
pub fn resample(data: &Array2<f32>, src_sr: u32, dst_sr: u32) -> Result<Array2<f32>, AudioError> {
    if src_sr == dst_sr {
        return Ok(data.clone());
    }
    if src_sr == 0 || dst_sr == 0 {
        return Err(AudioError::Resample(format!(
            "cannot resample between {src_sr} Hz and {dst_sr} Hz"
        )));
    }

    let (channels, frames) = data.dim();
    if channels == 0 || frames == 0 {
        return Ok(Array2::<f32>::zeros((channels, 0)));
    }

    let chunk_size = 1024usize;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = dst_sr as f64 / src_sr as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, channels)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    let mut output: Vec<Vec<f32>> = vec![Vec::new(); channels];
    let mut offset = 0usize;
    while offset < frames {
        let end = (offset + chunk_size).min(frames);
        let chunk: Vec<Vec<f32>> = data
            .rows()
            .into_iter()
            .map(|row| {
                let mut buf = vec![0.0f32; chunk_size];
                for (dst, &src) in buf.iter_mut().zip(row.iter().skip(offset).take(end - offset)) {
                    *dst = src;
                }
                buf
            })
            .collect();

        let chunk_out = resampler
            .process(&chunk, None)
            .map_err(|e| AudioError::Resample(e.to_string()))?;
        for (out, produced) in output.iter_mut().zip(chunk_out) {
            out.extend(produced);
        }
        offset = end;
    }

    let expected = ((frames as f64) * ratio).round() as usize;
    let out_frames = output
        .first()
        .map(|v| v.len().min(expected))
        .unwrap_or(0);
    log::debug!("resampled {frames} frames at {src_sr} Hz to {out_frames} frames at {dst_sr} Hz");
    Ok(Array2::from_shape_fn((channels, out_frames), |(ch, i)| {
        output[ch][i]
    }))
}

/// Convert multi-channel audio to mono by averaging channels.
pub fn to_mono(data: &Array2<f32>) -> Array2<f32> {
    let (channels, frames) = data.dim();
    if channels <= 1 {
        return data.clone();
    }
    let mono = data.sum_axis(ndarray::Axis(0)) / channels as f32;
    mono.into_shape_with_order((1, frames))
        .unwrap_or_else(|_| Array2::zeros((1, frames)))
}

/// Generate a pure tone.
pub fn tone(frequency: f32, sr: u32, duration: f32) -> Vec<f32> {
    let n_samples = (duration * sr as f32) as usize;
    let angular_freq = 2.0 * std::f32::consts::PI * frequency / sr as f32;
    (0..n_samples)
        .map(|i| (angular_freq * i as f32).sin())
        .collect()
}

/// Save mono samples to a 16-bit PCM WAV file.
///
/// Samples are clipped to [-1.0, 1.0] before quantisation.
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        let s = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}
