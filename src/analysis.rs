//! The end-to-end pipeline: decode, track pitch, find the drone, label
//! every frame relative to it.

use std::fmt;
use std::path::Path;

use crate::convert;
use crate::drone::{self, DEFAULT_DRONE_WINDOW_SECS};
use crate::interval::{self, RelativeInterval};
use crate::io::{AudioDecoder, SymphoniaDecoder};
use crate::pitch::{DEFAULT_POWER_THRESHOLD, McLeodPitchSource, PitchSource, PitchTrack};

/// Configuration for drone-relative interval analysis.
///
/// # Example
/// ```
/// use drone_intervals::AnalysisConfig;
///
/// let config = AnalysisConfig::default()
///     .with_note_range("A1", "A5")
///     .unwrap()
///     .with_drone_window_secs(3.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Resample decoded audio to this rate (None keeps the file's rate)
    pub sample_rate: Option<u32>,
    /// Length of analysis frames in samples
    pub frame_length: usize,
    /// Number of samples between frames
    pub hop_length: usize,
    /// Lowest frequency to track in Hz
    pub fmin: f32,
    /// Highest frequency to track in Hz
    pub fmax: f32,
    /// Length of the opening window the drone is estimated from
    pub drone_window_secs: f32,
    /// Mean power per sample below which a frame is unvoiced
    pub power_threshold: f32,
    /// Minimum clarity for a frame to count as voiced
    pub clarity_threshold: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: Some(22050),
            frame_length: 2048,
            hop_length: 512,
            // C2 and C7
            fmin: convert::midi_to_hz(36),
            fmax: convert::midi_to_hz(96),
            drone_window_secs: DEFAULT_DRONE_WINDOW_SECS,
            power_threshold: DEFAULT_POWER_THRESHOLD,
            clarity_threshold: 0.6,
        }
    }
}

impl AnalysisConfig {
    pub fn with_sample_rate(mut self, sample_rate: Option<u32>) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_frame_length(mut self, frame_length: usize) -> Self {
        self.frame_length = frame_length;
        self
    }

    pub fn with_hop_length(mut self, hop_length: usize) -> Self {
        self.hop_length = hop_length;
        self
    }

    pub fn with_fmin(mut self, fmin: f32) -> Self {
        self.fmin = fmin;
        self
    }

    pub fn with_fmax(mut self, fmax: f32) -> Self {
        self.fmax = fmax;
        self
    }

    /// Set the tracked range from note names such as `"C2"` and `"C7"`.
    pub fn with_note_range(mut self, low: &str, high: &str) -> crate::Result<Self> {
        self.fmin = note_hz("low", low)?;
        self.fmax = note_hz("high", high)?;
        Ok(self)
    }

    pub fn with_drone_window_secs(mut self, seconds: f32) -> Self {
        self.drone_window_secs = seconds;
        self
    }

    pub fn with_power_threshold(mut self, power_threshold: f32) -> Self {
        self.power_threshold = power_threshold;
        self
    }

    pub fn with_clarity_threshold(mut self, clarity_threshold: f32) -> Self {
        self.clarity_threshold = clarity_threshold;
        self
    }

    /// Check every parameter for a usable value.
    pub fn validate(&self) -> crate::Result<()> {
        if self.sample_rate == Some(0) {
            return Err(crate::Error::InvalidSize {
                name: "sample_rate",
                value: 0,
                reason: "must be > 0",
            });
        }
        if self.frame_length == 0 {
            return Err(crate::Error::InvalidSize {
                name: "frame_length",
                value: 0,
                reason: "must be > 0",
            });
        }
        if self.hop_length == 0 {
            return Err(crate::Error::InvalidSize {
                name: "hop_length",
                value: 0,
                reason: "must be > 0",
            });
        }
        convert::check_frequency("fmin", self.fmin)?;
        convert::check_frequency("fmax", self.fmax)?;
        if self.fmin >= self.fmax {
            return Err(crate::Error::InvalidFrequencyRange {
                fmin: self.fmin,
                fmax: self.fmax,
                reason: "fmin must be below fmax".to_string(),
            });
        }
        if !(self.drone_window_secs > 0.0 && self.drone_window_secs.is_finite()) {
            return Err(crate::Error::InvalidParameter {
                name: "drone_window_secs",
                value: self.drone_window_secs.to_string(),
                reason: "must be a positive number of seconds".to_string(),
            });
        }
        if !(self.power_threshold >= 0.0 && self.power_threshold.is_finite()) {
            return Err(crate::Error::InvalidParameter {
                name: "power_threshold",
                value: self.power_threshold.to_string(),
                reason: "must be a finite, non-negative mean power".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.clarity_threshold) {
            return Err(crate::Error::InvalidParameter {
                name: "clarity_threshold",
                value: self.clarity_threshold.to_string(),
                reason: "must lie in [0, 1]".to_string(),
            });
        }
        Ok(())
    }
}

fn note_hz(name: &'static str, note: &str) -> crate::Result<f32> {
    convert::note_to_hz(note).ok_or_else(|| crate::Error::InvalidParameter {
        name,
        value: note.to_string(),
        reason: "expected a note name such as C2 or F#4".to_string(),
    })
}

/// Result of one analysis: the raw pitch track, the drone it was measured
/// against and one optional interval per frame.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub track: PitchTrack,
    pub drone_hz: f32,
    /// Frames the drone was estimated from.
    pub drone_window_frames: usize,
    /// Same length as `track`; `None` for unvoiced frames.
    pub intervals: Vec<Option<RelativeInterval>>,
}

impl Analysis {
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn labels(&self) -> Vec<Option<String>> {
        self.intervals
            .iter()
            .map(|i| i.as_ref().map(RelativeInterval::label))
            .collect()
    }

    pub fn cents(&self) -> Vec<Option<f32>> {
        self.intervals.iter().map(|i| i.map(|i| i.cents)).collect()
    }

    /// Text rendering of the first `limit` frames.
    pub fn preview(&self, limit: usize) -> Preview {
        let frame_indices: Vec<usize> = (0..self.len()).collect();
        Preview {
            times: format_list(&frame_indices, limit, |&i| {
                format!("{:.2}", self.track.frame_time(i))
            }),
            labels: format_list(&self.intervals, limit, |i| match i {
                Some(i) => i.label(),
                None => "None".to_string(),
            }),
            cents: format_list(&self.intervals, limit, |i| match i {
                Some(i) => format!("{:.2}", i.cents),
                None => "nan".to_string(),
            }),
            frequencies: format_list(self.track.frequencies(), limit, |f| match f {
                Some(f) => format!("{f:.2}"),
                None => "nan".to_string(),
            }),
            voiced_flags: format_list(self.track.voiced_flags(), limit, |&v| {
                let flag = if v { "True" } else { "False" };
                flag.to_string()
            }),
            total_frames: self.len(),
            shown_frames: limit.min(self.len()),
        }
    }
}

/// Truncated text rendering of an [`Analysis`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Frame start times in seconds
    pub times: String,
    pub labels: String,
    pub cents: String,
    pub frequencies: String,
    pub voiced_flags: String,
    pub total_frames: usize,
    pub shown_frames: usize,
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames shown: {} of {}", self.shown_frames, self.total_frames)?;
        writeln!(f, "times (s): {}", self.times)?;
        writeln!(f, "intervals: {}", self.labels)?;
        writeln!(f, "cents: {}", self.cents)?;
        writeln!(f, "pitches: {}", self.frequencies)?;
        write!(f, "voiced: {}", self.voiced_flags)
    }
}

/// `[a, b, c]` over the first `limit` items, with `...` appended when
/// items were left out.
fn format_list<T>(items: &[T], limit: usize, render: impl Fn(&T) -> String) -> String {
    let mut out = String::from("[");
    for (i, item) in items.iter().take(limit).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&render(item));
    }
    out.push(']');
    if items.len() > limit {
        out.push_str("...");
    }
    out
}

/// Runs the pipeline with a pluggable decoder and pitch source.
#[derive(Debug, Clone)]
pub struct Analyzer<D = SymphoniaDecoder, P = McLeodPitchSource> {
    config: AnalysisConfig,
    decoder: D,
    source: P,
}

impl Analyzer {
    /// Symphonia decoding and McLeod pitch tracking configured from `config`.
    pub fn new(config: AnalysisConfig) -> crate::Result<Self> {
        let decoder = SymphoniaDecoder::new(config.sample_rate);
        let source = McLeodPitchSource::new(config.frame_length, config.hop_length)
            .with_power_threshold(config.power_threshold)
            .with_clarity_threshold(config.clarity_threshold);
        Self::with_components(config, decoder, source)
    }
}

impl<D: AudioDecoder, P: PitchSource> Analyzer<D, P> {
    pub fn with_components(config: AnalysisConfig, decoder: D, source: P) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            decoder,
            source,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Decode `path` and analyse it.
    ///
    /// # Errors
    /// `Error::SourceNotFound` if `path` is not a file, `Error::Decode` if
    /// it cannot be decoded, `Error::DroneUndetermined` if the opening
    /// window has no voiced frame.
    pub fn analyze_file<Q: AsRef<Path>>(&self, path: Q) -> crate::Result<Analysis> {
        let path = path.as_ref();
        let audio = self.decoder.decode(path)?;
        log::debug!(
            "decoded {:.2}s of audio at {} Hz from {}",
            audio.duration(),
            audio.sample_rate,
            path.display()
        );
        self.analyze_samples(&audio.samples, audio.sample_rate)
    }

    /// Analyse mono samples already in memory.
    pub fn analyze_samples(&self, samples: &[f32], sample_rate: u32) -> crate::Result<Analysis> {
        let track = self
            .source
            .analyze(samples, sample_rate, self.config.fmin, self.config.fmax)?;
        let drone_window_frames = drone::drone_window(&track, self.config.drone_window_secs);
        let drone_hz = drone::estimate_drone(&track, self.config.drone_window_secs)?;
        let intervals = interval::relative_intervals(&track, drone_hz)?;

        log::info!(
            "analysed {} frames ({} voiced), drone {:.2} Hz",
            track.len(),
            track.voiced_count(),
            drone_hz
        );
        Ok(Analysis {
            track,
            drone_hz,
            drone_window_frames,
            intervals,
        })
    }
}

/// Analyse the audio file at `path` with the default decoder and pitch source.
///
/// # Example
/// ```no_run
/// use drone_intervals::{AnalysisConfig, analyze_file};
///
/// let analysis = analyze_file("drone.wav", &AnalysisConfig::default()).unwrap();
/// println!("drone at {:.1} Hz", analysis.drone_hz);
/// println!("{}", analysis.preview(20));
/// ```
pub fn analyze_file<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> crate::Result<Analysis> {
    Analyzer::new(config.clone())?.analyze_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_list_truncates() {
        let items = [1, 2, 3];
        assert_eq!(format_list(&items, 5, |v| v.to_string()), "[1, 2, 3]");
        assert_eq!(format_list(&items, 2, |v| v.to_string()), "[1, 2]...");
        assert_eq!(format_list::<i32>(&[], 2, |v| v.to_string()), "[]");
    }

    #[test]
    fn default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.fmin - 65.406).abs() < 0.01);
        assert!((config.fmax - 2093.0).abs() < 0.01);
    }

    #[test]
    fn invalid_configs_rejected() {
        let base = AnalysisConfig::default();
        assert!(base.clone().with_hop_length(0).validate().is_err());
        assert!(base.clone().with_frame_length(0).validate().is_err());
        assert!(base.clone().with_fmin(3000.0).validate().is_err());
        assert!(base.clone().with_fmin(-1.0).validate().is_err());
        assert!(base.clone().with_drone_window_secs(0.0).validate().is_err());
        assert!(base.clone().with_clarity_threshold(1.5).validate().is_err());
        assert!(base.clone().with_sample_rate(Some(0)).validate().is_err());
        assert!(base.with_note_range("C2", "nope").is_err());
    }
}
