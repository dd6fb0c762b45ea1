//! Per-frame fundamental frequency estimation.
//!
//! The analysis pipeline only depends on the [`PitchSource`] trait and the
//! [`PitchTrack`] it produces. [`McLeodPitchSource`] is the default source,
//! built on the `pitch-detection` crate's McLeod pitch method.

use crate::frame;
use pitch_detection::detector::PitchDetector;
use pitch_detection::detector::mcleod::McLeodDetector;

/// One analysis frame of a [`PitchTrack`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Estimated fundamental frequency, absent when no pitch was found.
    pub frequency_hz: Option<f32>,
    pub is_voiced: bool,
    /// Voicing confidence in [0, 1].
    pub voiced_probability: f32,
}

/// Three parallel per-frame sequences plus the framing they were computed with.
///
/// All sequences have the same length, one entry per frame. Frame `i` is
/// centred at `i * hop_length / sample_rate` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchTrack {
    frequencies: Vec<Option<f32>>,
    voiced_flags: Vec<bool>,
    voiced_probs: Vec<f32>,
    sample_rate: u32,
    hop_length: usize,
}

impl PitchTrack {
    /// Assemble a track from its parallel sequences.
    ///
    /// # Errors
    /// Returns `Error::ShapeMismatch` if the sequences differ in length and
    /// `Error::InvalidSize` if `sample_rate` or `hop_length` is 0.
    pub fn new(
        frequencies: Vec<Option<f32>>,
        voiced_flags: Vec<bool>,
        voiced_probs: Vec<f32>,
        sample_rate: u32,
        hop_length: usize,
    ) -> crate::Result<Self> {
        if voiced_flags.len() != frequencies.len() || voiced_probs.len() != frequencies.len() {
            return Err(crate::Error::ShapeMismatch {
                expected: format!("{} frames in every sequence", frequencies.len()),
                got: format!(
                    "{} voiced flags, {} voiced probabilities",
                    voiced_flags.len(),
                    voiced_probs.len()
                ),
            });
        }
        if sample_rate == 0 {
            return Err(crate::Error::InvalidSize {
                name: "sample_rate",
                value: 0,
                reason: "must be > 0",
            });
        }
        if hop_length == 0 {
            return Err(crate::Error::InvalidSize {
                name: "hop_length",
                value: 0,
                reason: "must be > 0",
            });
        }
        Ok(Self {
            frequencies,
            voiced_flags,
            voiced_probs,
            sample_rate,
            hop_length,
        })
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn frequencies(&self) -> &[Option<f32>] {
        &self.frequencies
    }

    pub fn voiced_flags(&self) -> &[bool] {
        &self.voiced_flags
    }

    pub fn voiced_probs(&self) -> &[f32] {
        &self.voiced_probs
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn hop_length(&self) -> usize {
        self.hop_length
    }

    /// Frame `i`, if in range.
    pub fn frame(&self, i: usize) -> Option<Frame> {
        Some(Frame {
            frequency_hz: *self.frequencies.get(i)?,
            is_voiced: self.voiced_flags[i],
            voiced_probability: self.voiced_probs[i],
        })
    }

    /// Frames in time order.
    pub fn frames(&self) -> impl Iterator<Item = Frame> + '_ {
        (0..self.len()).filter_map(|i| self.frame(i))
    }

    /// Centre time of frame `i` in seconds.
    pub fn frame_time(&self, i: usize) -> f32 {
        (i * self.hop_length) as f32 / self.sample_rate as f32
    }

    /// Number of frames covering the first `seconds` of audio, not clamped
    /// to the track length.
    pub fn frames_in(&self, seconds: f32) -> usize {
        if !(seconds > 0.0) {
            return 0;
        }
        (seconds * self.sample_rate as f32 / self.hop_length as f32) as usize
    }

    pub fn voiced_count(&self) -> usize {
        self.voiced_flags.iter().filter(|&&v| v).count()
    }
}

/// Produces a [`PitchTrack`] from mono samples.
pub trait PitchSource {
    /// Estimate the fundamental frequency of every frame of `samples`,
    /// searching only between `fmin` and `fmax` Hz.
    fn analyze(
        &self,
        samples: &[f32],
        sample_rate: u32,
        fmin: f32,
        fmax: f32,
    ) -> crate::Result<PitchTrack>;
}

/// Default mean power per sample below which frames are not analysed.
pub const DEFAULT_POWER_THRESHOLD: f32 = 1e-6;

/// McLeod pitch method over centred frames.
///
/// # Example
/// ```
/// use drone_intervals::io;
/// use drone_intervals::pitch::{McLeodPitchSource, PitchSource};
///
/// let signal = io::tone(440.0, 22050, 1.0);
/// let track = McLeodPitchSource::default()
///     .analyze(&signal, 22050, 65.0, 2093.0)
///     .unwrap();
/// assert!(track.voiced_count() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct McLeodPitchSource {
    /// Length of analysis frames in samples
    pub frame_length: usize,
    /// Number of samples between frames
    pub hop_length: usize,
    /// Frames whose mean power per sample falls below this are unvoiced
    /// without analysis
    pub power_threshold: f32,
    /// Minimum clarity for a frame to count as voiced
    pub clarity_threshold: f32,
}

impl McLeodPitchSource {
    pub fn new(frame_length: usize, hop_length: usize) -> Self {
        Self {
            frame_length,
            hop_length,
            ..Self::default()
        }
    }

    pub fn with_power_threshold(mut self, power_threshold: f32) -> Self {
        self.power_threshold = power_threshold;
        self
    }

    pub fn with_clarity_threshold(mut self, clarity_threshold: f32) -> Self {
        self.clarity_threshold = clarity_threshold;
        self
    }
}

impl Default for McLeodPitchSource {
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_length: 512,
            // about -60 dBFS RMS
            power_threshold: DEFAULT_POWER_THRESHOLD,
            clarity_threshold: 0.6,
        }
    }
}

impl PitchSource for McLeodPitchSource {
    fn analyze(
        &self,
        samples: &[f32],
        sample_rate: u32,
        fmin: f32,
        fmax: f32,
    ) -> crate::Result<PitchTrack> {
        if samples.is_empty() {
            return Err(crate::Error::EmptyAudio);
        }
        if !samples.iter().all(|v| v.is_finite()) {
            return Err(crate::Error::NonFiniteAudio);
        }
        if sample_rate == 0 {
            return Err(crate::Error::InvalidSize {
                name: "sample_rate",
                value: 0,
                reason: "must be > 0",
            });
        }
        let fmax = fmax.min(sample_rate as f32 / 2.0);
        if !(fmin > 0.0) || fmin >= fmax {
            return Err(crate::Error::InvalidFrequencyRange {
                fmin,
                fmax,
                reason: "need 0 < fmin < fmax <= sample_rate / 2".to_string(),
            });
        }

        let frames = frame::centered_frames(samples, self.frame_length, self.hop_length)?;
        // The detector gates on the summed power of the whole frame
        let frame_power_threshold = self.power_threshold * self.frame_length as f32;
        let mut detector = McLeodDetector::<f32>::new(self.frame_length, self.frame_length / 2);

        let mut frequencies = Vec::with_capacity(frames.len());
        let mut voiced_flags = Vec::with_capacity(frames.len());
        let mut voiced_probs = Vec::with_capacity(frames.len());
        for frame in &frames {
            let detected = detector.get_pitch(
                frame,
                sample_rate as usize,
                frame_power_threshold,
                self.clarity_threshold,
            );
            let (frequency, probability) = match detected {
                Some(p) if p.frequency.is_finite() => (p.frequency, p.clarity.clamp(0.0, 1.0)),
                _ => (0.0, 0.0),
            };
            let voiced = frequency >= fmin
                && frequency <= fmax
                && probability >= self.clarity_threshold;

            frequencies.push(voiced.then_some(frequency));
            voiced_flags.push(voiced);
            voiced_probs.push(probability);
        }

        log::debug!(
            "McLeod pitch track: {} frames, {} voiced",
            frames.len(),
            voiced_flags.iter().filter(|&&v| v).count()
        );
        PitchTrack::new(
            frequencies,
            voiced_flags,
            voiced_probs,
            sample_rate,
            self.hop_length,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mismatched_sequences_rejected() {
        let result = PitchTrack::new(vec![Some(440.0)], vec![true, false], vec![1.0], 22050, 512);
        assert!(matches!(result, Err(crate::Error::ShapeMismatch { .. })));
    }

    #[test]
    fn frame_times_follow_hop() {
        let track = PitchTrack::new(vec![None; 4], vec![false; 4], vec![0.0; 4], 1000, 250).unwrap();
        assert_abs_diff_eq!(track.frame_time(3), 0.75);
        assert_eq!(track.frames_in(2.0), 8);
        assert_eq!(track.frames_in(-1.0), 0);
    }

    #[test]
    fn mcleod_tracks_pure_tone() {
        let sr = 22050;
        let signal = io::tone(440.0, sr, 1.0);
        let track = McLeodPitchSource::default()
            .analyze(&signal, sr, 65.0, 2093.0)
            .unwrap();

        assert_eq!(track.len(), signal.len() / 512 + 1);
        let voiced: Vec<f32> = track.frequencies().iter().flatten().copied().collect();
        assert!(voiced.len() > track.len() / 2);
        let close = voiced.iter().filter(|&&f| (f - 440.0).abs() < 5.0).count();
        assert!(close as f32 >= 0.8 * voiced.len() as f32);
    }

    #[test]
    fn silence_is_unvoiced() {
        let signal = vec![0.0f32; 22050];
        let track = McLeodPitchSource::default()
            .analyze(&signal, 22050, 65.0, 2093.0)
            .unwrap();
        assert_eq!(track.voiced_count(), 0);
        assert!(track.frequencies().iter().all(Option::is_none));
    }

    #[test]
    fn empty_and_bad_range_rejected() {
        let source = McLeodPitchSource::default();
        assert!(matches!(
            source.analyze(&[], 22050, 65.0, 2093.0),
            Err(crate::Error::EmptyAudio)
        ));
        assert!(source.analyze(&[0.1; 4096], 22050, 500.0, 100.0).is_err());
    }

    #[test]
    fn non_finite_samples_rejected() {
        let mut signal = io::tone(440.0, 22050, 0.5);
        signal[100] = f32::NAN;
        assert!(matches!(
            McLeodPitchSource::default().analyze(&signal, 22050, 65.0, 2093.0),
            Err(crate::Error::NonFiniteAudio)
        ));
    }
}
