//! Drone-relative intervals for every frame of a pitch track.

use std::fmt;

use crate::convert::{self, ScaleDegree};
use crate::pitch::PitchTrack;

/// Signed cents offset from the drone and the scale degree it rounds to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeInterval {
    pub cents: f32,
    pub degree: ScaleDegree,
}

impl RelativeInterval {
    /// Interval of `freq_hz` above (or below) `drone_hz`.
    ///
    /// # Errors
    /// Returns `Error::InvalidFrequency` if either frequency is non-positive
    /// or non-finite.
    pub fn between(freq_hz: f32, drone_hz: f32) -> crate::Result<Self> {
        let cents = convert::hz_to_cents(freq_hz, drone_hz)?;
        Ok(Self {
            cents,
            degree: ScaleDegree::from_cents(cents),
        })
    }

    /// Scale-degree label, e.g. `"b3"` or `"5 (+1 oct)"`.
    pub fn label(&self) -> String {
        self.degree.to_string()
    }
}

impl fmt::Display for RelativeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:+.1} cents)", self.degree, self.cents)
    }
}

/// Interval for every frame of `track` relative to `drone_hz`.
///
/// Unvoiced frames and frames without a frequency yield `None`. Each frame
/// depends only on itself and the drone.
///
/// # Errors
/// Returns `Error::InvalidFrequency` if `drone_hz` is not a positive finite
/// frequency, or if a voiced frame carries a non-positive frequency.
///
/// # Example
/// ```
/// use drone_intervals::interval::relative_intervals;
/// use drone_intervals::pitch::PitchTrack;
///
/// let track = PitchTrack::new(
///     vec![Some(440.0), None, Some(660.0)],
///     vec![true, false, true],
///     vec![0.9, 0.0, 0.9],
///     22050,
///     512,
/// )
/// .unwrap();
/// let intervals = relative_intervals(&track, 440.0).unwrap();
/// assert_eq!(intervals[0].unwrap().label(), "Unison");
/// assert!(intervals[1].is_none());
/// assert_eq!(intervals[2].unwrap().label(), "5");
/// ```
pub fn relative_intervals(
    track: &PitchTrack,
    drone_hz: f32,
) -> crate::Result<Vec<Option<RelativeInterval>>> {
    convert::check_frequency("drone_hz", drone_hz)?;
    track
        .frames()
        .map(|frame| match frame.frequency_hz {
            Some(freq) if frame.is_voiced => RelativeInterval::between(freq, drone_hz).map(Some),
            _ => Ok(None),
        })
        .collect()
}
