use std::fmt;

use super::cents::CENTS_PER_SEMITONE;

/// Chromatic degree names relative to the drone, ascending from unison.
pub const DEGREE_NAMES: [&str; 12] = [
    "Unison", "b2", "2", "b3", "3", "4", "b5", "5", "b6", "6", "b7", "7",
];

/// A chromatic scale degree relative to the drone plus an octave offset.
///
/// Displays as the degree name alone in the drone's octave, and as
/// `"<name> (+N oct)"` / `"<name> (-N oct)"` elsewhere.
///
/// # Example
/// ```
/// use drone_intervals::convert::ScaleDegree;
///
/// assert_eq!(ScaleDegree::from_semitones(3).to_string(), "b3");
/// assert_eq!(ScaleDegree::from_semitones(19).to_string(), "5 (+1 oct)");
/// assert_eq!(ScaleDegree::from_semitones(-1).to_string(), "7 (-1 oct)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScaleDegree {
    /// Index into [`DEGREE_NAMES`], always in 0..12.
    pub degree_index: usize,
    /// Octaves above (positive) or below (negative) the drone's octave.
    pub octave: i32,
}

impl ScaleDegree {
    /// Split a signed semitone count into degree and octave with
    /// floor division, so -1 is degree 11 one octave down.
    pub fn from_semitones(semitones: i32) -> Self {
        Self {
            degree_index: semitones.rem_euclid(12) as usize,
            octave: semitones.div_euclid(12),
        }
    }

    /// Nearest degree to `cents`, ties resolved to the even semitone.
    pub fn from_cents(cents: f32) -> Self {
        Self::from_semitones(cents_to_semitones(cents))
    }

    pub fn name(&self) -> &'static str {
        DEGREE_NAMES[self.degree_index]
    }

    /// Signed semitone count this degree stands for.
    pub fn semitones(&self) -> i32 {
        self.octave * 12 + self.degree_index as i32
    }
}

impl fmt::Display for ScaleDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.octave {
            0 => f.write_str(self.name()),
            o if o > 0 => write!(f, "{} (+{} oct)", self.name(), o),
            o => write!(f, "{} ({} oct)", self.name(), o),
        }
    }
}

/// Round a cents offset to a whole number of semitones.
///
/// Exact halves go to the even neighbour: 50 cents is 0 semitones, 150 is 2,
/// -50 is 0.
pub fn cents_to_semitones(cents: f32) -> i32 {
    (cents / CENTS_PER_SEMITONE).round_ties_even() as i32
}

/// Scale-degree label for a cents offset from the drone.
///
/// # Example
/// ```
/// use drone_intervals::convert::cents_to_label;
///
/// assert_eq!(cents_to_label(0.0), "Unison");
/// assert_eq!(cents_to_label(300.0), "b3");
/// assert_eq!(cents_to_label(1200.0), "Unison (+1 oct)");
/// assert_eq!(cents_to_label(-500.0), "5 (-1 oct)");
/// ```
pub fn cents_to_label(cents: f32) -> String {
    ScaleDegree::from_cents(cents).to_string()
}
