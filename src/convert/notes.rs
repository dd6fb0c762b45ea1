use super::{A4_HZ, MIDI_A4};

const NOTE_MAP: [(&str, i32); 17] = [
    ("C", 0),
    ("C#", 1),
    ("DB", 1),
    ("D", 2),
    ("D#", 3),
    ("EB", 3),
    ("E", 4),
    ("F", 5),
    ("F#", 6),
    ("GB", 6),
    ("G", 7),
    ("G#", 8),
    ("AB", 8),
    ("A", 9),
    ("A#", 10),
    ("BB", 10),
    ("B", 11),
];

/// Convert a MIDI note number to frequency (Hz).
pub fn midi_to_hz(midi: i32) -> f32 {
    A4_HZ * 2.0f32.powf((midi as f32 - MIDI_A4) / 12.0)
}

/// Convert a note name such as `"C2"`, `"F#4"` or `"Bb-1"` to a MIDI number.
pub fn note_to_midi(note: &str) -> Option<i32> {
    let note = note.trim().to_uppercase();
    (1..note.len())
        .filter(|&i| note.is_char_boundary(i))
        .find_map(|i| {
            let (pitch, octave_str) = note.split_at(i);
            let octave = octave_str.parse::<i32>().ok()?;
            NOTE_MAP
                .iter()
                .find(|(name, _)| *name == pitch)
                .map(|&(_, offset)| (octave + 1) * 12 + offset)
        })
}

/// Convert a note name to frequency (Hz).
///
/// # Example
/// ```
/// use drone_intervals::convert::note_to_hz;
///
/// let c2 = note_to_hz("C2").unwrap();
/// assert!((c2 - 65.406).abs() < 0.01);
/// assert!(note_to_hz("H2").is_none());
/// ```
pub fn note_to_hz(note: &str) -> Option<f32> {
    note_to_midi(note).map(midi_to_hz)
}
