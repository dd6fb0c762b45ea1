use super::*;
use approx::assert_abs_diff_eq;

#[test]
fn test_cents_identities() {
    assert_abs_diff_eq!(hz_to_cents(440.0, 440.0).unwrap(), 0.0);
    assert_abs_diff_eq!(hz_to_cents(880.0, 440.0).unwrap(), 1200.0, epsilon = 1e-3);
    assert_abs_diff_eq!(hz_to_cents(220.0, 440.0).unwrap(), -1200.0, epsilon = 1e-3);
    assert_abs_diff_eq!(hz_to_cents(523.25, 440.0).unwrap(), 300.0, epsilon = 0.1);
}

#[test]
fn test_cents_rejects_bad_frequencies() {
    assert!(matches!(
        hz_to_cents(0.0, 440.0),
        Err(crate::Error::InvalidFrequency { name: "freq_hz", .. })
    ));
    assert!(matches!(
        hz_to_cents(440.0, -1.0),
        Err(crate::Error::InvalidFrequency { name: "reference_hz", .. })
    ));
    assert!(hz_to_cents(f32::NAN, 440.0).is_err());
    assert!(hz_to_cents(440.0, f32::INFINITY).is_err());
}

#[test]
fn test_cents_to_hz_inverts() {
    let hz = cents_to_hz(700.0, 220.0).unwrap();
    assert_abs_diff_eq!(hz_to_cents(hz, 220.0).unwrap(), 700.0, epsilon = 1e-2);
}

#[test]
fn test_degree_table() {
    let labels: Vec<String> = (0..12).map(|s| ScaleDegree::from_semitones(s).to_string()).collect();
    assert_eq!(labels, DEGREE_NAMES.to_vec());
}

#[test]
fn test_negative_semitones_wrap() {
    let degree = ScaleDegree::from_semitones(-1);
    assert_eq!(degree.degree_index, 11);
    assert_eq!(degree.octave, -1);
    assert_eq!(degree.name(), "7");
    assert_eq!(degree.to_string(), "7 (-1 oct)");

    let degree = ScaleDegree::from_semitones(-12);
    assert_eq!(degree.degree_index, 0);
    assert_eq!(degree.octave, -1);

    let degree = ScaleDegree::from_semitones(-13);
    assert_eq!(degree.to_string(), "7 (-2 oct)");
}

#[test]
fn test_octave_annotation() {
    assert_eq!(cents_to_label(1200.0), "Unison (+1 oct)");
    assert_eq!(cents_to_label(2700.0), "b3 (+2 oct)");
    assert_eq!(cents_to_label(-1200.0), "Unison (-1 oct)");
    assert_eq!(cents_to_label(-2400.0), "Unison (-2 oct)");
}

#[test]
fn test_rounding_ties_to_even() {
    assert_eq!(cents_to_semitones(50.0), 0);
    assert_eq!(cents_to_semitones(150.0), 2);
    assert_eq!(cents_to_semitones(250.0), 2);
    assert_eq!(cents_to_semitones(-50.0), 0);
    assert_eq!(cents_to_semitones(-150.0), -2);
    assert_eq!(cents_to_semitones(50.1), 1);
    assert_eq!(cents_to_semitones(49.9), 0);
    assert_eq!(cents_to_label(50.0), "Unison");
}

#[test]
fn test_semitones_roundtrip() {
    for s in -30..30 {
        assert_eq!(ScaleDegree::from_semitones(s).semitones(), s);
    }
}

#[test]
fn test_note_conversions() {
    assert_eq!(note_to_midi("A4"), Some(69));
    assert_eq!(note_to_midi("C2"), Some(36));
    assert_eq!(note_to_midi("c7"), Some(96));
    assert_eq!(note_to_midi("F#3"), Some(54));
    assert_eq!(note_to_midi("Eb4"), Some(63));
    assert_eq!(note_to_midi("Bb-1"), Some(10));
    assert_eq!(note_to_midi("X4"), None);
    assert_eq!(note_to_midi(""), None);
    assert_abs_diff_eq!(midi_to_hz(69), 440.0);
    assert_abs_diff_eq!(note_to_hz("C7").unwrap(), 2093.0, epsilon = 0.01);
}
