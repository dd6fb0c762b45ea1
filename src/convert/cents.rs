/// Cents in one octave.
pub const CENTS_PER_OCTAVE: f32 = 1200.0;

/// Cents in one equal-tempered semitone.
pub const CENTS_PER_SEMITONE: f32 = 100.0;

/// Signed distance from `reference_hz` to `freq_hz` in cents.
///
/// `1200 * log2(freq_hz / reference_hz)`: 0 at unison, 1200 one octave up,
/// negative below the reference.
///
/// # Errors
/// Returns `Error::InvalidFrequency` if either frequency is non-positive or
/// non-finite.
///
/// # Example
/// ```
/// use drone_intervals::convert::hz_to_cents;
///
/// assert_eq!(hz_to_cents(880.0, 440.0).unwrap(), 1200.0);
/// assert!(hz_to_cents(0.0, 440.0).is_err());
/// ```
pub fn hz_to_cents(freq_hz: f32, reference_hz: f32) -> crate::Result<f32> {
    check_frequency("freq_hz", freq_hz)?;
    check_frequency("reference_hz", reference_hz)?;
    Ok(CENTS_PER_OCTAVE * (freq_hz / reference_hz).log2())
}

/// Frequency lying `cents` away from `reference_hz`.
pub fn cents_to_hz(cents: f32, reference_hz: f32) -> crate::Result<f32> {
    check_frequency("reference_hz", reference_hz)?;
    Ok(reference_hz * 2.0f32.powf(cents / CENTS_PER_OCTAVE))
}

pub(crate) fn check_frequency(name: &'static str, value: f32) -> crate::Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(crate::Error::InvalidFrequency { name, value })
    }
}
