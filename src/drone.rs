//! Drone reference estimation.
//!
//! The drone is the sustained pitch every other frame is measured against.
//! It is taken as the median frequency of the voiced frames in the opening
//! window of the recording.

use crate::pitch::PitchTrack;

/// Default length of the opening window, in seconds.
pub const DEFAULT_DRONE_WINDOW_SECS: f32 = 2.0;

/// Number of frames in the drone window of `track`, clamped to its length.
pub fn drone_window(track: &PitchTrack, window_secs: f32) -> usize {
    track.frames_in(window_secs).min(track.len())
}

/// Median frequency of the voiced frames among the first `window_frames`.
///
/// Frames that are voiced but carry no (or a non-positive) frequency are
/// ignored. Returns `None` when no frame qualifies.
///
/// # Example
/// ```
/// use drone_intervals::drone::voiced_median;
///
/// let freqs = [Some(440.0), None, Some(442.0), Some(100.0)];
/// let voiced = [true, false, true, false];
/// assert_eq!(voiced_median(&freqs, &voiced, 4), Some(441.0));
/// assert_eq!(voiced_median(&freqs, &voiced, 0), None);
/// ```
pub fn voiced_median(
    frequencies: &[Option<f32>],
    voiced_flags: &[bool],
    window_frames: usize,
) -> Option<f32> {
    let mut voiced: Vec<f32> = frequencies
        .iter()
        .zip(voiced_flags)
        .take(window_frames)
        .filter_map(|(&freq, &is_voiced)| freq.filter(|f| is_voiced && *f > 0.0 && f.is_finite()))
        .collect();
    median(&mut voiced)
}

/// Median of `values`, averaging the two middle values for even lengths.
///
/// Reorders `values`. Returns `None` for an empty slice.
pub fn median(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f32::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Estimate the drone frequency of `track` from its first `window_secs`.
///
/// Recordings shorter than the window use every frame.
///
/// # Errors
/// Returns `Error::DroneUndetermined` if no voiced frame falls inside the
/// window.
pub fn estimate_drone(track: &PitchTrack, window_secs: f32) -> crate::Result<f32> {
    let window_frames = drone_window(track, window_secs);
    let drone = voiced_median(track.frequencies(), track.voiced_flags(), window_frames)
        .ok_or(crate::Error::DroneUndetermined { window_frames })?;
    log::debug!("drone reference {drone:.2} Hz from the first {window_frames} frames");
    Ok(drone)
}
