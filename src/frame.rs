//! Centred framing of a sample buffer.
//!
//! Frame `i` is centred on sample `i * hop_length`; the signal is
//! zero-padded by `frame_length / 2` on both sides so the first and last
//! frames are complete.

/// Number of centred frames for a signal of `len` samples.
///
/// # Example
/// ```
/// use drone_intervals::frame::frame_count;
///
/// assert_eq!(frame_count(22050, 512), 44);
/// assert_eq!(frame_count(0, 512), 0);
/// ```
pub fn frame_count(len: usize, hop_length: usize) -> usize {
    if len == 0 || hop_length == 0 {
        return 0;
    }
    len / hop_length + 1
}

/// Split `y` into centred, zero-padded frames of `frame_length` samples.
///
/// # Errors
/// Returns `Error::InvalidSize` if `frame_length` or `hop_length` is 0.
///
/// # Example
/// ```
/// use drone_intervals::frame::centered_frames;
///
/// let signal = vec![1.0f32; 10];
/// let frames = centered_frames(&signal, 4, 5).unwrap();
/// assert_eq!(frames.len(), 3);
/// assert_eq!(frames[0], vec![0.0, 0.0, 1.0, 1.0]);
/// ```
pub fn centered_frames(
    y: &[f32],
    frame_length: usize,
    hop_length: usize,
) -> crate::Result<Vec<Vec<f32>>> {
    if frame_length == 0 {
        return Err(crate::Error::InvalidSize {
            name: "frame_length",
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

    let pad = frame_length / 2;
    let mut padded = vec![0.0f32; y.len() + frame_length];
    padded[pad..pad + y.len()].copy_from_slice(y);

    Ok((0..frame_count(y.len(), hop_length))
        .map(|i| {
            let start = i * hop_length;
            padded[start..start + frame_length].to_vec()
        })
        .collect())
}
